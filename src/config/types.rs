use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub media: MediaConfig,

    #[serde(default)]
    pub stylize: StylizeConfig,

    #[serde(default)]
    pub publish: PublishConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body for uploads, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Directory holding the SQLite database (defaults to the config file's directory)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MediaConfig {
    /// Root directory for uploaded and stylized files
    #[serde(default = "default_media_root")]
    pub root: PathBuf,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            root: default_media_root(),
        }
    }
}

/// Which stylization implementation handles submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StylizeBackend {
    /// In-process colour enhancement filter
    #[default]
    Local,
    /// Remote generative image model
    Remote,
}

impl std::fmt::Display for StylizeBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StylizeConfig {
    #[serde(default)]
    pub backend: StylizeBackend,

    /// Saturation factor for the local filter (1.0 leaves the image unchanged)
    #[serde(default = "default_enhance_factor")]
    pub enhance_factor: f32,

    /// Prefix for stylized output file names
    #[serde(default = "default_output_tag")]
    pub output_tag: String,

    #[serde(default)]
    pub remote: RemoteStylizeConfig,
}

fn default_enhance_factor() -> f32 {
    1.8
}

fn default_output_tag() -> String {
    "ghibli".to_string()
}

impl Default for StylizeConfig {
    fn default() -> Self {
        Self {
            backend: StylizeBackend::default(),
            enhance_factor: default_enhance_factor(),
            output_tag: default_output_tag(),
            remote: RemoteStylizeConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteStylizeConfig {
    /// Anonymous file host receiving the input image (multipart `file`, replies with `link`)
    #[serde(default = "default_file_host_url")]
    pub file_host_url: String,

    /// Base URL of the prediction API
    #[serde(default = "default_model_api_url")]
    pub model_api_url: String,

    /// Model identifier, `owner/name` or `owner/name:version`
    #[serde(default)]
    pub model: Option<String>,

    /// Bearer token for the prediction API (also read from REPLICATE_API_TOKEN)
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Delay between status polls while a prediction is still running
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of status polls before giving up
    #[serde(default = "default_max_polls")]
    pub max_polls: u32,
}

fn default_file_host_url() -> String {
    "https://file.io".to_string()
}

fn default_model_api_url() -> String {
    "https://api.replicate.com/v1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_max_polls() -> u32 {
    300
}

impl RemoteStylizeConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for RemoteStylizeConfig {
    fn default() -> Self {
        Self {
            file_host_url: default_file_host_url(),
            model_api_url: default_model_api_url(),
            model: None,
            api_token: None,
            poll_interval_ms: default_poll_interval_ms(),
            max_polls: default_max_polls(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublishConfig {
    /// Publish stylized images after each submission
    #[serde(default = "default_publish_enabled")]
    pub enabled: bool,

    /// Upload endpoint of the storage gateway
    #[serde(default = "default_publish_endpoint")]
    pub endpoint: String,

    /// Gateway API key (also read from NFT_STORAGE_API_KEY)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

fn default_publish_enabled() -> bool {
    true
}

fn default_publish_endpoint() -> String {
    "https://api.nft.storage/upload".to_string()
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: default_publish_enabled(),
            endpoint: default_publish_endpoint(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Timeout applied to every outbound request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
