mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable holding the storage gateway API key
pub const STORAGE_API_KEY_ENV: &str = "NFT_STORAGE_API_KEY";

/// Environment variable holding the prediction API token
pub const MODEL_API_TOKEN_ENV: &str = "REPLICATE_API_TOKEN";

/// Environment variable overriding the media root
pub const MEDIA_ROOT_ENV: &str = "MINTARI_MEDIA_ROOT";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./config.toml",
        "./mintari.toml",
        "~/.config/mintari/config.toml",
        "/etc/mintari/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Fill secrets and paths from the process environment.
pub fn apply_env_overrides(config: &mut Config) {
    apply_overrides(config, |key| std::env::var(key).ok());
}

/// Apply overrides from an arbitrary key lookup. Empty values are ignored.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = lookup(STORAGE_API_KEY_ENV) {
        config.publish.api_key = Some(key);
    }
    if let Some(token) = lookup(MODEL_API_TOKEN_ENV) {
        config.stylize.remote.api_token = Some(token);
    }
    if let Some(root) = lookup(MEDIA_ROOT_ENV) {
        config.media.root = root.into();
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.server.max_upload_bytes == 0 {
        anyhow::bail!("server.max_upload_bytes must be greater than 0");
    }

    if config.http.request_timeout_secs == 0 {
        anyhow::bail!("http.request_timeout_secs must be greater than 0");
    }

    let factor = config.stylize.enhance_factor;
    if !factor.is_finite() || factor < 0.0 {
        anyhow::bail!("stylize.enhance_factor must be a finite, non-negative number");
    }

    let tag = &config.stylize.output_tag;
    if tag.is_empty() || tag.contains(['/', '\\']) || tag.contains("..") {
        anyhow::bail!("stylize.output_tag must be a plain, non-empty file name prefix");
    }

    if config.stylize.backend == StylizeBackend::Remote {
        match config.stylize.remote.model.as_deref() {
            Some(model) if model.contains('/') => {}
            Some(model) => anyhow::bail!(
                "stylize.remote.model '{}' must look like owner/name or owner/name:version",
                model
            ),
            None => anyhow::bail!("stylize.remote.model is required for the remote backend"),
        }
    }

    if config.publish.enabled && config.publish.api_key.is_none() {
        tracing::warn!(
            "Publishing is enabled but {} is not set; uploads will show as failed",
            STORAGE_API_KEY_ENV
        );
    }

    Ok(())
}
