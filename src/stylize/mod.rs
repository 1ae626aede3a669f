//! Stylization backends.
//!
//! A [`Stylizer`] turns an uploaded image into its stylized derivative and
//! returns the path of the new file under the stylized media directory.
//! Two implementations exist:
//!
//! - [`LocalFilterStylizer`] applies a deterministic colour enhancement in
//!   process.
//! - [`RemoteModelStylizer`] hands the image to a hosted generative model and
//!   downloads the result.
//!
//! The workflow only sees `Arc<dyn Stylizer>`; [`build_stylizer`] picks the
//! implementation from configuration.

mod file_host;
mod local;
mod prediction;
mod remote;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mintari_common::{Error, Result};

use crate::config::{HttpConfig, StylizeBackend, StylizeConfig};
use crate::http::build_client;
use crate::records::MediaStorage;

pub use file_host::FileHostClient;
pub use local::{enhance_color, LocalFilterStylizer};
pub use prediction::{ModelRef, PredictionClient};
pub use remote::RemoteModelStylizer;

/// Produces a stylized image from an input image.
#[async_trait]
pub trait Stylizer: Send + Sync {
    /// Short identifier for logs (e.g. `"local"`).
    fn name(&self) -> &'static str;

    /// Stylize the image at `input`, writing exactly one new file.
    ///
    /// Returns the path of the written file.
    async fn stylize(&self, input: &Path) -> Result<PathBuf>;
}

/// Build the stylizer selected by `config`.
pub fn build_stylizer(
    config: &StylizeConfig,
    http: &HttpConfig,
    storage: &MediaStorage,
) -> Result<Arc<dyn Stylizer>> {
    let output_dir = storage.stylized_dir();

    match config.backend {
        StylizeBackend::Local => Ok(Arc::new(LocalFilterStylizer::new(
            output_dir,
            config.output_tag.clone(),
            config.enhance_factor,
        ))),
        StylizeBackend::Remote => {
            let remote = &config.remote;
            let model = remote
                .model
                .as_deref()
                .ok_or_else(|| {
                    Error::configuration("stylize.remote.model is required for the remote backend")
                })?
                .parse::<ModelRef>()?;

            let client = build_client(http.request_timeout());
            let file_host = FileHostClient::new(client.clone(), remote.file_host_url.clone());
            let predictions = PredictionClient::new(
                client.clone(),
                remote.model_api_url.clone(),
                remote.api_token.clone(),
            )
            .with_polling(remote.poll_interval(), remote.max_polls);

            Ok(Arc::new(RemoteModelStylizer::new(
                client,
                file_host,
                predictions,
                model,
                output_dir,
                config.output_tag.clone(),
            )))
        }
    }
}
