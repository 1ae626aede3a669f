//! Publishing stylized images to a content-addressed storage gateway.
//!
//! The gateway takes a multipart upload with bearer authentication and
//! answers with JSON whose `url` field is the public locator.

mod outcome;

pub use outcome::{PublishOutcome, UPLOAD_FAILED};

use std::path::Path;

use mintari_common::{Error, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;

use crate::config::{PublishConfig, STORAGE_API_KEY_ENV};
use crate::http::{ensure_success, file_part, network_error};

#[derive(Debug, Deserialize)]
struct PublishResponse {
    #[serde(default)]
    url: Option<String>,
}

/// Client for the storage gateway.
#[derive(Clone)]
pub struct StoragePublisher {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl StoragePublisher {
    /// Create a publisher from its configuration.
    ///
    /// A missing API key is not an error here; it is reported by each
    /// [`publish`](Self::publish) call.
    pub fn new(client: Client, config: &PublishConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config
                .api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    /// Upload `path` and return the locator from the gateway's reply.
    ///
    /// Fails with `Configuration` before any network I/O when no API key is
    /// configured, and with `Upstream` (status and body text) when the
    /// gateway rejects the upload. A missing `url` in a successful reply
    /// yields an empty locator.
    pub async fn publish(&self, path: &Path) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::configuration(format!("{} is not set", STORAGE_API_KEY_ENV))
        })?;

        let form = Form::new().part("file", file_part(path).await?);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|e| network_error("storage upload", e))?;
        let response = ensure_success(response).await?;

        let body: PublishResponse = response
            .json()
            .await
            .map_err(|e| network_error("reading storage reply", e))?;
        let locator = body.url.unwrap_or_default();

        tracing::info!(file = %path.display(), locator = %locator, "Published file");
        Ok(locator)
    }

    /// Like [`publish`](Self::publish), but folds any failure into
    /// [`PublishOutcome::Failed`].
    pub async fn publish_outcome(&self, path: &Path) -> PublishOutcome {
        let result = self.publish(path).await;
        if let Err(ref e) = result {
            tracing::warn!(file = %path.display(), error = %e, "Publishing failed");
        }
        PublishOutcome::from(result)
    }
}
