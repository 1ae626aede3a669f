//! Stylization through a hosted generative model.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mintari_common::Result;
use reqwest::Client;

use super::file_host::FileHostClient;
use super::prediction::{ModelRef, PredictionClient};
use super::Stylizer;
use crate::http::{ensure_success, network_error};

/// Extension used when the downloaded bytes are not a recognised image.
const FALLBACK_EXTENSION: &str = "png";

/// Upload → predict → download.
///
/// The downloaded result is written to `{output_dir}/{tag}_{uuid}.{ext}`,
/// with `ext` guessed from the bytes.
pub struct RemoteModelStylizer {
    client: Client,
    file_host: FileHostClient,
    predictions: PredictionClient,
    model: ModelRef,
    output_dir: PathBuf,
    tag: String,
}

impl RemoteModelStylizer {
    pub fn new(
        client: Client,
        file_host: FileHostClient,
        predictions: PredictionClient,
        model: ModelRef,
        output_dir: PathBuf,
        tag: String,
    ) -> Self {
        Self {
            client,
            file_host,
            predictions,
            model,
            output_dir,
            tag,
        }
    }

    async fn download(&self, url: &str) -> Result<bytes::Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| network_error("downloading model output", e))?;
        let response = ensure_success(response).await?;

        response
            .bytes()
            .await
            .map_err(|e| network_error("reading model output", e))
    }

    fn output_name(&self, data: &[u8]) -> String {
        let ext = image::guess_format(data)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .unwrap_or(FALLBACK_EXTENSION);
        format!("{}_{}.{}", self.tag, uuid::Uuid::new_v4().simple(), ext)
    }
}

#[async_trait]
impl Stylizer for RemoteModelStylizer {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn stylize(&self, input: &Path) -> Result<PathBuf> {
        let input_url = self.file_host.upload(input).await?;
        let output_url = self.predictions.run(&self.model, &input_url).await?;
        let data = self.download(&output_url).await?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let output = self.output_dir.join(self.output_name(&data));
        tokio::fs::write(&output, &data).await?;

        tracing::info!(
            model = %self.model,
            output = %output.display(),
            bytes = data.len(),
            "Stored model output"
        );

        Ok(output)
    }
}
