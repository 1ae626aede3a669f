//! Outbound HTTP plumbing shared by the stylization and publishing clients.

use std::path::Path;
use std::time::Duration;

use mintari_common::{Error, Result};
use reqwest::multipart::Part;
use reqwest::{Client, Response};

/// Build the shared client used for every outbound call.
pub fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("mintari/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to build HTTP client: {}", e);
            Client::new()
        })
}

/// Map a transport-level reqwest failure.
pub fn network_error(what: &str, err: reqwest::Error) -> Error {
    Error::network(format!("{} failed: {}", what, err))
}

/// Pass a successful response through, or turn a failure status into
/// [`Error::Upstream`] carrying the body text.
pub async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::upstream(status.as_u16(), body))
}

/// Read a local file into a multipart part named after the file.
pub async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let part = Part::bytes(bytes).file_name(file_name);
    let mime = image::ImageFormat::from_path(path)
        .map(|f| f.to_mime_type())
        .unwrap_or("application/octet-stream");

    part.mime_str(mime)
        .map_err(|e| Error::internal(format!("invalid mime type '{}': {}", mime, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_part_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A.png");
        std::fs::write(&path, b"bytes").unwrap();

        assert!(file_part(&path).await.is_ok());
    }

    #[tokio::test]
    async fn test_file_part_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = file_part(&dir.path().join("missing.png")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
