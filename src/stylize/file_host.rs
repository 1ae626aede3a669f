//! Anonymous file host client.
//!
//! The generative model fetches its input by URL, so the local image is
//! first pushed to a public host that answers with a download link.

use std::path::Path;

use mintari_common::{Error, Result};
use reqwest::multipart::Form;
use reqwest::Client;
use serde::Deserialize;

use crate::http::{ensure_success, file_part, network_error};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    link: Option<String>,
}

/// Uploads files to an anonymous host and returns fetchable links.
#[derive(Clone)]
pub struct FileHostClient {
    client: Client,
    upload_url: String,
}

impl FileHostClient {
    pub fn new(client: Client, upload_url: String) -> Self {
        Self { client, upload_url }
    }

    /// Upload `path` as multipart field `file` and return the `link` from the reply.
    pub async fn upload(&self, path: &Path) -> Result<String> {
        let form = Form::new().part("file", file_part(path).await?);

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| network_error("file host upload", e))?;
        let response = ensure_success(response).await?;

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| network_error("reading file host reply", e))?;

        match body.link {
            Some(link) if !link.is_empty() => {
                tracing::debug!(link = %link, "Uploaded input image to file host");
                Ok(link)
            }
            _ => Err(Error::upstream(200, "file host reply has no link")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn input_file() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.png");
        std::fs::write(&file, b"png").unwrap();
        (dir, file)
    }

    #[tokio::test]
    async fn test_upload_returns_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "link": "https://file.example/abc"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (_dir, file) = input_file();
        let host = FileHostClient::new(Client::new(), format!("{}/", server.uri()));
        assert_eq!(host.upload(&file).await.unwrap(), "https://file.example/abc");
    }

    #[tokio::test]
    async fn test_upload_without_link_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false
            })))
            .mount(&server)
            .await;

        let (_dir, file) = input_file();
        let host = FileHostClient::new(Client::new(), server.uri());
        assert!(matches!(host.upload(&file).await, Err(Error::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_upload_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let (_dir, file) = input_file();
        let host = FileHostClient::new(Client::new(), server.uri());
        match host.upload(&file).await {
            Err(Error::Upstream { status, body }) => {
                assert_eq!(status, 429);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
