//! Client for a Replicate-style prediction API.
//!
//! A prediction is created with `{"input": {"image": <url>}}`. The request
//! asks the server to hold the connection until the prediction finishes
//! (`Prefer: wait`); if it is still running when the server answers, the
//! prediction's `urls.get` endpoint is polled until it reaches a terminal
//! status.

use std::str::FromStr;
use std::time::Duration;

use mintari_common::{Error, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::http::{ensure_success, network_error};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
const DEFAULT_MAX_POLLS: u32 = 300;

/// A model identifier: `owner/name` with an optional `:version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub owner: String,
    pub name: String,
    pub version: Option<String>,
}

impl FromStr for ModelRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (path, version) = match s.split_once(':') {
            Some((path, version)) => (path, Some(version)),
            None => (s, None),
        };

        let invalid = || {
            Error::configuration(format!(
                "model '{}' must look like owner/name or owner/name:version",
                s
            ))
        };

        let (owner, name) = path.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        if matches!(version, Some(v) if v.is_empty()) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}/{}:{}", self.owner, self.name, version),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: Option<String>,
    status: String,
    #[serde(default)]
    output: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    urls: Option<PredictionUrls>,
}

#[derive(Debug, Deserialize)]
struct PredictionUrls {
    get: Option<String>,
}

/// Runs image-to-image predictions.
#[derive(Clone)]
pub struct PredictionClient {
    client: Client,
    api_url: String,
    token: Option<String>,
    poll_interval: Duration,
    max_polls: u32,
}

impl PredictionClient {
    pub fn new(client: Client, api_url: String, token: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }

    /// Override the status polling cadence.
    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Run `model` on the image at `image_url` and return the output URL.
    pub async fn run(&self, model: &ModelRef, image_url: &str) -> Result<String> {
        let (url, body) = match &model.version {
            Some(version) => (
                format!("{}/predictions", self.api_url),
                json!({ "version": version, "input": { "image": image_url } }),
            ),
            None => (
                format!("{}/models/{}/{}/predictions", self.api_url, model.owner, model.name),
                json!({ "input": { "image": image_url } }),
            ),
        };

        tracing::debug!(model = %model, "Creating prediction");

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await
            .map_err(|e| network_error("prediction request", e))?;
        let mut prediction = self.read(response).await?;

        let mut polls = 0;
        loop {
            match prediction.status.as_str() {
                "succeeded" => return output_url(&prediction),
                "failed" | "canceled" => {
                    let reason = prediction
                        .error
                        .as_ref()
                        .map(value_text)
                        .unwrap_or_else(|| "no error message".to_string());
                    return Err(Error::upstream(
                        200,
                        format!(
                            "prediction {} {}: {}",
                            prediction.id.as_deref().unwrap_or("?"),
                            prediction.status,
                            reason
                        ),
                    ));
                }
                _ => {}
            }

            if polls >= self.max_polls {
                return Err(Error::network(format!(
                    "prediction {} still {} after {} polls",
                    prediction.id.as_deref().unwrap_or("?"),
                    prediction.status,
                    polls
                )));
            }

            let poll_url = self.poll_url(&prediction)?;
            tokio::time::sleep(self.poll_interval).await;
            polls += 1;

            let response = self
                .authorized(self.client.get(&poll_url))
                .send()
                .await
                .map_err(|e| network_error("prediction status request", e))?;
            prediction = self.read(response).await?;
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn read(&self, response: reqwest::Response) -> Result<Prediction> {
        let response = ensure_success(response).await?;
        response
            .json()
            .await
            .map_err(|e| network_error("reading prediction", e))
    }

    fn poll_url(&self, prediction: &Prediction) -> Result<String> {
        if let Some(url) = prediction.urls.as_ref().and_then(|u| u.get.clone()) {
            return Ok(url);
        }
        match &prediction.id {
            Some(id) => Ok(format!("{}/predictions/{}", self.api_url, id)),
            None => Err(Error::upstream(
                200,
                "running prediction has neither an id nor a status URL",
            )),
        }
    }
}

/// The output URL of a finished prediction: a string, or the first string of a list.
fn output_url(prediction: &Prediction) -> Result<String> {
    let url = match &prediction.output {
        Some(Value::String(url)) => Some(url.clone()),
        Some(Value::Array(items)) => items.iter().find_map(|v| v.as_str().map(str::to_string)),
        _ => None,
    };

    url.filter(|u| !u.is_empty())
        .ok_or_else(|| Error::upstream(200, "prediction succeeded without an output URL"))
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
