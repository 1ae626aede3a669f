use serde::Serialize;

/// Text shown in place of a locator when publishing failed.
pub const UPLOAD_FAILED: &str = "Upload failed";

/// Result of trying to publish a stylized image.
///
/// Publishing never aborts a submission: a failure is carried as a value so
/// the preview can still render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PublishOutcome {
    /// The gateway accepted the file.
    Published { locator: String },
    /// The upload did not happen or was rejected.
    Failed { reason: String },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    /// The locator, or [`UPLOAD_FAILED`] when publishing failed.
    pub fn display_locator(&self) -> &str {
        match self {
            Self::Published { locator } => locator,
            Self::Failed { .. } => UPLOAD_FAILED,
        }
    }
}

impl From<mintari_common::Result<String>> for PublishOutcome {
    fn from(result: mintari_common::Result<String>) -> Self {
        match result {
            Ok(locator) => Self::Published { locator },
            Err(e) => Self::Failed {
                reason: e.to_string(),
            },
        }
    }
}
