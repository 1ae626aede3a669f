//! Internal Rust models matching the database schema.

use chrono::{DateTime, Utc};
use mintari_common::ImageRecordId;
use serde::{Deserialize, Serialize};

/// An uploaded image and its stylized derivative.
///
/// References are relative to the media root, e.g.
/// `uploads/originals/A.png` and `uploads/stylized/ghibli_A.png`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub id: ImageRecordId,
    pub original_reference: String,
    /// Set once, after stylization succeeds.
    pub transformed_reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Whether the stylization step has completed for this record.
    pub fn is_transformed(&self) -> bool {
        self.transformed_reference.is_some()
    }
}
