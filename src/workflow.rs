//! The submission workflow: store, stylize, record, publish.

use std::sync::Arc;

use mintari_common::{paths, Result};
use mintari_db::models::ImageRecord;
use serde::Serialize;

use crate::publish::{PublishOutcome, StoragePublisher};
use crate::records::RecordStore;
use crate::stylize::Stylizer;

/// What the caller gets back after a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct MintPreview {
    pub record: ImageRecord,
    /// Public URL of the stylized image.
    pub image_url: String,
    /// `None` when publishing is disabled.
    pub locator: Option<PublishOutcome>,
}

impl MintPreview {
    /// The locator text to show, if publishing was attempted.
    pub fn display_locator(&self) -> Option<&str> {
        self.locator.as_ref().map(PublishOutcome::display_locator)
    }
}

/// Composes the record store, stylizer and publisher for one submission.
#[derive(Clone)]
pub struct MintWorkflow {
    records: RecordStore,
    stylizer: Arc<dyn Stylizer>,
    publisher: Option<StoragePublisher>,
}

impl MintWorkflow {
    pub fn new(
        records: RecordStore,
        stylizer: Arc<dyn Stylizer>,
        publisher: Option<StoragePublisher>,
    ) -> Self {
        Self {
            records,
            stylizer,
            publisher,
        }
    }

    /// Run one submission end to end.
    ///
    /// Record and stylization failures abort the submission. A publish
    /// failure does not; it is reported through [`MintPreview::locator`].
    pub async fn submit(&self, file_name: &str, data: &[u8]) -> Result<MintPreview> {
        let record = self.records.create(file_name, data)?;
        let original = self.records.storage().resolve(&record.original_reference);

        tracing::debug!(
            record_id = %record.id,
            stylizer = self.stylizer.name(),
            "Stylizing upload"
        );
        let stylized = self.stylizer.stylize(&original).await?;
        let record = self.records.update_transformed(&record, &stylized)?;

        let locator = match &self.publisher {
            Some(publisher) => Some(publisher.publish_outcome(&stylized).await),
            None => None,
        };

        // update_transformed always sets the reference
        let image_url = record
            .transformed_reference
            .as_deref()
            .map(paths::media_url)
            .unwrap_or_default();

        tracing::info!(
            record_id = %record.id,
            image_url = %image_url,
            published = locator.as_ref().is_some_and(PublishOutcome::is_published),
            "Submission complete"
        );

        Ok(MintPreview {
            record,
            image_url,
            locator,
        })
    }
}
