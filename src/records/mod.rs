//! Record store for uploaded images.
//!
//! Couples the on-disk media layout ([`MediaStorage`]) with the image record
//! table from `mintari_db`. Each upload becomes one stored original and one
//! record; the stylization step later fills in the transformed reference.

mod service;
mod storage;

pub use service::RecordStore;
pub use storage::{MediaStorage, StoredFile};
