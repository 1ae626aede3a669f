//! Mintari-Common: Shared types, constants, and utilities.
//!
//! This crate provides common functionality used across mintari:
//!
//! - **Typed IDs**: Type-safe UUID wrapper for image records
//! - **Path Utilities**: Media layout constants and upload file-name helpers
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use mintari_common::{Error, ImageRecordId, Result};
//! use mintari_common::paths::{media_url, sanitize_file_name};
//!
//! let id = ImageRecordId::new();
//! assert!(!id.to_string().is_empty());
//!
//! let name = sanitize_file_name("my photo.png").unwrap();
//! assert_eq!(
//!     media_url(&format!("uploads/originals/{}", name)),
//!     "/media/uploads/originals/my_photo.png"
//! );
//!
//! fn example() -> Result<()> {
//!     Err(Error::configuration("NFT_STORAGE_API_KEY is not set"))
//! }
//! assert!(example().is_err());
//! ```

pub mod error;
pub mod ids;
pub mod paths;

pub use error::{Error, Result};
pub use ids::*;
