//! Filesystem layout for originals and stylized derivatives.
//!
//! Files live under `{root}/uploads/originals/` and `{root}/uploads/stylized/`.
//! References handed to the database are paths relative to `root`.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use mintari_common::paths::{sanitize_file_name, with_stem_suffix, ORIGINALS_DIR, STYLIZED_DIR};
use mintari_common::{Error, Result};

/// Fallback base name when the client sends nothing usable.
const FALLBACK_FILE_NAME: &str = "upload";

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

/// A file written under the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Path relative to the media root, using `/` separators.
    pub reference: String,
    /// Absolute (or root-joined) filesystem path.
    pub path: PathBuf,
}

/// Media root with the fixed upload subdirectories.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Create a new `MediaStorage` rooted at `root`.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The media root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding uploaded originals.
    pub fn originals_dir(&self) -> PathBuf {
        self.root.join(ORIGINALS_DIR)
    }

    /// Directory holding stylized derivatives.
    pub fn stylized_dir(&self) -> PathBuf {
        self.root.join(STYLIZED_DIR)
    }

    /// Create both upload directories if they are missing.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in [self.originals_dir(), self.stylized_dir()] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Write an uploaded original under a collision-free name.
    ///
    /// The client-supplied name is reduced to a safe base name. When a file
    /// with that name already exists, a short random suffix is inserted
    /// before the extension.
    pub fn store_original(&self, file_name: &str, data: &[u8]) -> Result<StoredFile> {
        let dir = self.originals_dir();
        std::fs::create_dir_all(&dir)?;

        let base =
            sanitize_file_name(file_name).unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                base.clone()
            } else {
                with_stem_suffix(&base, &random_suffix())
            };
            let path = dir.join(&candidate);

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(Error::Io(e)),
            };
            file.write_all(data)?;
            file.sync_all()?;

            return Ok(StoredFile {
                reference: format!("{}/{}", ORIGINALS_DIR, candidate),
                path,
            });
        }

        Err(Error::internal(format!(
            "could not find a free file name for '{}'",
            base
        )))
    }

    /// Resolve a media-root-relative reference to a filesystem path.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference.trim_start_matches('/'))
    }

    /// Convert a path under the media root back into a reference.
    ///
    /// Fails with `InvalidInput` for paths outside the root.
    pub fn reference_for(&self, path: &Path) -> Result<String> {
        let relative = path.strip_prefix(&self.root).map_err(|_| {
            Error::invalid_input(format!(
                "{} is not inside the media root {}",
                path.display(),
                self.root.display()
            ))
        })?;

        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();

        if parts.is_empty() {
            return Err(Error::invalid_input("path refers to the media root itself"));
        }

        Ok(parts.join("/"))
    }
}

/// Seven lowercase alphanumerics, taken from a fresh UUID.
fn random_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..7].to_string()
}
