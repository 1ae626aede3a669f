//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which builds a full [`AppContext`] over an
//! in-memory database and a temporary media root.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use mintari::config::Config;
use mintari::server::{create_router, AppContext};
use mintari_db::pool::init_memory_pool;
use tempfile::TempDir;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "mintari-test-boundary";

/// Test harness wrapping an [`AppContext`] whose media root lives in a
/// temporary directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub media: TempDir,
}

impl TestHarness {
    /// Local stylizer, publishing disabled.
    pub fn new() -> Self {
        let mut config = Config::default();
        config.publish.enabled = false;
        Self::with_config(config)
    }

    /// Use `config`, with the media root replaced by a temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        config.media.root = media.path().to_path_buf();

        let pool = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::from_config(config, pool).expect("failed to build context");

        Self { ctx, media }
    }

    pub fn router(&self) -> axum::Router {
        create_router(self.ctx.clone())
    }

    pub fn media_root(&self) -> &Path {
        self.media.path()
    }
}

/// A small RGB gradient encoded as PNG.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("failed to encode png");
    out.into_inner()
}

/// Build a `multipart/form-data` body with a single file field.
///
/// Returns the content type header value and the body.
pub fn multipart_body(field: &str, file_name: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}
