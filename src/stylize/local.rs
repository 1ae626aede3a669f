//! In-process colour enhancement.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, ImageReader};
use mintari_common::{Error, Result};

use super::Stylizer;

/// Stylizer that boosts colour saturation by a fixed factor.
///
/// The output is written to `{output_dir}/{tag}_{input file name}` in the
/// same format as the input.
pub struct LocalFilterStylizer {
    output_dir: PathBuf,
    tag: String,
    factor: f32,
}

impl LocalFilterStylizer {
    pub fn new(output_dir: PathBuf, tag: String, factor: f32) -> Self {
        Self {
            output_dir,
            tag,
            factor,
        }
    }

    /// Where the derivative of `input` is written.
    pub fn output_path(&self, input: &Path) -> Result<PathBuf> {
        let base = input
            .file_name()
            .ok_or_else(|| Error::invalid_input(format!("{} has no file name", input.display())))?;
        Ok(self
            .output_dir
            .join(format!("{}_{}", self.tag, base.to_string_lossy())))
    }

    fn run(input: &Path, output: &Path, factor: f32) -> Result<()> {
        let reader = ImageReader::open(input)?
            .with_guessed_format()
            .map_err(Error::Io)?;
        let sniffed = reader.format().ok_or_else(|| {
            Error::invalid_input(format!("{} is not a recognised image", input.display()))
        })?;
        // Encode by the output extension; sniffed format only when it has none we know.
        let format = ImageFormat::from_path(output).unwrap_or(sniffed);
        let img = reader.decode().map_err(|e| {
            Error::invalid_input(format!("failed to decode {}: {}", input.display(), e))
        })?;

        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        enhance_color(&img, factor)
            .save_with_format(output, format)
            .map_err(|e| Error::internal(format!("failed to write {}: {}", output.display(), e)))
    }
}

#[async_trait]
impl Stylizer for LocalFilterStylizer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn stylize(&self, input: &Path) -> Result<PathBuf> {
        let output = self.output_path(input)?;
        let factor = self.factor;

        let (src, dst) = (input.to_path_buf(), output.clone());
        tokio::task::spawn_blocking(move || Self::run(&src, &dst, factor))
            .await
            .map_err(|e| Error::internal(format!("stylize task failed: {}", e)))??;

        tracing::debug!(
            input = %input.display(),
            output = %output.display(),
            factor,
            "Applied colour enhancement"
        );

        Ok(output)
    }
}

/// Blend every pixel between its grey value and itself by `factor`.
///
/// `0.0` yields a greyscale image, `1.0` the original, larger values push
/// colours further from grey. Alpha is preserved. Grey uses the ITU-R 601-2
/// luma weights in 16-bit fixed point.
pub fn enhance_color(image: &DynamicImage, factor: f32) -> DynamicImage {
    if image.color().has_alpha() {
        let mut buf = image.to_rgba8();
        for pixel in buf.pixels_mut() {
            saturate(&mut pixel.0[..3], factor);
        }
        DynamicImage::ImageRgba8(buf)
    } else {
        let mut buf = image.to_rgb8();
        for pixel in buf.pixels_mut() {
            saturate(&mut pixel.0, factor);
        }
        DynamicImage::ImageRgb8(buf)
    }
}

fn saturate(rgb: &mut [u8], factor: f32) {
    let (r, g, b) = (u32::from(rgb[0]), u32::from(rgb[1]), u32::from(rgb[2]));
    let luma = ((19595 * r + 38470 * g + 7471 * b + 0x8000) >> 16) as f32;

    for channel in rgb.iter_mut() {
        let value = luma + factor * (f32::from(*channel) - luma);
        // Clamp, then truncate toward zero.
        *channel = value.clamp(0.0, 255.0) as u8;
    }
}
