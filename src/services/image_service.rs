use anyhow::{Context, Result, anyhow};
use image::imageops::FilterType;
use image::{ImageFormat, ImageReader, load_from_memory};
use std::path::Path;

pub const PROFILE_PICTURE_SIZE: u32 = 256;

#[derive(Clone, Default)]
pub struct ImageService;

impl ImageService {
    pub fn new() -> Self {
        Self
    }

    pub fn is_valid_image(&self, bytes: &[u8]) -> bool {
        load_from_memory(bytes).is_ok()
    }

    /// Overwrites the image at `path` with a 256x256 version in its own
    /// format, aspect ratio discarded.
    pub fn resize_profile_picture(&self, path: &Path) -> Result<()> {
        let reader = ImageReader::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?
            .with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| anyhow!("unrecognized image format in {}", path.display()))?;
        // Formats without an encoder are rewritten as PNG under the same name.
        let format = if format.writing_enabled() {
            format
        } else {
            ImageFormat::Png
        };
        let image = reader
            .decode()
            .with_context(|| format!("failed to decode {}", path.display()))?;

        let resized = image.resize_exact(
            PROFILE_PICTURE_SIZE,
            PROFILE_PICTURE_SIZE,
            FilterType::Lanczos3,
        );
        resized
            .save_with_format(path, format)
            .with_context(|| format!("failed to encode {}", path.display()))?;

        log::debug!("Resized profile picture {}", path.display());
        Ok(())
    }
}
