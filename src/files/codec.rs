use crate::error::RemovalError;
use image::{ImageFormat, RgbaImage};
use std::fs;
use std::path::Path;

/// Decode an image file into an 8-bit RGBA buffer
pub fn decode(path: &Path) -> Result<RgbaImage, RemovalError> {
    let img = image::open(path)
        .map_err(|e| RemovalError::Decode(format!("{}: {}", path.display(), e)))?;
    Ok(img.into_rgba8())
}

/// Write an RGBA buffer as PNG, creating parent directories as needed
pub fn encode(image: &RgbaImage, path: &Path) -> Result<(), RemovalError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| RemovalError::Encode(format!("{}: {}", path.display(), e)))
}
