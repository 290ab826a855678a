//! Encoding captured frames to image files.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use volview_core::Frame;

use crate::error::{ExportError, ExportResult};

/// Output format chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    /// Picks the format for `path` from its extension (case-insensitive).
    pub fn from_path(path: &Path) -> ExportResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "png" => Ok(ImageKind::Png),
            "jpg" | "jpeg" => Ok(ImageKind::Jpeg),
            _ => Err(ExportError::UnsupportedFormat(extension)),
        }
    }
}

fn to_image(frame: &Frame) -> ExportResult<ImageBuffer<Rgba<u8>, Vec<u8>>> {
    // frames are top-left origin, so no vertical flip needed
    ImageBuffer::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or(ExportError::InvalidImageData)
}

/// Saves a frame, choosing PNG or JPEG from the file extension.
pub fn save_image(path: &Path, frame: &Frame) -> ExportResult<ImageKind> {
    let kind = ImageKind::from_path(path)?;
    let img = to_image(frame)?;
    match kind {
        ImageKind::Png => img.save_with_format(path, ImageFormat::Png)?,
        ImageKind::Jpeg => {
            // JPEG has no alpha channel
            let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
            rgb.save_with_format(path, ImageFormat::Jpeg)?;
        }
    }
    log::info!("saved {}x{} image to {}", frame.width, frame.height, path.display());
    Ok(kind)
}

/// Saves a frame losslessly, rewriting the extension to `.png` if needed.
///
/// Returns the path actually written.
pub fn save_png(path: &Path, frame: &Frame) -> ExportResult<PathBuf> {
    let path = if ImageKind::from_path(path).ok() == Some(ImageKind::Png) {
        path.to_path_buf()
    } else {
        path.with_extension("png")
    };
    save_image(&path, frame)?;
    Ok(path)
}

/// Encodes a frame to PNG in memory.
pub fn encode_png(frame: &Frame) -> ExportResult<Vec<u8>> {
    let img = to_image(frame)?;
    let mut buffer = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
