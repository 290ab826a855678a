//! Export error types.

use thiserror::Error;
use volview_core::BackendError;

/// Errors that can occur while capturing or saving a frame.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The renderer failed while producing the frame.
    #[error("capture failed: {0}")]
    Capture(#[from] BackendError),

    /// The host window could not be read back.
    #[error("window grab failed: {0}")]
    WindowGrab(String),

    /// Failed to write the output file.
    #[error("failed to save image: {0}")]
    IoError(#[from] std::io::Error),

    /// Image encoding error.
    #[error("image encoding error: {0}")]
    ImageError(#[from] image::ImageError),

    /// The file extension names no supported format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Pixel buffer length does not match the frame size.
    #[error("invalid image data")]
    InvalidImageData,
}

/// A specialized Result type for export operations.
pub type ExportResult<T> = std::result::Result<T, ExportError>;
