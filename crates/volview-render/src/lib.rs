//! Export pipeline and software rendering for volview.
//!
//! This crate provides:
//! - Clean (offscreen) and interactive (window) captures with state restoration
//! - Export resolution selection
//! - PNG/JPEG encoding of captured frames
//! - A headless software [`Renderer`](volview_core::Renderer) for running without a GPU

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod export;
pub mod headless;
pub mod raster;
pub mod resolution;
pub mod screenshot;
pub mod window;

pub use error::{ExportError, ExportResult};
pub use export::{
    capture_clean, capture_interactive, Capture, CaptureSource, ExportPipeline, ExportReport,
};
pub use headless::{HeadlessRenderer, HeadlessWindow};
pub use resolution::{DialogOutcome, ResolutionDialog, ResolutionPreset, CUSTOM_SIDE_RANGE};
pub use screenshot::{encode_png, save_image, save_png, ImageKind};
pub use window::WindowGrabber;
