//! UI layer for volview using egui.
//!
//! Panels never touch controllers directly. They read a [`UiSnapshot`] and
//! return [`volview_core::Action`]s for the viewer to apply.

#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod export_dialog;
pub mod panels;
pub mod transfer_function_editor;
pub mod viewer_ui;
pub mod viewport;

pub use export_dialog::{CaptureKind, ExportDialog};
pub use panels::*;
pub use transfer_function_editor::TransferFunctionEditor;
pub use viewer_ui::{UiSnapshot, ViewerUi};
pub use viewport::{build_notifications, scroll_to_angle, ViewportInput};
