//! Core controllers for volview.
//!
//! This crate holds the interactive control surface of the volume viewer:
//! - [`TransferFunctionController`] for colormap presets and custom control points
//! - [`CameraController`] for orbit, zoom and axis-aligned views
//! - [`SliceNavigator`] for slice axis/index and auto-sweep
//! - [`HistoryStore`] for recently opened files
//! - The [`Renderer`] capability trait and the fault-containing [`Backend`]
//!
//! Controllers own their state and push committed values through a
//! [`Backend`]; views are attached as trait objects and kept in sync with
//! [`ViewSync`].

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// State structs legitimately carry several boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod action;
pub mod axis;
pub mod backend;
pub mod camera;
pub mod error;
pub mod history;
pub mod notification;
pub mod options;
pub mod overlay;
pub mod recording;
pub mod renderer;
pub mod slice;
pub mod sync;
pub mod transfer_function;

pub use action::Action;
pub use axis::{VolumeAxis, VolumeDims};
pub use backend::{Backend, BackendFault};
pub use camera::{CameraController, CameraState};
pub use error::{BackendError, BackendResult, Result, VolviewError};
pub use history::{HistoryStore, HISTORY_CAPACITY};
pub use notification::{Notification, NotificationLevel, Notifier};
pub use options::Options;
pub use overlay::{FpsCounter, Overlay};
pub use recording::{CallLog, RecordingRenderer, RendererCall};
pub use renderer::{Capability, Frame, NullRenderer, Renderer};
pub use slice::{IndexOrigin, IndexView, PeriodicTask, SliceNavigator, SliceState};
pub use sync::{SyncState, ViewSync};
pub use transfer_function::{
    ColormapMode, ColormapPreset, CurveTick, CurveView, EditOrigin, RawTick, TableEdit, TableRow,
    TableView, TransferFunction, TransferFunctionController, TransferFunctionPoint, PRESETS,
};

// Re-export glam types for convenience
pub use glam::Vec3;
