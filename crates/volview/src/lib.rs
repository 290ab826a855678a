//! volview: interactive control surface for a volume viewer.
//!
//! The viewer turns user gestures into consistent state for a rendering
//! engine: a colormap/transfer-function editor, an orbit camera, a slice
//! navigator with auto-sweep, image export and a recent-files list.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::time::Instant;
//!
//! use volview::*;
//!
//! init_logging();
//!
//! let renderer = HeadlessRenderer::new(800, 600).with_volume(
//!     "/data/head.nii",
//!     VolumeDims::new(256, 256, 128),
//!     Vec3::ONE,
//! );
//! let mut viewer = Viewer::headless(renderer, Options::default(), Instant::now());
//! viewer.open(Path::new("/data/head.nii"), Instant::now());
//! viewer.dispatch(Action::AlignToAxis(VolumeAxis::Y), Instant::now());
//! viewer.tick(Instant::now());
//! viewer.export_clean(Path::new("head.png"), 1920, 1080, Instant::now());
//! ```
//!
//! # Architecture
//!
//! - `volview-core` holds the controllers, the [`Renderer`] capability trait
//!   and the fault-containing [`Backend`].
//! - `volview-render` holds the export pipeline and a software renderer.
//! - `volview-ui` holds egui panels that emit [`Action`]s.
//!
//! [`Viewer`] ties them together.

mod viewer;

pub use viewer::{Viewer, WINDOW_TITLE};

pub use volview_core::{
    Action, Backend, BackendError, BackendFault, CallLog, CameraController, CameraState,
    Capability, ColormapMode, Frame, HistoryStore, Notification, NotificationLevel, Notifier,
    NullRenderer, Options, Overlay, RawTick, RecordingRenderer, Renderer, RendererCall, Result,
    SliceNavigator, SliceState, TableEdit, TransferFunction, TransferFunctionController,
    TransferFunctionPoint, Vec3, VolumeAxis, VolumeDims, VolviewError, PRESETS,
};
pub use volview_render::{
    CaptureSource, DialogOutcome, ExportError, ExportPipeline, ExportReport, HeadlessRenderer,
    HeadlessWindow, ResolutionPreset, WindowGrabber,
};
pub use volview_ui::{UiSnapshot, ViewSettings, ViewerUi};

/// Initializes `env_logger` from `RUST_LOG`. Calling it again is a no-op.
pub fn init_logging() {
    if env_logger::try_init().is_ok() {
        log::debug!("logging initialized");
    }
}

/// Loads options from `path`, falling back to defaults when the file is absent.
///
/// A malformed file is an error.
pub fn load_options(path: &std::path::Path) -> Result<Options> {
    let options = Options::load(path)?;
    log::debug!("options resolved from {}", path.display());
    Ok(options)
}
