//! User intents produced by the UI and applied by the viewer.

use std::path::PathBuf;

use glam::Vec3;

use crate::axis::VolumeAxis;
use crate::transfer_function::{ColormapMode, RawTick, TableEdit, TransferFunctionPoint};

/// One user intent.
///
/// Panels only emit these; the viewer routes each to the owning controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // File
    Open(PathBuf),
    ClearRecent,

    // Transfer function
    AddPoint(Option<TransferFunctionPoint>),
    RemovePoints(Vec<usize>),
    SetColormapMode(ColormapMode),
    SelectPreset(usize),
    ApplyCustom,
    ResetToPreset(usize),
    CurveEdited(Vec<RawTick>),
    TableEdited(TableEdit),

    // Camera
    Rotate { dx: f32, dy: f32 },
    /// Wheel input as a raw angle delta (120 per notch).
    Wheel { angle_delta: f32, fast: bool },
    FrameToBox,
    AlignToAxis(VolumeAxis),

    // Slicing
    SetSliceEnabled(bool),
    SetSliceAxis(VolumeAxis),
    SliderChanged(i64),
    StepperChanged(i64),
    SetAutoSweep(bool),
    SetSweepRate(f32),

    // View
    SetShowBoundingBox(bool),
    SetBoundingBoxScale(f32),
    SetBackgroundColor(Vec3),
    SetOverlayVisible(bool),
    Resize { width: u32, height: u32 },

    // Export
    CaptureInteractive(PathBuf),
    CaptureClean {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

