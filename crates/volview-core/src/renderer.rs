//! The renderer capability surface.
//!
//! The rendering engine is an external collaborator. Every capability is an
//! optional trait method whose default implementation reports
//! [`BackendError::Unsupported`]; a backend overrides only what it provides.
//! Callers never talk to a [`Renderer`] directly, they go through
//! [`Backend`](crate::Backend), which skips absent capabilities silently and
//! contains every other failure at the call site.

use std::fmt;
use std::path::Path;

use glam::Vec3;

use crate::axis::VolumeAxis;
use crate::error::{BackendError, BackendResult};
use crate::transfer_function::TransferFunctionPoint;

/// Names one renderer capability, for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    LoadVolume,
    VolumeWidth,
    VolumeHeight,
    VolumeDepth,
    VolumeSpacing,
    SetColormapPreset,
    SetColormapModeCustom,
    SetTransferFunctionPoints,
    SetShowBoundingBox,
    SetBoundingBoxScale,
    SetBackgroundColor,
    SetSliceMode,
    SetSliceAxis,
    SetSliceIndex,
    CameraRotate,
    CameraZoom,
    SetCameraAngles,
    FrameCameraToBox,
    Resize,
    Render,
    CreateOffscreenTarget,
    ReadOffscreenPixels,
    ReleaseOffscreenTarget,
}

impl Capability {
    /// Returns the wire name of the capability.
    pub fn name(self) -> &'static str {
        match self {
            Capability::LoadVolume => "load_volume",
            Capability::VolumeWidth => "get_volume_width",
            Capability::VolumeHeight => "get_volume_height",
            Capability::VolumeDepth => "get_volume_depth",
            Capability::VolumeSpacing => "get_volume_spacing",
            Capability::SetColormapPreset => "set_colormap_preset",
            Capability::SetColormapModeCustom => "set_colormap_mode_custom",
            Capability::SetTransferFunctionPoints => "set_transfer_function_points",
            Capability::SetShowBoundingBox => "set_show_bounding_box",
            Capability::SetBoundingBoxScale => "set_bounding_box_scale",
            Capability::SetBackgroundColor => "set_background_color",
            Capability::SetSliceMode => "set_slice_mode",
            Capability::SetSliceAxis => "set_slice_axis",
            Capability::SetSliceIndex => "set_slice_index",
            Capability::CameraRotate => "camera_rotate",
            Capability::CameraZoom => "camera_zoom",
            Capability::SetCameraAngles => "set_camera_angles",
            Capability::FrameCameraToBox => "frame_camera_to_box",
            Capability::Resize => "resize",
            Capability::Render => "render",
            Capability::CreateOffscreenTarget => "create_offscreen_target",
            Capability::ReadOffscreenPixels => "read_offscreen_pixels",
            Capability::ReleaseOffscreenTarget => "release_offscreen_target",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A captured RGBA8 frame, rows ordered top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Creates a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let len = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(len * 4);
        for _ in 0..len {
            pixels.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels
            .get(i..i + 4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

/// Capability surface of a rendering backend.
///
/// All methods default to `Err(BackendError::Unsupported(..))`.
#[allow(unused_variables)]
pub trait Renderer {
    /// Loads a volume; `Ok(false)` means the file could not be parsed.
    fn load_volume(&mut self, path: &Path) -> BackendResult<bool> {
        Err(BackendError::Unsupported(Capability::LoadVolume))
    }

    fn volume_width(&self) -> BackendResult<u32> {
        Err(BackendError::Unsupported(Capability::VolumeWidth))
    }

    fn volume_height(&self) -> BackendResult<u32> {
        Err(BackendError::Unsupported(Capability::VolumeHeight))
    }

    fn volume_depth(&self) -> BackendResult<u32> {
        Err(BackendError::Unsupported(Capability::VolumeDepth))
    }

    /// Physical voxel spacing along x, y and z.
    fn volume_spacing(&self) -> BackendResult<Vec3> {
        Err(BackendError::Unsupported(Capability::VolumeSpacing))
    }

    fn set_colormap_preset(&mut self, index: usize) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetColormapPreset))
    }

    fn set_colormap_mode_custom(&mut self, custom: bool) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetColormapModeCustom))
    }

    fn set_transfer_function_points(
        &mut self,
        points: &[TransferFunctionPoint],
    ) -> BackendResult<()> {
        Err(BackendError::Unsupported(
            Capability::SetTransferFunctionPoints,
        ))
    }

    fn set_show_bounding_box(&mut self, show: bool) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetShowBoundingBox))
    }

    fn set_bounding_box_scale(&mut self, scale: f32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetBoundingBoxScale))
    }

    /// Sets the clear color, channels in `[0, 1]`.
    fn set_background_color(&mut self, color: Vec3) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetBackgroundColor))
    }

    fn set_slice_mode(&mut self, enabled: bool) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetSliceMode))
    }

    fn set_slice_axis(&mut self, axis: VolumeAxis) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetSliceAxis))
    }

    fn set_slice_index(&mut self, index: u32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetSliceIndex))
    }

    /// Rotates by azimuth/elevation deltas in degrees.
    fn camera_rotate(&mut self, d_azimuth: f32, d_elevation: f32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::CameraRotate))
    }

    /// Moves the camera toward the target by `delta` (negative moves away).
    fn camera_zoom(&mut self, delta: f32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::CameraZoom))
    }

    fn set_camera_angles(&mut self, azimuth_deg: f32, elevation_deg: f32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::SetCameraAngles))
    }

    fn frame_camera_to_box(&mut self) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::FrameCameraToBox))
    }

    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::Resize))
    }

    fn render(&mut self) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::Render))
    }

    /// Redirects subsequent renders into an offscreen target of the given size.
    fn create_offscreen_target(&mut self, width: u32, height: u32) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::CreateOffscreenTarget))
    }

    fn read_offscreen_pixels(&mut self) -> BackendResult<Frame> {
        Err(BackendError::Unsupported(Capability::ReadOffscreenPixels))
    }

    fn release_offscreen_target(&mut self) -> BackendResult<()> {
        Err(BackendError::Unsupported(Capability::ReleaseOffscreenTarget))
    }
}

/// A backend that provides no capabilities at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}
