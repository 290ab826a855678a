//! A renderer that records every call it receives.
//!
//! Useful for embedders that want to run the controllers without a GPU, and
//! for asserting what reached the rendering engine.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::Vec3;

use crate::axis::{VolumeAxis, VolumeDims};
use crate::error::{BackendError, BackendResult};
use crate::renderer::{Capability, Frame, Renderer};
use crate::transfer_function::TransferFunctionPoint;

/// One call observed by a [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq)]
pub enum RendererCall {
    LoadVolume(PathBuf),
    SetColormapPreset(usize),
    SetColormapModeCustom(bool),
    SetTransferFunctionPoints(Vec<TransferFunctionPoint>),
    SetShowBoundingBox(bool),
    SetBoundingBoxScale(f32),
    SetBackgroundColor([f32; 3]),
    SetSliceMode(bool),
    SetSliceAxis(VolumeAxis),
    SetSliceIndex(u32),
    CameraRotate(f32, f32),
    CameraZoom(f32),
    SetCameraAngles(f32, f32),
    FrameCameraToBox,
    Resize(u32, u32),
    Render,
    CreateOffscreenTarget(u32, u32),
    ReadOffscreenPixels,
    ReleaseOffscreenTarget,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Vec<RendererCall>,
    failing: HashSet<Capability>,
}

/// Shared view of a [`RecordingRenderer`]'s call log and failure switches.
///
/// Stays valid after the renderer has been moved into a
/// [`Backend`](crate::Backend).
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    shared: Rc<RefCell<Shared>>,
}

impl CallLog {
    /// Returns a copy of all recorded calls.
    pub fn calls(&self) -> Vec<RendererCall> {
        self.shared.borrow().calls.clone()
    }

    /// Returns the most recent call.
    pub fn last(&self) -> Option<RendererCall> {
        self.shared.borrow().calls.last().cloned()
    }

    /// Counts recorded calls matching a predicate.
    pub fn count(&self, pred: impl Fn(&RendererCall) -> bool) -> usize {
        self.shared.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    /// Forgets all recorded calls.
    pub fn clear(&self) {
        self.shared.borrow_mut().calls.clear();
    }

    /// Makes every subsequent call to `capability` fail.
    pub fn fail(&self, capability: Capability) {
        self.shared.borrow_mut().failing.insert(capability);
    }

    /// Lets `capability` succeed again.
    pub fn recover(&self, capability: Capability) {
        self.shared.borrow_mut().failing.remove(&capability);
    }

    fn record(&self, call: RendererCall) {
        self.shared.borrow_mut().calls.push(call);
    }

    fn is_failing(&self, capability: Capability) -> bool {
        self.shared.borrow().failing.contains(&capability)
    }
}

/// A renderer that records calls and simulates a loaded volume.
///
/// Offscreen reads return a frame filled with the current background color.
#[derive(Debug)]
pub struct RecordingRenderer {
    log: CallLog,
    dims: VolumeDims,
    spacing: Vec3,
    volumes: HashMap<PathBuf, VolumeDims>,
    unsupported: HashSet<Capability>,
    background: Vec3,
    offscreen: Option<(u32, u32)>,
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingRenderer {
    /// Creates a renderer with no volume loaded.
    pub fn new() -> Self {
        Self {
            log: CallLog::default(),
            dims: VolumeDims::default(),
            spacing: Vec3::ONE,
            volumes: HashMap::new(),
            unsupported: HashSet::new(),
            background: Vec3::new(0.1, 0.1, 0.2),
            offscreen: None,
        }
    }

    /// Pretends a volume of the given size is already loaded.
    pub fn with_dims(mut self, dims: VolumeDims) -> Self {
        self.dims = dims;
        self
    }

    /// Sets the voxel spacing reported for loaded volumes.
    pub fn with_spacing(mut self, spacing: Vec3) -> Self {
        self.spacing = spacing;
        self
    }

    /// Registers a path that `load_volume` accepts, with its dimensions.
    pub fn with_volume(mut self, path: impl Into<PathBuf>, dims: VolumeDims) -> Self {
        self.volumes.insert(path.into(), dims);
        self
    }

    /// Removes a capability from this backend.
    pub fn without(mut self, capability: Capability) -> Self {
        self.unsupported.insert(capability);
        self
    }

    /// Makes a capability fail from the start.
    pub fn failing(self, capability: Capability) -> Self {
        self.log.fail(capability);
        self
    }

    /// Returns a handle on the call log.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn enter(&self, capability: Capability, call: RendererCall) -> BackendResult<()> {
        if self.unsupported.contains(&capability) {
            return Err(BackendError::Unsupported(capability));
        }
        self.log.record(call);
        if self.log.is_failing(capability) {
            return Err(BackendError::failed(capability, "simulated failure"));
        }
        Ok(())
    }

    fn query(&self, capability: Capability) -> BackendResult<()> {
        if self.unsupported.contains(&capability) {
            return Err(BackendError::Unsupported(capability));
        }
        if self.log.is_failing(capability) {
            return Err(BackendError::failed(capability, "simulated failure"));
        }
        Ok(())
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Renderer for RecordingRenderer {
    fn load_volume(&mut self, path: &Path) -> BackendResult<bool> {
        self.enter(
            Capability::LoadVolume,
            RendererCall::LoadVolume(path.to_path_buf()),
        )?;
        match self.volumes.get(path) {
            Some(dims) => {
                self.dims = *dims;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn volume_width(&self) -> BackendResult<u32> {
        self.query(Capability::VolumeWidth)?;
        Ok(self.dims.width)
    }

    fn volume_height(&self) -> BackendResult<u32> {
        self.query(Capability::VolumeHeight)?;
        Ok(self.dims.height)
    }

    fn volume_depth(&self) -> BackendResult<u32> {
        self.query(Capability::VolumeDepth)?;
        Ok(self.dims.depth)
    }

    fn volume_spacing(&self) -> BackendResult<Vec3> {
        self.query(Capability::VolumeSpacing)?;
        Ok(self.spacing)
    }

    fn set_colormap_preset(&mut self, index: usize) -> BackendResult<()> {
        self.enter(
            Capability::SetColormapPreset,
            RendererCall::SetColormapPreset(index),
        )
    }

    fn set_colormap_mode_custom(&mut self, custom: bool) -> BackendResult<()> {
        self.enter(
            Capability::SetColormapModeCustom,
            RendererCall::SetColormapModeCustom(custom),
        )
    }

    fn set_transfer_function_points(
        &mut self,
        points: &[TransferFunctionPoint],
    ) -> BackendResult<()> {
        self.enter(
            Capability::SetTransferFunctionPoints,
            RendererCall::SetTransferFunctionPoints(points.to_vec()),
        )
    }

    fn set_show_bounding_box(&mut self, show: bool) -> BackendResult<()> {
        self.enter(
            Capability::SetShowBoundingBox,
            RendererCall::SetShowBoundingBox(show),
        )
    }

    fn set_bounding_box_scale(&mut self, scale: f32) -> BackendResult<()> {
        self.enter(
            Capability::SetBoundingBoxScale,
            RendererCall::SetBoundingBoxScale(scale),
        )
    }

    fn set_background_color(&mut self, color: Vec3) -> BackendResult<()> {
        self.enter(
            Capability::SetBackgroundColor,
            RendererCall::SetBackgroundColor(color.to_array()),
        )?;
        self.background = color;
        Ok(())
    }

    fn set_slice_mode(&mut self, enabled: bool) -> BackendResult<()> {
        self.enter(Capability::SetSliceMode, RendererCall::SetSliceMode(enabled))
    }

    fn set_slice_axis(&mut self, axis: VolumeAxis) -> BackendResult<()> {
        self.enter(Capability::SetSliceAxis, RendererCall::SetSliceAxis(axis))
    }

    fn set_slice_index(&mut self, index: u32) -> BackendResult<()> {
        self.enter(Capability::SetSliceIndex, RendererCall::SetSliceIndex(index))
    }

    fn camera_rotate(&mut self, d_azimuth: f32, d_elevation: f32) -> BackendResult<()> {
        self.enter(
            Capability::CameraRotate,
            RendererCall::CameraRotate(d_azimuth, d_elevation),
        )
    }

    fn camera_zoom(&mut self, delta: f32) -> BackendResult<()> {
        self.enter(Capability::CameraZoom, RendererCall::CameraZoom(delta))
    }

    fn set_camera_angles(&mut self, azimuth_deg: f32, elevation_deg: f32) -> BackendResult<()> {
        self.enter(
            Capability::SetCameraAngles,
            RendererCall::SetCameraAngles(azimuth_deg, elevation_deg),
        )
    }

    fn frame_camera_to_box(&mut self) -> BackendResult<()> {
        self.enter(Capability::FrameCameraToBox, RendererCall::FrameCameraToBox)
    }

    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.enter(Capability::Resize, RendererCall::Resize(width, height))?;
        if let Some(target) = self.offscreen.as_mut() {
            *target = (width, height);
        }
        Ok(())
    }

    fn render(&mut self) -> BackendResult<()> {
        self.enter(Capability::Render, RendererCall::Render)
    }

    fn create_offscreen_target(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.enter(
            Capability::CreateOffscreenTarget,
            RendererCall::CreateOffscreenTarget(width, height),
        )?;
        self.offscreen = Some((width, height));
        Ok(())
    }

    fn read_offscreen_pixels(&mut self) -> BackendResult<Frame> {
        self.enter(
            Capability::ReadOffscreenPixels,
            RendererCall::ReadOffscreenPixels,
        )?;
        let (width, height) = self.offscreen.ok_or_else(|| {
            BackendError::failed(Capability::ReadOffscreenPixels, "no offscreen target")
        })?;
        let bg = self.background;
        Ok(Frame::solid(
            width,
            height,
            [to_u8(bg.x), to_u8(bg.y), to_u8(bg.z), 255],
        ))
    }

    fn release_offscreen_target(&mut self) -> BackendResult<()> {
        self.enter(
            Capability::ReleaseOffscreenTarget,
            RendererCall::ReleaseOffscreenTarget,
        )?;
        self.offscreen = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_known_and_unknown_paths() {
        let mut renderer =
            RecordingRenderer::new().with_volume("/data/head.nii", VolumeDims::new(4, 5, 6));
        assert_eq!(renderer.load_volume(Path::new("/data/other.nii")), Ok(false));
        assert_eq!(renderer.volume_depth(), Ok(0));
        assert_eq!(renderer.load_volume(Path::new("/data/head.nii")), Ok(true));
        assert_eq!(renderer.volume_depth(), Ok(6));
    }

    #[test]
    fn test_failure_switch() {
        let mut renderer = RecordingRenderer::new();
        let log = renderer.log();
        log.fail(Capability::Render);
        assert!(renderer.render().is_err());
        log.recover(Capability::Render);
        assert!(renderer.render().is_ok());
        assert_eq!(log.count(|c| *c == RendererCall::Render), 2);
    }

    #[test]
    fn test_offscreen_frame_uses_background() {
        let mut renderer = RecordingRenderer::new();
        renderer.set_background_color(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        renderer.create_offscreen_target(8, 4).unwrap();
        let frame = renderer.read_offscreen_pixels().unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
        assert_eq!(frame.pixel(0, 0), Some([255, 0, 0, 255]));
    }
}
