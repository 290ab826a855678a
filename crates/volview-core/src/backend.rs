//! Fault-containing wrapper around a [`Renderer`].

use std::path::Path;

use glam::Vec3;

use crate::axis::{VolumeAxis, VolumeDims};
use crate::error::{BackendError, BackendResult};
use crate::renderer::{Capability, Frame, Renderer};
use crate::transfer_function::TransferFunctionPoint;

/// A backend failure that was contained at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFault {
    pub capability: Capability,
    pub error: BackendError,
}

/// The boundary every controller pushes through.
///
/// One-way pushes never fail from the caller's point of view: an absent
/// capability is skipped with a debug log, any other error is logged and
/// queued as a [`BackendFault`] for the owner to report. Operations whose
/// outcome matters to the caller (loading, offscreen capture) have `try_`
/// variants that return the result instead.
pub struct Backend {
    renderer: Box<dyn Renderer>,
    faults: Vec<BackendFault>,
}

impl Backend {
    /// Wraps a renderer.
    pub fn new(renderer: impl Renderer + 'static) -> Self {
        Self::from_boxed(Box::new(renderer))
    }

    /// Wraps an already boxed renderer.
    pub fn from_boxed(renderer: Box<dyn Renderer>) -> Self {
        Self {
            renderer,
            faults: Vec::new(),
        }
    }

    /// Returns the wrapped renderer.
    pub fn renderer(&self) -> &dyn Renderer {
        self.renderer.as_ref()
    }

    /// Returns the wrapped renderer mutably, bypassing fault containment.
    pub fn renderer_mut(&mut self) -> &mut dyn Renderer {
        self.renderer.as_mut()
    }

    /// Drains the faults recorded since the last call.
    pub fn take_faults(&mut self) -> Vec<BackendFault> {
        std::mem::take(&mut self.faults)
    }

    /// Returns whether any fault is waiting to be reported.
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }

    /// Records the outcome of a call, returning its value on success.
    pub fn contain<T>(&mut self, capability: Capability, result: BackendResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(BackendError::Unsupported(_)) => {
                log::debug!("renderer lacks {capability}, skipping");
                None
            }
            Err(error) => {
                log::warn!("renderer call {capability} failed: {error}");
                self.faults.push(BackendFault { capability, error });
                None
            }
        }
    }

    fn push(
        &mut self,
        capability: Capability,
        call: impl FnOnce(&mut dyn Renderer) -> BackendResult<()>,
    ) {
        let result = call(self.renderer.as_mut());
        self.contain(capability, result);
    }

    /// Loads a volume, returning the raw outcome.
    pub fn try_load_volume(&mut self, path: &Path) -> BackendResult<bool> {
        self.renderer.load_volume(path)
    }

    /// Reports the loaded volume's dimensions; absent or failing getters read as 0.
    pub fn volume_dims(&mut self) -> VolumeDims {
        let width = self.renderer.volume_width();
        let height = self.renderer.volume_height();
        let depth = self.renderer.volume_depth();
        VolumeDims {
            width: self.contain(Capability::VolumeWidth, width).unwrap_or(0),
            height: self.contain(Capability::VolumeHeight, height).unwrap_or(0),
            depth: self.contain(Capability::VolumeDepth, depth).unwrap_or(0),
        }
    }

    /// Reports voxel spacing, defaulting to unit spacing.
    pub fn volume_spacing(&mut self) -> Vec3 {
        let spacing = self.renderer.volume_spacing();
        self.contain(Capability::VolumeSpacing, spacing)
            .unwrap_or(Vec3::ONE)
    }

    pub fn set_colormap_preset(&mut self, index: usize) {
        self.push(Capability::SetColormapPreset, |r| {
            r.set_colormap_preset(index)
        });
    }

    pub fn set_colormap_mode_custom(&mut self, custom: bool) {
        self.push(Capability::SetColormapModeCustom, |r| {
            r.set_colormap_mode_custom(custom)
        });
    }

    pub fn set_transfer_function_points(&mut self, points: &[TransferFunctionPoint]) {
        self.push(Capability::SetTransferFunctionPoints, |r| {
            r.set_transfer_function_points(points)
        });
    }

    pub fn set_show_bounding_box(&mut self, show: bool) {
        self.push(Capability::SetShowBoundingBox, |r| {
            r.set_show_bounding_box(show)
        });
    }

    pub fn set_bounding_box_scale(&mut self, scale: f32) {
        self.push(Capability::SetBoundingBoxScale, |r| {
            r.set_bounding_box_scale(scale)
        });
    }

    pub fn set_background_color(&mut self, color: Vec3) {
        self.push(Capability::SetBackgroundColor, |r| {
            r.set_background_color(color)
        });
    }

    pub fn set_slice_mode(&mut self, enabled: bool) {
        self.push(Capability::SetSliceMode, |r| r.set_slice_mode(enabled));
    }

    pub fn set_slice_axis(&mut self, axis: VolumeAxis) {
        self.push(Capability::SetSliceAxis, |r| r.set_slice_axis(axis));
    }

    pub fn set_slice_index(&mut self, index: u32) {
        self.push(Capability::SetSliceIndex, |r| r.set_slice_index(index));
    }

    pub fn camera_rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.push(Capability::CameraRotate, |r| {
            r.camera_rotate(d_azimuth, d_elevation)
        });
    }

    pub fn camera_zoom(&mut self, delta: f32) {
        self.push(Capability::CameraZoom, |r| r.camera_zoom(delta));
    }

    /// Sets absolute camera angles, returning the raw outcome.
    pub fn try_set_camera_angles(&mut self, azimuth_deg: f32, elevation_deg: f32) -> BackendResult<()> {
        self.renderer.set_camera_angles(azimuth_deg, elevation_deg)
    }

    /// Frames the camera to the volume box, returning the raw outcome.
    pub fn try_frame_camera_to_box(&mut self) -> BackendResult<()> {
        self.renderer.frame_camera_to_box()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.push(Capability::Resize, |r| r.resize(width, height));
    }

    pub fn render(&mut self) {
        self.push(Capability::Render, |r| r.render());
    }

    pub fn try_resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.renderer.resize(width, height)
    }

    pub fn try_render(&mut self) -> BackendResult<()> {
        self.renderer.render()
    }

    pub fn try_create_offscreen_target(&mut self, width: u32, height: u32) -> BackendResult<()> {
        self.renderer.create_offscreen_target(width, height)
    }

    pub fn try_read_offscreen_pixels(&mut self) -> BackendResult<Frame> {
        self.renderer.read_offscreen_pixels()
    }

    pub fn release_offscreen_target(&mut self) {
        self.push(Capability::ReleaseOffscreenTarget, |r| {
            r.release_offscreen_target()
        });
    }
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("pending_faults", &self.faults.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{RecordingRenderer, RendererCall};
    use crate::renderer::NullRenderer;

    #[test]
    fn test_absent_capabilities_are_silent() {
        let mut backend = Backend::new(NullRenderer);
        backend.set_slice_mode(true);
        backend.render();
        assert_eq!(backend.volume_dims(), VolumeDims::default());
        assert_eq!(backend.volume_spacing(), Vec3::ONE);
        assert!(!backend.has_faults());
    }

    #[test]
    fn test_failures_are_recorded() {
        let renderer = RecordingRenderer::new().failing(Capability::Render);
        let mut backend = Backend::new(renderer);
        backend.render();
        let faults = backend.take_faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].capability, Capability::Render);
        assert!(backend.take_faults().is_empty());
    }

    #[test]
    fn test_pushes_reach_renderer() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let mut backend = Backend::new(renderer);
        backend.set_slice_index(4);
        assert_eq!(log.calls(), vec![RendererCall::SetSliceIndex(4)]);
    }
}
