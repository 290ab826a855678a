//! Spherical-coordinate camera driven by mouse gestures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::axis::VolumeAxis;
use crate::backend::Backend;
use crate::error::{BackendError, BackendResult};

/// Elevation limit; the camera never looks straight down an up axis.
pub const MAX_ELEVATION_DEG: f32 = 89.0;

/// Smallest allowed distance to the target.
pub const MIN_DISTANCE: f32 = 0.1;

/// Wheel angle delta that makes up one step.
pub const WHEEL_STEP_ANGLE: f32 = 120.0;

/// Vertical field of view assumed when framing.
pub const FIELD_OF_VIEW_DEG: f32 = 45.0;

/// Orbit state around the volume centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub azimuth_deg: f32,
    /// Always within `[-89, 89]`.
    pub elevation_deg: f32,
    /// Always `>= 0.1`.
    pub distance: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            distance: 5.0,
        }
    }
}

impl CameraState {
    /// Returns the eye position relative to the target.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        let (a, e) = (
            self.azimuth_deg.to_radians(),
            self.elevation_deg.to_radians(),
        );
        Vec3::new(
            self.distance * e.cos() * a.sin(),
            self.distance * e.sin(),
            self.distance * e.cos() * a.cos(),
        )
    }
}

/// Canonical `(azimuth, elevation)` looking down an axis.
pub fn axis_angles(axis: VolumeAxis) -> (f32, f32) {
    match axis {
        VolumeAxis::Z => (0.0, 0.0),
        VolumeAxis::Y => (0.0, MAX_ELEVATION_DEG),
        VolumeAxis::X => (90.0, 0.0),
    }
}

/// Converts a wheel angle delta to zoom steps.
pub fn wheel_steps(angle_delta: f32) -> f32 {
    angle_delta / WHEEL_STEP_ANGLE
}

/// Turns drags and wheel steps into camera moves.
#[derive(Debug, Clone)]
pub struct CameraController {
    state: CameraState,
    rotate_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.25, 0.5)
    }
}

impl CameraController {
    /// Creates a controller with the given degrees-per-pixel and distance-per-step.
    pub fn new(rotate_sensitivity: f32, zoom_sensitivity: f32) -> Self {
        Self {
            state: CameraState::default(),
            rotate_sensitivity,
            zoom_sensitivity,
        }
    }

    /// Returns the tracked orbit state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Orbits by a mouse drag of `(dx, dy)` pixels.
    pub fn rotate(&mut self, backend: &mut Backend, dx: f32, dy: f32) {
        let d_azimuth = dx * self.rotate_sensitivity;
        let d_elevation = dy * self.rotate_sensitivity;
        self.state.azimuth_deg += d_azimuth;
        self.state.elevation_deg = (self.state.elevation_deg + d_elevation)
            .clamp(-MAX_ELEVATION_DEG, MAX_ELEVATION_DEG);
        backend.camera_rotate(d_azimuth, d_elevation);
    }

    /// Moves toward the target by `wheel_steps`, twice as far when `fast`.
    pub fn zoom(&mut self, backend: &mut Backend, wheel_steps: f32, fast: bool) {
        let factor = if fast { 2.0 } else { 1.0 };
        let delta = wheel_steps * self.zoom_sensitivity * factor;
        self.state.distance = (self.state.distance - delta).max(MIN_DISTANCE);
        backend.camera_zoom(delta);
    }

    /// Frames the unscaled volume box from the canonical front view.
    ///
    /// Distance and both angles reset; every non-camera setting is left
    /// alone. Without a loaded volume nothing changes.
    pub fn frame_to_box(&mut self, backend: &mut Backend) -> BackendResult<()> {
        let dims = backend.volume_dims();
        let spacing = backend.volume_spacing();
        skip_unsupported(backend.try_frame_camera_to_box())?;
        if !dims.is_empty() {
            self.state = CameraState {
                azimuth_deg: 0.0,
                elevation_deg: 0.0,
                distance: framing_distance(dims.extent_vec() * spacing),
            };
        }
        Ok(())
    }

    /// Frames the box, then looks down `axis`.
    ///
    /// A framing failure does not cancel the axis view; it is returned once
    /// the angles are applied. Applying the same axis twice leaves the same
    /// state.
    pub fn align_to_axis(&mut self, backend: &mut Backend, axis: VolumeAxis) -> BackendResult<()> {
        let framed = self.frame_to_box(backend);
        if let Err(err) = &framed {
            log::debug!("framing before axis view failed: {err}");
        }
        let (azimuth, elevation) = axis_angles(axis);
        skip_unsupported(backend.try_set_camera_angles(azimuth, elevation))?;
        self.state.azimuth_deg = azimuth;
        self.state.elevation_deg = elevation;
        log::debug!("camera aligned to {} axis", axis.name());
        framed
    }
}

fn skip_unsupported(result: BackendResult<()>) -> BackendResult<()> {
    match result {
        Err(BackendError::Unsupported(capability)) => {
            log::debug!("renderer lacks {capability}, skipping");
            Ok(())
        }
        other => other,
    }
}

/// Distance at which a box of the given size fills the field of view.
pub fn framing_distance(size: Vec3) -> f32 {
    let radius = size.length() * 0.5;
    let half_fov = (FIELD_OF_VIEW_DEG * 0.5).to_radians();
    (radius / half_fov.tan()).max(MIN_DISTANCE)
}
