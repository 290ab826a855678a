//! A software renderer and window for running without a GPU.
//!
//! Draws the background, the volume's bounding box and, in slice mode, the
//! outline of the current slice tinted by the colormap. Volume files are not
//! decoded; paths are registered up front with their dimensions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use glam::{Mat4, Vec3};
use volview_core::camera::{
    framing_distance, CameraState, FIELD_OF_VIEW_DEG, MAX_ELEVATION_DEG, MIN_DISTANCE,
};
use volview_core::options::clamp_bounding_box_scale;
use volview_core::transfer_function::preset_points;
use volview_core::{
    BackendError, BackendResult, Capability, Frame, Renderer, TransferFunction,
    TransferFunctionPoint, VolumeAxis, VolumeDims,
};

use crate::error::{ExportError, ExportResult};
use crate::raster;
use crate::window::WindowGrabber;

const BOX_COLOR: [u8; 4] = [230, 230, 230, 255];

/// Largest offscreen target the headless backend will allocate per side.
pub const DEFAULT_MAX_OFFSCREEN: u32 = 16384;

#[derive(Debug, Clone, Copy)]
struct LoadedVolume {
    dims: VolumeDims,
    spacing: Vec3,
}

#[derive(Debug, Clone)]
struct Scene {
    volume: Option<LoadedVolume>,
    show_bounding_box: bool,
    bounding_box_scale: f32,
    background: Vec3,
    camera: CameraState,
    slice_mode: bool,
    slice_axis: VolumeAxis,
    slice_index: u32,
    preset: usize,
    custom: bool,
    points: TransferFunction,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            volume: None,
            show_bounding_box: true,
            bounding_box_scale: 1.0,
            background: Vec3::new(0.1, 0.1, 0.2),
            camera: CameraState::default(),
            slice_mode: false,
            slice_axis: VolumeAxis::Z,
            slice_index: 0,
            preset: 0,
            custom: false,
            points: TransferFunction::new(),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_rgba8(color: Vec3) -> [u8; 4] {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8, 255]
}

impl Scene {
    fn extent(&self) -> Option<Vec3> {
        self.volume
            .map(|v| v.dims.extent_vec() * v.spacing.max(Vec3::splat(1e-4)))
    }

    #[allow(clippy::cast_precision_loss)]
    fn view_proj(&self, width: u32, height: u32) -> Mat4 {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        let proj = Mat4::perspective_rh(FIELD_OF_VIEW_DEG.to_radians(), aspect, 0.01, 1000.0);
        let view = Mat4::look_at_rh(self.camera.position(), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    fn slice_color(&self) -> [u8; 4] {
        let rgba = if self.custom && !self.points.is_empty() {
            self.points.sample(0.5)
        } else {
            preset_points(self.preset).sample(0.5)
        };
        to_rgba8(Vec3::new(rgba[0], rgba[1], rgba[2]))
    }

    #[allow(clippy::cast_precision_loss)]
    fn slice_corners(&self, extent: Vec3) -> [Vec3; 8] {
        let dims = self.volume.map(|v| v.dims).unwrap_or_default();
        let max = self.slice_axis.extent(dims).saturating_sub(1).max(1) as f32;
        let t = (self.slice_index as f32 / max).clamp(0.0, 1.0) - 0.5;
        let mut corners = raster::box_corners(extent);
        for corner in &mut corners {
            match self.slice_axis {
                VolumeAxis::X => corner.x = t * extent.x,
                VolumeAxis::Y => corner.y = t * extent.y,
                VolumeAxis::Z => corner.z = t * extent.z,
            }
        }
        corners
    }

    fn draw(&self, frame: &mut Frame) {
        raster::clear(frame, to_rgba8(self.background));
        let Some(extent) = self.extent() else {
            return;
        };
        let view_proj = self.view_proj(frame.width, frame.height);
        if self.show_bounding_box {
            let corners = raster::box_corners(extent * self.bounding_box_scale);
            raster::draw_box(frame, view_proj, &corners, BOX_COLOR);
        }
        if self.slice_mode {
            let corners = self.slice_corners(extent);
            raster::draw_box(frame, view_proj, &corners, self.slice_color());
        }
    }
}

/// Software [`Renderer`] with a shared window surface.
#[derive(Debug)]
pub struct HeadlessRenderer {
    scene: Scene,
    volumes: HashMap<PathBuf, LoadedVolume>,
    window: Rc<RefCell<Frame>>,
    offscreen: Option<Frame>,
    max_offscreen: u32,
}

impl HeadlessRenderer {
    /// Creates a renderer whose window is `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scene: Scene::default(),
            volumes: HashMap::new(),
            window: Rc::new(RefCell::new(Frame::solid(width, height, [0, 0, 0, 255]))),
            offscreen: None,
            max_offscreen: DEFAULT_MAX_OFFSCREEN,
        }
    }

    /// Registers a path that `load_volume` accepts.
    pub fn with_volume(mut self, path: impl Into<PathBuf>, dims: VolumeDims, spacing: Vec3) -> Self {
        self.volumes
            .insert(path.into(), LoadedVolume { dims, spacing });
        self
    }

    /// Caps the offscreen target size; larger requests fail.
    pub fn with_max_offscreen(mut self, max_side: u32) -> Self {
        self.max_offscreen = max_side;
        self
    }

    /// Returns a handle on the window surface, usable as a [`WindowGrabber`].
    pub fn window(&self) -> HeadlessWindow {
        HeadlessWindow {
            surface: Rc::clone(&self.window),
        }
    }

    /// Returns the renderer-side orbit state.
    pub fn camera(&self) -> CameraState {
        self.scene.camera
    }
}

impl Renderer for HeadlessRenderer {
    fn load_volume(&mut self, path: &Path) -> BackendResult<bool> {
        match self.volumes.get(path) {
            Some(volume) => {
                self.scene.volume = Some(*volume);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn volume_width(&self) -> BackendResult<u32> {
        Ok(self.scene.volume.map_or(0, |v| v.dims.width))
    }

    fn volume_height(&self) -> BackendResult<u32> {
        Ok(self.scene.volume.map_or(0, |v| v.dims.height))
    }

    fn volume_depth(&self) -> BackendResult<u32> {
        Ok(self.scene.volume.map_or(0, |v| v.dims.depth))
    }

    fn volume_spacing(&self) -> BackendResult<Vec3> {
        Ok(self.scene.volume.map_or(Vec3::ONE, |v| v.spacing))
    }

    fn set_colormap_preset(&mut self, index: usize) -> BackendResult<()> {
        self.scene.preset = index;
        Ok(())
    }

    fn set_colormap_mode_custom(&mut self, custom: bool) -> BackendResult<()> {
        self.scene.custom = custom;
        Ok(())
    }

    fn set_transfer_function_points(
        &mut self,
        points: &[TransferFunctionPoint],
    ) -> BackendResult<()> {
        self.scene.points = TransferFunction::from_points(points.iter().copied());
        Ok(())
    }

    fn set_show_bounding_box(&mut self, show: bool) -> BackendResult<()> {
        self.scene.show_bounding_box = show;
        Ok(())
    }

    fn set_bounding_box_scale(&mut self, scale: f32) -> BackendResult<()> {
        self.scene.bounding_box_scale = clamp_bounding_box_scale(scale);
        Ok(())
    }

    fn set_background_color(&mut self, color: Vec3) -> BackendResult<()> {
        self.scene.background = color;
        Ok(())
    }

    fn set_slice_mode(&mut self, enabled: bool) -> BackendResult<()> {
        self.scene.slice_mode = enabled;
        Ok(())
    }

    fn set_slice_axis(&mut self, axis: VolumeAxis) -> BackendResult<()> {
        self.scene.slice_axis = axis;
        Ok(())
    }

    fn set_slice_index(&mut self, index: u32) -> BackendResult<()> {
        self.scene.slice_index = index;
        Ok(())
    }

    fn camera_rotate(&mut self, d_azimuth: f32, d_elevation: f32) -> BackendResult<()> {
        let camera = &mut self.scene.camera;
        camera.azimuth_deg += d_azimuth;
        camera.elevation_deg =
            (camera.elevation_deg + d_elevation).clamp(-MAX_ELEVATION_DEG, MAX_ELEVATION_DEG);
        Ok(())
    }

    fn camera_zoom(&mut self, delta: f32) -> BackendResult<()> {
        let camera = &mut self.scene.camera;
        camera.distance = (camera.distance - delta).max(MIN_DISTANCE);
        Ok(())
    }

    fn set_camera_angles(&mut self, azimuth_deg: f32, elevation_deg: f32) -> BackendResult<()> {
        self.scene.camera.azimuth_deg = azimuth_deg;
        self.scene.camera.elevation_deg =
            elevation_deg.clamp(-MAX_ELEVATION_DEG, MAX_ELEVATION_DEG);
        Ok(())
    }

    fn frame_camera_to_box(&mut self) -> BackendResult<()> {
        let Some(volume) = self.scene.volume else {
            log::trace!("nothing to frame");
            return Ok(());
        };
        self.scene.camera = CameraState {
            azimuth_deg: 0.0,
            elevation_deg: 0.0,
            distance: framing_distance(volume.dims.extent_vec() * volume.spacing),
        };
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if width == 0 || height == 0 {
            return Err(BackendError::failed(Capability::Resize, "zero size"));
        }
        let fresh = Frame::solid(width, height, [0, 0, 0, 255]);
        match self.offscreen.as_mut() {
            Some(target) => *target = fresh,
            None => *self.window.borrow_mut() = fresh,
        }
        Ok(())
    }

    fn render(&mut self) -> BackendResult<()> {
        match self.offscreen.as_mut() {
            Some(target) => self.scene.draw(target),
            None => self.scene.draw(&mut self.window.borrow_mut()),
        }
        Ok(())
    }

    fn create_offscreen_target(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if width == 0 || height == 0 {
            return Err(BackendError::OffscreenUnavailable("zero size".into()));
        }
        if width > self.max_offscreen || height > self.max_offscreen {
            return Err(BackendError::OffscreenUnavailable(format!(
                "{width}x{height} exceeds {} per side",
                self.max_offscreen
            )));
        }
        self.offscreen = Some(Frame::solid(width, height, [0, 0, 0, 255]));
        Ok(())
    }

    fn read_offscreen_pixels(&mut self) -> BackendResult<Frame> {
        self.offscreen.clone().ok_or_else(|| {
            BackendError::failed(Capability::ReadOffscreenPixels, "no offscreen target")
        })
    }

    fn release_offscreen_target(&mut self) -> BackendResult<()> {
        self.offscreen = None;
        Ok(())
    }
}

/// The window surface of a [`HeadlessRenderer`].
#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    surface: Rc<RefCell<Frame>>,
}

impl WindowGrabber for HeadlessWindow {
    fn viewport_size(&self) -> (u32, u32) {
        let frame = self.surface.borrow();
        (frame.width, frame.height)
    }

    fn grab_window(&mut self) -> ExportResult<Frame> {
        let frame = self.surface.borrow().clone();
        if frame.pixels.is_empty() {
            return Err(ExportError::WindowGrab("empty window".into()));
        }
        Ok(frame)
    }
}
