//! Volume axes shared by the slicer and the camera.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// One of the three volume axes.
///
/// The discriminant order (`Z = 0`, `Y = 1`, `X = 2`) matches the index
/// renderers expect for `set_slice_axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VolumeAxis {
    /// Depth axis.
    #[default]
    Z,
    /// Height axis.
    Y,
    /// Width axis.
    X,
}

impl VolumeAxis {
    /// All axes in UI order.
    pub const ALL: [VolumeAxis; 3] = [VolumeAxis::Z, VolumeAxis::Y, VolumeAxis::X];

    /// Returns the renderer index for this axis.
    pub fn to_index(self) -> u32 {
        match self {
            VolumeAxis::Z => 0,
            VolumeAxis::Y => 1,
            VolumeAxis::X => 2,
        }
    }

    /// Converts from a renderer/UI index, saturating out-of-range values to `X`.
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => VolumeAxis::Z,
            1 => VolumeAxis::Y,
            _ => VolumeAxis::X,
        }
    }

    /// Returns display name.
    pub fn name(self) -> &'static str {
        match self {
            VolumeAxis::Z => "Z",
            VolumeAxis::Y => "Y",
            VolumeAxis::X => "X",
        }
    }

    /// Picks the extent along this axis from `(width, height, depth)`.
    pub fn extent(self, dims: VolumeDims) -> u32 {
        match self {
            VolumeAxis::Z => dims.depth,
            VolumeAxis::Y => dims.height,
            VolumeAxis::X => dims.width,
        }
    }
}

/// Voxel dimensions of the loaded volume as reported by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VolumeDims {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl VolumeDims {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Returns whether any extent is zero (no volume loaded).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == 0
    }

    /// Returns `(width, height, depth)` as a vector, in voxels.
    #[allow(clippy::cast_precision_loss)]
    pub fn extent_vec(self) -> Vec3 {
        Vec3::new(self.width as f32, self.height as f32, self.depth as f32)
    }
}
