//! Named colormap presets.

use super::{TransferFunction, TransferFunctionPoint};

/// A named, fixed colour ramp.
///
/// Stops are evenly spaced from 0 to 1. Opacity rises linearly with position.
#[derive(Debug, Clone, Copy)]
pub struct ColormapPreset {
    /// Display name.
    pub name: &'static str,
    /// Colour samples.
    pub stops: &'static [[f32; 3]],
}

/// Index of the inverted grayscale preset.
pub const GRAYSCALE_INVERTED: usize = 1;

const GRAY: &[[f32; 3]] = &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];

/// All presets, in the order renderers index them.
pub const PRESETS: [ColormapPreset; 10] = [
    ColormapPreset {
        name: "Grayscale",
        stops: GRAY,
    },
    ColormapPreset {
        name: "Grayscale (Inverted)",
        stops: GRAY,
    },
    ColormapPreset {
        name: "Hot",
        stops: &[
            [0.0, 0.0, 0.0],
            [0.9, 0.0, 0.0],
            [1.0, 0.9, 0.0],
            [1.0, 1.0, 1.0],
        ],
    },
    ColormapPreset {
        name: "Cool",
        stops: &[[0.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    },
    ColormapPreset {
        name: "Spring",
        stops: &[[1.0, 0.0, 1.0], [1.0, 1.0, 0.0]],
    },
    ColormapPreset {
        name: "Summer",
        stops: &[[0.0, 0.5, 0.4], [1.0, 1.0, 0.4]],
    },
    ColormapPreset {
        name: "Autumn",
        stops: &[[1.0, 0.0, 0.0], [1.0, 1.0, 0.0]],
    },
    ColormapPreset {
        name: "Winter",
        stops: &[[0.0, 0.0, 1.0], [0.0, 1.0, 0.5]],
    },
    ColormapPreset {
        name: "Jet-like",
        stops: &[
            [0.0, 0.0, 0.5],
            [0.0, 0.0, 1.0],
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.5, 0.0, 0.0],
        ],
    },
    ColormapPreset {
        name: "Viridis-like",
        stops: &[
            [0.267, 0.004, 0.329],
            [0.282, 0.140, 0.457],
            [0.253, 0.265, 0.529],
            [0.206, 0.371, 0.553],
            [0.163, 0.471, 0.558],
            [0.127, 0.566, 0.550],
            [0.134, 0.658, 0.517],
            [0.266, 0.749, 0.440],
            [0.477, 0.821, 0.318],
            [0.741, 0.873, 0.150],
            [0.993, 0.906, 0.144],
        ],
    },
];

impl ColormapPreset {
    /// Expands the stops into control points.
    #[allow(clippy::cast_precision_loss)]
    pub fn points(&self) -> TransferFunction {
        let last = self.stops.len().saturating_sub(1).max(1) as f32;
        TransferFunction::from_points(self.stops.iter().enumerate().map(|(i, [r, g, b])| {
            let t = i as f32 / last;
            TransferFunctionPoint::new(t, *r, *g, *b, t)
        }))
    }
}

/// Returns the mirrored control points for a preset index.
///
/// Out-of-range indices clamp to the last preset. The inverted grayscale
/// preset is the grayscale ramp with positions reflected.
pub fn preset_points(index: usize) -> TransferFunction {
    let index = index.min(PRESETS.len() - 1);
    let points = PRESETS[index].points();
    if index == GRAYSCALE_INVERTED {
        points.reflected()
    } else {
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_names() {
        assert_eq!(PRESETS[0].name, "Grayscale");
        assert_eq!(PRESETS[GRAYSCALE_INVERTED].name, "Grayscale (Inverted)");
        assert_eq!(PRESETS[9].name, "Viridis-like");
    }

    #[test]
    fn test_preset_points_span_unit_range() {
        for index in 0..PRESETS.len() {
            let tf = preset_points(index);
            let pts = tf.points();
            assert_eq!(pts.first().map(|p| p.position), Some(0.0));
            assert_eq!(pts.last().map(|p| p.position), Some(1.0));
        }
    }

    #[test]
    fn test_inverted_grayscale_is_reflected() {
        let normal = preset_points(0);
        let inverted = preset_points(GRAYSCALE_INVERTED);
        assert_eq!(inverted, normal.reflected());
        // white now sits at position 0
        assert_eq!(inverted.points()[0].r, 1.0);
        assert_eq!(inverted.points()[0].a, 1.0);
    }

    #[test]
    fn test_out_of_range_index_clamps() {
        assert_eq!(preset_points(42), preset_points(PRESETS.len() - 1));
    }
}
