//! Transfer functions: ordered colour/opacity control points.

mod controller;
mod presets;

pub use controller::{
    ColormapMode, CurveView, EditOrigin, TableView, TransferFunctionController,
};
pub use presets::{preset_points, ColormapPreset, GRAYSCALE_INVERTED, PRESETS};

use serde::{Deserialize, Serialize};

/// Clamps a channel to `[0, 1]`, mapping NaN to 0.
fn sanitize(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// One anchor of a piecewise colour/opacity ramp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferFunctionPoint {
    /// Scalar position along the ramp.
    pub position: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Opacity.
    pub a: f32,
}

impl Default for TransferFunctionPoint {
    fn default() -> Self {
        Self::new(0.5, 1.0, 1.0, 1.0, 1.0)
    }
}

impl TransferFunctionPoint {
    /// Creates a point, clamping every channel to `[0, 1]`.
    pub fn new(position: f32, r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            position,
            r,
            g,
            b,
            a,
        }
        .clamped()
    }

    /// Returns a copy with every channel clamped to `[0, 1]` and NaN replaced by 0.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            position: sanitize(self.position),
            r: sanitize(self.r),
            g: sanitize(self.g),
            b: sanitize(self.b),
            a: sanitize(self.a),
        }
    }

    /// Returns `[position, r, g, b, a]`.
    pub fn to_array(self) -> [f32; 5] {
        [self.position, self.r, self.g, self.b, self.a]
    }

    /// Builds a point from `[position, r, g, b, a]`, clamping.
    pub fn from_array(values: [f32; 5]) -> Self {
        Self::new(values[0], values[1], values[2], values[3], values[4])
    }

    /// Returns the colour and opacity as `[r, g, b, a]`.
    pub fn rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// An ordered list of control points.
///
/// Invariant: sorted by position ascending (stable for equal positions) and
/// every channel within `[0, 1]`. Every mutating method restores it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferFunction {
    points: Vec<TransferFunctionPoint>,
}

impl TransferFunction {
    /// Creates an empty transfer function.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a transfer function from arbitrary points.
    pub fn from_points(points: impl IntoIterator<Item = TransferFunctionPoint>) -> Self {
        let mut tf = Self {
            points: points.into_iter().map(TransferFunctionPoint::clamped).collect(),
        };
        tf.sort();
        tf
    }

    fn sort(&mut self) {
        // sort_by is stable, so equal positions keep insertion order
        self.points
            .sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    /// Returns the points in order.
    pub fn points(&self) -> &[TransferFunctionPoint] {
        &self.points
    }

    /// Returns the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether there are no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inserts a point after any existing points at the same position.
    pub fn insert(&mut self, point: TransferFunctionPoint) {
        self.points.push(point.clamped());
        self.sort();
    }

    /// Removes the points at the given indices; out-of-range indices are ignored.
    ///
    /// Returns the number of points removed.
    pub fn remove_indices(&mut self, indices: &[usize]) -> usize {
        let before = self.points.len();
        let mut index = 0;
        self.points.retain(|_| {
            let keep = !indices.contains(&index);
            index += 1;
            keep
        });
        before - self.points.len()
    }

    /// Replaces the point at `index`, re-sorting afterwards.
    ///
    /// Returns `false` if `index` is out of range.
    pub fn replace(&mut self, index: usize, point: TransferFunctionPoint) -> bool {
        let Some(slot) = self.points.get_mut(index) else {
            return false;
        };
        *slot = point.clamped();
        self.sort();
        true
    }

    /// Returns a copy with every position reflected as `1 - position`.
    #[must_use]
    pub fn reflected(&self) -> Self {
        Self::from_points(self.points.iter().map(|p| TransferFunctionPoint {
            position: 1.0 - p.position,
            ..*p
        }))
    }

    /// Evaluates the piecewise-linear ramp at `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f32) -> [f32; 4] {
        let t = sanitize(t);
        let Some(first) = self.points.first() else {
            return [0.0; 4];
        };
        if t <= first.position {
            return first.rgba();
        }
        for pair in self.points.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if t <= hi.position {
                let span = hi.position - lo.position;
                let frac = if span > 0.0 {
                    (t - lo.position) / span
                } else {
                    1.0
                };
                let a = lo.rgba();
                let b = hi.rgba();
                return std::array::from_fn(|i| a[i] + (b[i] - a[i]) * frac);
            }
        }
        self.points[self.points.len() - 1].rgba()
    }
}

/// A marker on the gradient (curve) view, colour in 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveTick {
    pub position: f32,
    pub color: [u8; 4],
}

/// A tick as reported by a gradient widget.
///
/// Colour channels are on the widget's 0–255 scale and may be out of range
/// or NaN; they are coerced on the way in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTick {
    pub position: f32,
    pub color: [f32; 4],
}

impl From<CurveTick> for RawTick {
    fn from(tick: CurveTick) -> Self {
        Self {
            position: tick.position,
            color: tick.color.map(f32::from),
        }
    }
}

impl From<RawTick> for TransferFunctionPoint {
    fn from(tick: RawTick) -> Self {
        let [r, g, b, a] = tick.color.map(|c| c / 255.0);
        TransferFunctionPoint::new(tick.position, r, g, b, a)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(value: f32) -> u8 {
    (sanitize(value) * 255.0).round() as u8
}

impl From<TransferFunctionPoint> for CurveTick {
    fn from(point: TransferFunctionPoint) -> Self {
        Self {
            position: point.position,
            color: point.rgba().map(channel_to_u8),
        }
    }
}

/// One row of the point table: `[position, r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableRow {
    pub values: [f32; 5],
}

impl From<TransferFunctionPoint> for TableRow {
    fn from(point: TransferFunctionPoint) -> Self {
        Self {
            values: point.to_array(),
        }
    }
}

/// An edit of one table row as reported by the table widget.
///
/// NaN cells keep the row's previous value; other cells are clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableEdit {
    pub row: usize,
    pub values: [f32; 5],
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(tf: &TransferFunction) -> Vec<f32> {
        tf.points().iter().map(|p| p.position).collect()
    }

    #[test]
    fn test_point_clamping() {
        let p = TransferFunctionPoint::new(1.5, -0.2, f32::NAN, 0.5, 2.0);
        assert_eq!(p.to_array(), [1.0, 0.0, 0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_default_point() {
        assert_eq!(
            TransferFunctionPoint::default().to_array(),
            [0.5, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_insert_keeps_order() {
        let mut tf = TransferFunction::new();
        tf.insert(TransferFunctionPoint::new(0.8, 0.0, 0.0, 0.0, 0.0));
        tf.insert(TransferFunctionPoint::new(0.2, 0.0, 0.0, 0.0, 0.0));
        tf.insert(TransferFunctionPoint::new(0.5, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(positions(&tf), vec![0.2, 0.5, 0.8]);
    }

    #[test]
    fn test_equal_positions_keep_insertion_order() {
        let mut tf = TransferFunction::new();
        tf.insert(TransferFunctionPoint::new(0.5, 1.0, 0.0, 0.0, 1.0));
        tf.insert(TransferFunctionPoint::new(0.5, 0.0, 1.0, 0.0, 1.0));
        tf.insert(TransferFunctionPoint::new(0.1, 0.0, 0.0, 1.0, 1.0));
        assert_eq!(tf.points()[1].r, 1.0);
        assert_eq!(tf.points()[2].g, 1.0);
    }

    #[test]
    fn test_remove_ignores_out_of_range() {
        let mut tf = TransferFunction::from_points([
            TransferFunctionPoint::new(0.0, 0.0, 0.0, 0.0, 0.0),
            TransferFunctionPoint::new(0.5, 0.0, 0.0, 0.0, 0.0),
            TransferFunctionPoint::new(1.0, 0.0, 0.0, 0.0, 0.0),
        ]);
        assert_eq!(tf.remove_indices(&[1, 7]), 1);
        assert_eq!(positions(&tf), vec![0.0, 1.0]);
        assert_eq!(tf.remove_indices(&[]), 0);
    }

    #[test]
    fn test_reflection() {
        let tf = TransferFunction::from_points([
            TransferFunctionPoint::new(0.0, 0.0, 0.0, 0.0, 0.0),
            TransferFunctionPoint::new(0.25, 0.5, 0.5, 0.5, 0.5),
            TransferFunctionPoint::new(1.0, 1.0, 1.0, 1.0, 1.0),
        ]);
        let reflected = tf.reflected();
        assert_eq!(positions(&reflected), vec![0.0, 0.75, 1.0]);
        assert_eq!(reflected.points()[0].r, 1.0);
    }

    #[test]
    fn test_sample_interpolates() {
        let tf = TransferFunction::from_points([
            TransferFunctionPoint::new(0.0, 0.0, 0.0, 0.0, 0.0),
            TransferFunctionPoint::new(1.0, 1.0, 1.0, 1.0, 1.0),
        ]);
        let mid = tf.sample(0.5);
        assert!((mid[0] - 0.5).abs() < 1e-6);
        assert_eq!(tf.sample(-1.0), [0.0; 4]);
        assert_eq!(TransferFunction::new().sample(0.3), [0.0; 4]);
    }

    #[test]
    fn test_raw_tick_coercion() {
        let point = TransferFunctionPoint::from(RawTick {
            position: -0.5,
            color: [510.0, 127.5, f32::NAN, 255.0],
        });
        assert_eq!(point.to_array(), [0.0, 1.0, 0.5, 0.0, 1.0]);
    }
}
