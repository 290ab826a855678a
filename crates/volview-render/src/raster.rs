//! Minimal software rasterization into RGBA frames.

use glam::{Mat4, Vec2, Vec3};
use volview_core::Frame;

/// The twelve edges of a box, as index pairs into [`box_corners`].
pub const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 3),
    (3, 2),
    (2, 0),
    (4, 5),
    (5, 7),
    (7, 6),
    (6, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Corners of an origin-centred box with the given full extent.
pub fn box_corners(extent: Vec3) -> [Vec3; 8] {
    let h = extent * 0.5;
    std::array::from_fn(|i| {
        Vec3::new(
            if i & 1 == 0 { -h.x } else { h.x },
            if i & 2 == 0 { -h.y } else { h.y },
            if i & 4 == 0 { -h.z } else { h.z },
        )
    })
}

/// Fills the whole frame with one colour.
pub fn clear(frame: &mut Frame, rgba: [u8; 4]) {
    for px in frame.pixels.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

/// Writes one pixel; coordinates outside the frame are ignored.
pub fn put_pixel(frame: &mut Frame, x: i64, y: i64, rgba: [u8; 4]) {
    if x < 0 || y < 0 || x >= i64::from(frame.width) || y >= i64::from(frame.height) {
        return;
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let i = (y as usize * frame.width as usize + x as usize) * 4;
    if let Some(px) = frame.pixels.get_mut(i..i + 4) {
        px.copy_from_slice(&rgba);
    }
}

/// Draws a line with Bresenham's algorithm, clipping per pixel.
pub fn draw_line(frame: &mut Frame, from: (i64, i64), to: (i64, i64), rgba: [u8; 4]) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(frame, x, y, rgba);
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Projects a world point to pixel coordinates; `None` if behind the camera.
#[allow(clippy::cast_precision_loss)]
pub fn project(view_proj: Mat4, point: Vec3, width: u32, height: u32) -> Option<Vec2> {
    let clip = view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * width as f32,
        (1.0 - (ndc.y * 0.5 + 0.5)) * height as f32,
    ))
}

/// Draws the outline of a box through `view_proj`.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_box(frame: &mut Frame, view_proj: Mat4, corners: &[Vec3; 8], rgba: [u8; 4]) {
    let (w, h) = (frame.width, frame.height);
    // far-off projections are clamped so the line walk stays bounded
    let limit = f32::from(u16::MAX);
    let to_px = |p: Vec2| {
        (
            p.x.clamp(-limit, limit).round() as i64,
            p.y.clamp(-limit, limit).round() as i64,
        )
    };
    for (a, b) in BOX_EDGES {
        if let (Some(pa), Some(pb)) = (
            project(view_proj, corners[a], w, h),
            project(view_proj, corners[b], w, h),
        ) {
            draw_line(frame, to_px(pa), to_px(pb), rgba);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_horizontal_line() {
        let mut frame = Frame::solid(5, 3, [0, 0, 0, 255]);
        draw_line(&mut frame, (0, 1), (4, 1), [255, 255, 255, 255]);
        for x in 0..5 {
            assert_eq!(frame.pixel(x, 1), Some([255, 255, 255, 255]));
        }
        assert_eq!(frame.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn test_box_corners_are_symmetric() {
        let corners = box_corners(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(corners[0], Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(corners[7], Vec3::new(1.0, 2.0, 3.0));
    }

    proptest! {
        #[test]
        fn line_endpoints_are_drawn(x0 in 0i64..16, y0 in 0i64..16, x1 in 0i64..16, y1 in 0i64..16) {
            let mut frame = Frame::solid(16, 16, [0, 0, 0, 0]);
            draw_line(&mut frame, (x0, y0), (x1, y1), [9, 9, 9, 9]);
            let px = |v: i64| u32::try_from(v).unwrap();
            prop_assert_eq!(frame.pixel(px(x0), px(y0)), Some([9, 9, 9, 9]));
            prop_assert_eq!(frame.pixel(px(x1), px(y1)), Some([9, 9, 9, 9]));
        }

        #[test]
        fn offscreen_lines_do_not_panic(x0 in -100i64..100, y0 in -100i64..100, x1 in -100i64..100, y1 in -100i64..100) {
            let mut frame = Frame::solid(8, 8, [0, 0, 0, 0]);
            draw_line(&mut frame, (x0, y0), (x1, y1), [1, 1, 1, 1]);
        }
    }
}
