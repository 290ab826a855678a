//! The 3D viewport area: mouse navigation, resize tracking and the on-screen
//! overlay and notification toasts.

use egui::{Align2, Color32, Context, FontId, Id, Rect, Sense, Ui, Vec2};
use volview_core::camera::WHEEL_STEP_ANGLE;
use volview_core::{Action, Notification, NotificationLevel};

/// Scroll distance egui reports for one wheel notch, in points.
pub const POINTS_PER_NOTCH: f32 = 50.0;

/// Converts an egui scroll delta (points) to a wheel angle delta.
pub fn scroll_to_angle(scroll_points: f32) -> f32 {
    scroll_points / POINTS_PER_NOTCH * WHEEL_STEP_ANGLE
}

/// Viewport size in physical pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn physical_size(size: Vec2, pixels_per_point: f32) -> (u32, u32) {
    let w = (size.x * pixels_per_point).round().max(0.0) as u32;
    let h = (size.y * pixels_per_point).round().max(0.0) as u32;
    (w, h)
}

fn level_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Info => Color32::from_rgb(200, 220, 255),
        NotificationLevel::Warning => Color32::from_rgb(255, 210, 120),
        NotificationLevel::Error => Color32::from_rgb(255, 130, 130),
    }
}

/// Tracks the viewport across frames.
#[derive(Debug, Default)]
pub struct ViewportInput {
    last_size: Option<(u32, u32)>,
}

impl ViewportInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last size reported through [`Action::Resize`].
    pub fn size(&self) -> Option<(u32, u32)> {
        self.last_size
    }

    /// Claims the remaining space of `ui` as the viewport.
    ///
    /// Drags rotate, the wheel zooms (shift for fast zoom) and a size change
    /// emits [`Action::Resize`]. `overlay_text` is drawn in the top-left
    /// corner when present.
    pub fn show(&mut self, ui: &mut Ui, overlay_text: Option<&str>, actions: &mut Vec<Action>) -> Rect {
        let response = ui.allocate_response(ui.available_size(), Sense::drag());
        let rect = response.rect;

        let size = physical_size(rect.size(), ui.ctx().pixels_per_point());
        if size.0 > 0 && size.1 > 0 && self.last_size != Some(size) {
            self.last_size = Some(size);
            actions.push(Action::Resize {
                width: size.0,
                height: size.1,
            });
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                actions.push(Action::Rotate {
                    dx: delta.x,
                    dy: delta.y,
                });
            }
        }

        if response.hovered() {
            let (scroll, fast) = ui.input(|i| (i.raw_scroll_delta.y, i.modifiers.shift));
            if scroll != 0.0 {
                actions.push(Action::Wheel {
                    angle_delta: scroll_to_angle(scroll),
                    fast,
                });
            }
        }

        if let Some(text) = overlay_text {
            ui.painter().text(
                rect.left_top() + Vec2::new(8.0, 8.0),
                Align2::LEFT_TOP,
                text,
                FontId::monospace(14.0),
                Color32::WHITE,
            );
        }
        rect
    }
}

/// Shows live notifications stacked in the bottom-right corner.
pub fn build_notifications(ctx: &Context, notifications: &[Notification]) {
    if notifications.is_empty() {
        return;
    }
    egui::Area::new(Id::new("volview_notifications"))
        .anchor(Align2::RIGHT_BOTTOM, Vec2::new(-12.0, -12.0))
        .interactable(false)
        .show(ctx, |ui| {
            for notification in notifications {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.colored_label(level_color(notification.level), &notification.message);
                });
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_to_angle() {
        assert_eq!(scroll_to_angle(POINTS_PER_NOTCH), WHEEL_STEP_ANGLE);
        assert_eq!(scroll_to_angle(-2.0 * POINTS_PER_NOTCH), -2.0 * WHEEL_STEP_ANGLE);
        assert_eq!(scroll_to_angle(0.0), 0.0);
    }

    #[test]
    fn test_physical_size() {
        assert_eq!(physical_size(Vec2::new(400.0, 300.0), 2.0), (800, 600));
        assert_eq!(physical_size(Vec2::new(-5.0, 10.0), 1.0), (0, 10));
    }

    #[test]
    fn test_first_frame_reports_size_only() {
        let ctx = egui::Context::default();
        let mut viewport = ViewportInput::new();
        let mut actions = Vec::new();
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(egui::Pos2::ZERO, Vec2::new(640.0, 480.0))),
            ..Default::default()
        };
        let _ = ctx.run(input.clone(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                viewport.show(ui, Some("brain\n60.0 FPS"), &mut actions);
            });
        });
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::Resize { .. }));

        actions.clear();
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                viewport.show(ui, None, &mut actions);
            });
        });
        assert!(actions.is_empty(), "unchanged size should not re-emit");
    }
}
