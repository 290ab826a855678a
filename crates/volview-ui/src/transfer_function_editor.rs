//! Transfer function editor: mode and preset pickers, the gradient strip with
//! draggable ticks, and the point table.

use std::collections::BTreeSet;

use egui::{Color32, CollapsingHeader, DragValue, Pos2, Rect, Sense, Stroke, Ui, Vec2};
use volview_core::{
    Action, ColormapMode, CurveTick, RawTick, TableEdit, TransferFunctionController, PRESETS,
};

/// Height of the gradient strip in points.
const GRADIENT_HEIGHT: f32 = 28.0;
/// Number of flat bands the gradient is painted with.
const GRADIENT_BANDS: usize = 64;
/// How close (in points) a press must land to grab a tick.
const TICK_GRAB_RADIUS: f32 = 6.0;
const TICK_RADIUS: f32 = 4.5;

const COLUMN_NAMES: [&str; 5] = ["Pos", "R", "G", "B", "A"];

/// Index of the tick nearest to `x`, if one lies within `tolerance`.
///
/// `x` and `tolerance` share the unit of the tick positions.
pub fn tick_at(ticks: &[CurveTick], x: f32, tolerance: f32) -> Option<usize> {
    ticks
        .iter()
        .enumerate()
        .map(|(i, tick)| (i, (tick.position - x).abs()))
        .filter(|(_, distance)| *distance <= tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

/// The full tick list with tick `index` moved to `position`.
pub fn dragged_ticks(ticks: &[CurveTick], index: usize, position: f32) -> Vec<RawTick> {
    ticks
        .iter()
        .enumerate()
        .map(|(i, tick)| {
            let mut raw = RawTick::from(*tick);
            if i == index {
                raw.position = position.clamp(0.0, 1.0);
            }
            raw
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_color32(rgba: [f32; 4]) -> Color32 {
    let [r, g, b, a] = rgba.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

fn position_in(rect: Rect, pos: Pos2) -> f32 {
    ((pos.x - rect.left()) / rect.width().max(1.0)).clamp(0.0, 1.0)
}

/// Widget state that outlives a frame: row selection and the tick being dragged.
#[derive(Debug, Default)]
pub struct TransferFunctionEditor {
    selected: BTreeSet<usize>,
    dragging: Option<usize>,
}

impl TransferFunctionEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows currently selected for removal.
    pub fn selected_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Builds the whole editor section.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        controller: &TransferFunctionController,
        actions: &mut Vec<Action>,
    ) {
        // Indices past the end can linger after a remove or a preset switch.
        let len = controller.points().len();
        self.selected.retain(|&row| row < len);
        if self.dragging.is_some_and(|i| i >= len) {
            self.dragging = None;
        }

        CollapsingHeader::new("Transfer Function")
            .default_open(true)
            .show(ui, |ui| {
                self.mode_and_preset(ui, controller, actions);
                ui.separator();
                self.gradient(ui, controller, actions);
                ui.separator();
                self.table(ui, controller, actions);
                ui.separator();
                self.buttons(ui, controller, actions);
            });
    }

    fn mode_and_preset(
        &mut self,
        ui: &mut Ui,
        controller: &TransferFunctionController,
        actions: &mut Vec<Action>,
    ) {
        let mut mode = controller.mode();
        egui::ComboBox::from_label("Mode")
            .selected_text(match mode {
                ColormapMode::Preset => "Preset",
                ColormapMode::Custom => "Custom",
            })
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut mode, ColormapMode::Preset, "Preset");
                ui.selectable_value(&mut mode, ColormapMode::Custom, "Custom");
            });
        if mode != controller.mode() {
            actions.push(Action::SetColormapMode(mode));
        }

        let mut preset = controller.preset_index();
        let current = PRESETS.get(preset).map_or("?", |p| p.name);
        egui::ComboBox::from_label("Preset")
            .selected_text(current)
            .show_ui(ui, |ui| {
                for (i, candidate) in PRESETS.iter().enumerate() {
                    ui.selectable_value(&mut preset, i, candidate.name);
                }
            });
        if preset != controller.preset_index() {
            actions.push(Action::SelectPreset(preset));
        }
    }

    fn gradient(
        &mut self,
        ui: &mut Ui,
        controller: &TransferFunctionController,
        actions: &mut Vec<Action>,
    ) {
        let width = ui.available_width().max(64.0);
        let (response, painter) =
            ui.allocate_painter(Vec2::new(width, GRADIENT_HEIGHT), Sense::click_and_drag());
        let rect = response.rect;

        let function = controller.transfer_function();
        #[allow(clippy::cast_precision_loss)]
        let band_width = rect.width() / GRADIENT_BANDS as f32;
        for band in 0..GRADIENT_BANDS {
            #[allow(clippy::cast_precision_loss)]
            let t = (band as f32 + 0.5) / GRADIENT_BANDS as f32;
            #[allow(clippy::cast_precision_loss)]
            let left = rect.left() + band as f32 * band_width;
            let band_rect = Rect::from_min_max(
                Pos2::new(left, rect.top()),
                Pos2::new(left + band_width + 0.5, rect.bottom()),
            );
            painter.rect_filled(band_rect, 0.0, to_color32(function.sample(t)));
        }

        let ticks = controller.curve();
        let tolerance = TICK_GRAB_RADIUS / rect.width().max(1.0);

        if response.drag_started() {
            self.dragging = response
                .interact_pointer_pos()
                .and_then(|pos| tick_at(ticks, position_in(rect, pos), tolerance));
        }
        if let (Some(index), true) = (self.dragging, response.dragged()) {
            if let Some(pos) = response.interact_pointer_pos() {
                let position = position_in(rect, pos);
                if ticks
                    .get(index)
                    .is_some_and(|tick| (tick.position - position).abs() > f32::EPSILON)
                {
                    actions.push(Action::CurveEdited(dragged_ticks(ticks, index, position)));
                }
            }
        }
        if response.drag_stopped() {
            self.dragging = None;
        }

        for (i, tick) in ticks.iter().enumerate() {
            let center = Pos2::new(rect.left() + tick.position * rect.width(), rect.center().y);
            let outline = if self.dragging == Some(i) {
                Stroke::new(2.0, Color32::YELLOW)
            } else {
                Stroke::new(1.0, Color32::BLACK)
            };
            let [r, g, b, _] = tick.color;
            painter.circle(center, TICK_RADIUS, Color32::from_rgb(r, g, b), outline);
        }
    }

    fn table(
        &mut self,
        ui: &mut Ui,
        controller: &TransferFunctionController,
        actions: &mut Vec<Action>,
    ) {
        egui::Grid::new("tf_points")
            .num_columns(6)
            .striped(true)
            .show(ui, |ui| {
                ui.label("");
                for name in COLUMN_NAMES {
                    ui.strong(name);
                }
                ui.end_row();

                for (row, entry) in controller.table().iter().enumerate() {
                    let mut selected = self.selected.contains(&row);
                    if ui.checkbox(&mut selected, "").changed() {
                        if selected {
                            self.selected.insert(row);
                        } else {
                            self.selected.remove(&row);
                        }
                    }

                    let mut values = entry.values;
                    let mut changed = false;
                    for value in &mut values {
                        changed |= ui
                            .add(DragValue::new(value).speed(0.005).range(0.0..=1.0).fixed_decimals(3))
                            .changed();
                    }
                    if changed {
                        actions.push(Action::TableEdited(TableEdit { row, values }));
                    }
                    ui.end_row();
                }
            });
    }

    fn buttons(
        &mut self,
        ui: &mut Ui,
        controller: &TransferFunctionController,
        actions: &mut Vec<Action>,
    ) {
        ui.horizontal(|ui| {
            if ui.button("Add point").clicked() {
                actions.push(Action::AddPoint(None));
            }
            if ui
                .add_enabled(!self.selected.is_empty(), egui::Button::new("Remove selected"))
                .clicked()
            {
                actions.push(Action::RemovePoints(self.selected.iter().copied().collect()));
                self.selected.clear();
            }
        });
        ui.horizontal(|ui| {
            let custom = controller.mode() == ColormapMode::Custom;
            if ui
                .add_enabled(custom, egui::Button::new("Apply"))
                .on_hover_text("Send the point list to the renderer")
                .clicked()
            {
                actions.push(Action::ApplyCustom);
            }
            if ui.button("Reset to preset").clicked() {
                actions.push(Action::ResetToPreset(controller.preset_index()));
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticks() -> Vec<CurveTick> {
        vec![
            CurveTick {
                position: 0.0,
                color: [0, 0, 0, 255],
            },
            CurveTick {
                position: 0.5,
                color: [128, 0, 0, 255],
            },
            CurveTick {
                position: 1.0,
                color: [255, 255, 255, 255],
            },
        ]
    }

    #[test]
    fn test_tick_at_picks_nearest_within_tolerance() {
        let ticks = ticks();
        assert_eq!(tick_at(&ticks, 0.48, 0.05), Some(1));
        assert_eq!(tick_at(&ticks, 0.98, 0.05), Some(2));
        assert_eq!(tick_at(&ticks, 0.25, 0.05), None);
        assert_eq!(tick_at(&[], 0.5, 1.0), None);
    }

    #[test]
    fn test_dragged_ticks_moves_only_one() {
        let moved = dragged_ticks(&ticks(), 1, 0.7);
        assert_eq!(moved.len(), 3);
        assert_eq!(moved[0].position, 0.0);
        assert_eq!(moved[1].position, 0.7);
        assert_eq!(moved[1].color, [128.0, 0.0, 0.0, 255.0]);
        assert_eq!(moved[2].position, 1.0);
    }

    #[test]
    fn test_dragged_ticks_clamps() {
        let moved = dragged_ticks(&ticks(), 0, -0.3);
        assert_eq!(moved[0].position, 0.0);
    }

    #[test]
    fn test_editor_emits_nothing_without_input() {
        let ctx = egui::Context::default();
        let controller = TransferFunctionController::new(0);
        let mut editor = TransferFunctionEditor::new();
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                editor.show(ui, &controller, &mut actions);
            });
        });
        assert!(actions.is_empty());
        assert_eq!(editor.selected_rows().count(), 0);
    }
}
