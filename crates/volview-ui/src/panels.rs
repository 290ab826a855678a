//! UI panel builders.
//!
//! Every builder reads controller state and appends [`Action`]s; none of them
//! mutates a controller directly.

use std::path::PathBuf;

use egui::{CollapsingHeader, Context, DragValue, SidePanel, Slider, Ui};
use glam::Vec3;
use volview_core::options::BOUNDING_BOX_SCALE_RANGE;
use volview_core::slice::SWEEP_RATE_RANGE;
use volview_core::{Action, CameraState, SliceState, VolumeAxis};

/// View toggles exposed in the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSettings {
    pub show_bounding_box: bool,
    pub bounding_box_scale: f32,
    pub background_color: Vec3,
    pub show_overlay: bool,
}

/// Builds the main left panel.
pub fn build_left_panel(ctx: &Context, build_contents: impl FnOnce(&mut Ui)) {
    SidePanel::left("volview_main_panel")
        .default_width(320.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("volview");
            ui.separator();
            egui::ScrollArea::vertical().show(ui, build_contents);
        });
}

/// Builds the file section: a path field plus the recent-files list.
pub fn build_file_section(
    ui: &mut Ui,
    path_input: &mut String,
    recent: &[PathBuf],
    actions: &mut Vec<Action>,
) {
    CollapsingHeader::new("File")
        .default_open(true)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.text_edit_singleline(path_input);
                if ui.button("Open").clicked() && !path_input.trim().is_empty() {
                    actions.push(Action::Open(PathBuf::from(path_input.trim())));
                }
            });

            if recent.is_empty() {
                ui.weak("No recent files");
                return;
            }
            ui.label("Recent:");
            for path in recent {
                let label = path
                    .file_name()
                    .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
                if ui
                    .button(label)
                    .on_hover_text(path.display().to_string())
                    .clicked()
                {
                    actions.push(Action::Open(path.clone()));
                }
            }
            if ui.small_button("Clear recent").clicked() {
                actions.push(Action::ClearRecent);
            }
        });
}

/// Builds the camera section.
pub fn build_camera_section(ui: &mut Ui, camera: CameraState, actions: &mut Vec<Action>) {
    CollapsingHeader::new("Camera")
        .default_open(false)
        .show(ui, |ui| {
            ui.label(format!(
                "Azimuth {:.1}°  Elevation {:.1}°  Distance {:.2}",
                camera.azimuth_deg, camera.elevation_deg, camera.distance
            ));
            if ui.button("Frame volume").clicked() {
                actions.push(Action::FrameToBox);
            }
            ui.horizontal(|ui| {
                ui.label("Look along:");
                for axis in VolumeAxis::ALL {
                    if ui.button(axis.name()).clicked() {
                        actions.push(Action::AlignToAxis(axis));
                    }
                }
            });
        });
}

/// Builds the slicer section.
pub fn build_slicer_section(ui: &mut Ui, slice: SliceState, actions: &mut Vec<Action>) {
    CollapsingHeader::new("Slicer")
        .default_open(false)
        .show(ui, |ui| {
            let mut enabled = slice.enabled;
            if ui.checkbox(&mut enabled, "Slice mode").changed() {
                actions.push(Action::SetSliceEnabled(enabled));
            }

            ui.add_enabled_ui(slice.enabled, |ui| {
                let mut axis = slice.axis;
                egui::ComboBox::from_label("Axis")
                    .selected_text(axis.name())
                    .show_ui(ui, |ui| {
                        for candidate in VolumeAxis::ALL {
                            ui.selectable_value(&mut axis, candidate, candidate.name());
                        }
                    });
                if axis != slice.axis {
                    actions.push(Action::SetSliceAxis(axis));
                }

                ui.horizontal(|ui| {
                    let mut slider_value = slice.index;
                    if ui
                        .add(Slider::new(&mut slider_value, 0..=slice.max_index).show_value(false))
                        .changed()
                    {
                        actions.push(Action::SliderChanged(i64::from(slider_value)));
                    }
                    let mut stepper_value = slice.index;
                    if ui
                        .add(DragValue::new(&mut stepper_value).range(0..=slice.max_index))
                        .changed()
                    {
                        actions.push(Action::StepperChanged(i64::from(stepper_value)));
                    }
                    ui.label(format!("/ {}", slice.max_index));
                });

                let mut auto_sweep = slice.auto_sweep;
                if ui.checkbox(&mut auto_sweep, "Auto sweep").changed() {
                    actions.push(Action::SetAutoSweep(auto_sweep));
                }
                let mut rate = slice.sweep_rate_hz;
                if ui
                    .add(Slider::new(&mut rate, SWEEP_RATE_RANGE).text("slices/s"))
                    .changed()
                {
                    actions.push(Action::SetSweepRate(rate));
                }
            });
        });
}

/// Builds the view section: bounding box, background and overlay.
pub fn build_view_section(ui: &mut Ui, view: ViewSettings, actions: &mut Vec<Action>) {
    CollapsingHeader::new("View")
        .default_open(false)
        .show(ui, |ui| {
            let mut show_box = view.show_bounding_box;
            if ui.checkbox(&mut show_box, "Bounding box").changed() {
                actions.push(Action::SetShowBoundingBox(show_box));
            }
            let mut scale = view.bounding_box_scale;
            let (lo, hi) = BOUNDING_BOX_SCALE_RANGE;
            if ui
                .add(Slider::new(&mut scale, lo..=hi).text("Box scale"))
                .changed()
            {
                actions.push(Action::SetBoundingBoxScale(scale));
            }

            ui.horizontal(|ui| {
                ui.label("Background:");
                let mut color = view.background_color.to_array();
                if ui.color_edit_button_rgb(&mut color).changed() {
                    actions.push(Action::SetBackgroundColor(Vec3::from_array(color)));
                }
            });

            let mut overlay = view.show_overlay;
            if ui.checkbox(&mut overlay, "Show overlay (FPS & name)").changed() {
                actions.push(Action::SetOverlayVisible(overlay));
            }
        });
}
