//! The full viewer UI: left control panel, viewport and dialogs.

use std::path::PathBuf;

use egui::Context;
use volview_core::{
    Action, CameraState, Notification, SliceState, TransferFunctionController,
};

use crate::export_dialog::ExportDialog;
use crate::panels::{
    build_camera_section, build_file_section, build_left_panel, build_slicer_section,
    build_view_section, ViewSettings,
};
use crate::transfer_function_editor::TransferFunctionEditor;
use crate::viewport::{build_notifications, ViewportInput};

/// Read-only view of the viewer state for one UI frame.
#[derive(Clone)]
pub struct UiSnapshot<'a> {
    pub transfer_function: &'a TransferFunctionController,
    pub camera: CameraState,
    pub slice: SliceState,
    pub view: ViewSettings,
    pub recent: &'a [PathBuf],
    /// Overlay text, `None` while the overlay is hidden.
    pub overlay_text: Option<String>,
    pub notifications: &'a [Notification],
    pub viewport: (u32, u32),
}

/// UI state kept between frames.
#[derive(Debug, Default)]
pub struct ViewerUi {
    path_input: String,
    transfer_function: TransferFunctionEditor,
    viewport: ViewportInput,
    export: ExportDialog,
}

impl ViewerUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export_dialog(&mut self) -> &mut ExportDialog {
        &mut self.export
    }

    /// Builds one frame and returns the actions the user triggered.
    pub fn build(&mut self, ctx: &Context, snapshot: &UiSnapshot<'_>) -> Vec<Action> {
        let mut actions = Vec::new();

        build_left_panel(ctx, |ui| {
            build_file_section(ui, &mut self.path_input, snapshot.recent, &mut actions);
            if ui.button("Screenshot...").clicked() {
                self.export.open();
            }
            ui.separator();
            self.transfer_function
                .show(ui, snapshot.transfer_function, &mut actions);
            build_camera_section(ui, snapshot.camera, &mut actions);
            build_slicer_section(ui, snapshot.slice, &mut actions);
            build_view_section(ui, snapshot.view, &mut actions);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.viewport
                    .show(ui, snapshot.overlay_text.as_deref(), &mut actions);
            });

        build_notifications(ctx, snapshot.notifications);
        self.export.show(ctx, snapshot.viewport, &mut actions);
        actions
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use glam::Vec3;
    use volview_core::{NotificationLevel, Notifier, SliceNavigator};

    use super::*;

    #[test]
    fn test_idle_frame_only_reports_viewport_size() {
        let ctx = Context::default();
        let controller = TransferFunctionController::new(0);
        let slices = SliceNavigator::default();
        let mut notifier = Notifier::new(Duration::from_secs(3));
        notifier.notify(NotificationLevel::Info, "Loaded brain.nii", Instant::now());
        let recent = vec![PathBuf::from("/data/brain.nii")];

        let mut ui = ViewerUi::new();
        let snapshot = UiSnapshot {
            transfer_function: &controller,
            camera: CameraState::default(),
            slice: slices.state(),
            view: ViewSettings {
                show_bounding_box: true,
                bounding_box_scale: 1.0,
                background_color: Vec3::new(0.1, 0.1, 0.2),
                show_overlay: true,
            },
            recent: &recent,
            overlay_text: Some("brain.nii\n0.0 FPS".to_string()),
            notifications: notifier.live(),
            viewport: (800, 600),
        };

        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            actions.extend(ui.build(ctx, &snapshot));
        });
        assert!(actions
            .iter()
            .all(|a| matches!(a, Action::Resize { .. })));
        assert!(!ui.export_dialog().is_open());
    }
}
