//! Screenshot dialog: resolution picker, output path and capture kind.

use std::path::PathBuf;

use egui::{Context, DragValue};
use volview_core::Action;
use volview_render::{DialogOutcome, ResolutionDialog, ResolutionPreset, CUSTOM_SIDE_RANGE};

/// Which capture path an export should take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureKind {
    /// Offscreen render without UI chrome or overlay.
    #[default]
    Clean,
    /// The window as currently shown.
    Interactive,
}

/// The modal screenshot window.
#[derive(Debug, Clone)]
pub struct ExportDialog {
    open: bool,
    pub resolution: ResolutionDialog,
    pub path: String,
    pub kind: CaptureKind,
}

impl Default for ExportDialog {
    fn default() -> Self {
        Self {
            open: false,
            resolution: ResolutionDialog::default(),
            path: "screenshot.png".to_string(),
            kind: CaptureKind::default(),
        }
    }
}

impl ExportDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the dialog and turns the outcome into a capture action.
    ///
    /// Returns `None` on cancel or when no path was entered.
    pub fn finish(&mut self, outcome: DialogOutcome, viewport: (u32, u32)) -> Option<Action> {
        self.open = false;
        let (width, height) = self.resolution.finish(outcome, viewport)?;
        let path = self.path.trim();
        if path.is_empty() {
            log::debug!("export skipped: empty path");
            return None;
        }
        let path = PathBuf::from(path);
        Some(match self.kind {
            CaptureKind::Clean => Action::CaptureClean {
                path,
                width,
                height,
            },
            CaptureKind::Interactive => Action::CaptureInteractive(path),
        })
    }

    /// Builds the dialog window when open.
    pub fn show(&mut self, ctx: &Context, viewport: (u32, u32), actions: &mut Vec<Action>) {
        if !self.open {
            return;
        }
        let mut outcome = None;
        egui::Window::new("Save screenshot")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("File:");
                    ui.text_edit_singleline(&mut self.path);
                });

                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.kind, CaptureKind::Clean, "Clean render");
                    ui.radio_value(&mut self.kind, CaptureKind::Interactive, "Window as shown");
                });

                ui.add_enabled_ui(self.kind == CaptureKind::Clean, |ui| {
                    egui::ComboBox::from_label("Resolution")
                        .selected_text(self.resolution.preset.name())
                        .show_ui(ui, |ui| {
                            for preset in ResolutionPreset::ALL {
                                ui.selectable_value(&mut self.resolution.preset, preset, preset.name());
                            }
                        });
                    if self.resolution.preset == ResolutionPreset::Custom {
                        ui.horizontal(|ui| {
                            ui.add(
                                DragValue::new(&mut self.resolution.custom_width)
                                    .range(CUSTOM_SIDE_RANGE),
                            );
                            ui.label("x");
                            ui.add(
                                DragValue::new(&mut self.resolution.custom_height)
                                    .range(CUSTOM_SIDE_RANGE),
                            );
                        });
                    }
                    let (w, h) = self.resolution.selected(viewport);
                    ui.weak(format!("Output: {w} x {h}"));
                });

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        outcome = Some(DialogOutcome::Accepted);
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(DialogOutcome::Cancelled);
                    }
                });
            });

        if let Some(outcome) = outcome {
            actions.extend(self.finish(outcome, viewport));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_clean_uses_selected_resolution() {
        let mut dialog = ExportDialog::new();
        dialog.open();
        dialog.resolution.preset = ResolutionPreset::Hd720;
        dialog.path = " shot.png ".into();
        let action = dialog.finish(DialogOutcome::Accepted, (800, 600));
        assert_eq!(
            action,
            Some(Action::CaptureClean {
                path: PathBuf::from("shot.png"),
                width: 1280,
                height: 720,
            })
        );
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_accept_interactive() {
        let mut dialog = ExportDialog::new();
        dialog.kind = CaptureKind::Interactive;
        dialog.path = "view.jpg".into();
        assert_eq!(
            dialog.finish(DialogOutcome::Accepted, (800, 600)),
            Some(Action::CaptureInteractive(PathBuf::from("view.jpg")))
        );
    }

    #[test]
    fn test_cancel_and_empty_path_yield_nothing() {
        let mut dialog = ExportDialog::new();
        dialog.open();
        assert_eq!(dialog.finish(DialogOutcome::Cancelled, (800, 600)), None);
        assert!(!dialog.is_open());

        dialog.path = "   ".into();
        assert_eq!(dialog.finish(DialogOutcome::Accepted, (800, 600)), None);
    }

    #[test]
    fn test_closed_dialog_draws_nothing() {
        let ctx = egui::Context::default();
        let mut dialog = ExportDialog::new();
        let mut actions = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            dialog.show(ctx, (800, 600), &mut actions);
        });
        assert!(actions.is_empty());
        assert!(!dialog.is_open());
    }
}
