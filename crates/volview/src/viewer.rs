//! The viewer: owns every controller and routes user actions to them.

use std::path::Path;
use std::time::{Duration, Instant};

use volview_core::camera::wheel_steps;
use volview_core::options::clamp_bounding_box_scale;
use volview_core::{
    Action, Backend, BackendResult, CameraController, HistoryStore, NotificationLevel, Notifier,
    Options, Overlay, Renderer, SliceNavigator, TransferFunctionController, Vec3,
};
use volview_render::{
    DialogOutcome, ExportPipeline, ExportReport, ExportResult, HeadlessRenderer, WindowGrabber,
};
use volview_ui::{UiSnapshot, ViewSettings, ViewerUi};

/// Title shown before the FPS readout.
pub const WINDOW_TITLE: &str = "volview";

/// The volume viewer application state.
///
/// Holds the [`Backend`], the three controllers, the recent-files history,
/// the overlay and the export pipeline. UI code never mutates these
/// directly; it produces [`Action`]s that [`Viewer::dispatch`] applies.
pub struct Viewer {
    backend: Backend,
    options: Options,
    transfer_function: TransferFunctionController,
    camera: CameraController,
    slices: SliceNavigator,
    history: HistoryStore,
    notifier: Notifier,
    overlay: Overlay,
    export: ExportPipeline,
    window: Option<Box<dyn WindowGrabber>>,
    viewport: (u32, u32),
}

impl Viewer {
    /// Creates a viewer around `renderer` and pushes the initial view state.
    ///
    /// Recent files are read from `options.history_file`, or from the
    /// platform data directory when unset.
    pub fn new(renderer: impl Renderer + 'static, options: Options, now: Instant) -> Self {
        let options = options.sanitized();
        let mut history = match &options.history_file {
            Some(file) => HistoryStore::with_file(file),
            None => HistoryStore::at_default_location(),
        };
        history.load();

        let mut viewer = Self {
            backend: Backend::new(renderer),
            transfer_function: TransferFunctionController::new(options.default_preset),
            camera: CameraController::new(options.rotate_sensitivity, options.zoom_sensitivity),
            slices: SliceNavigator::new(options.sweep_rate_hz),
            history,
            notifier: Notifier::new(Duration::from_millis(options.notification_lifetime_ms)),
            overlay: Overlay::new(options.show_overlay, now),
            export: ExportPipeline::new(),
            window: None,
            viewport: (0, 0),
            options,
        };
        viewer.push_view_settings();
        viewer.transfer_function.reapply(&mut viewer.backend);
        viewer
    }

    /// Creates a viewer on a [`HeadlessRenderer`], wired to its window surface.
    pub fn headless(renderer: HeadlessRenderer, options: Options, now: Instant) -> Self {
        let window = renderer.window();
        Self::new(renderer, options, now).with_window(window)
    }

    /// Attaches the host window used for interactive captures.
    #[must_use]
    pub fn with_window(mut self, window: impl WindowGrabber + 'static) -> Self {
        self.viewport = window.viewport_size();
        self.window = Some(Box::new(window));
        self
    }

    /// Replaces the recent-files store.
    #[must_use]
    pub fn with_history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn transfer_function(&self) -> &TransferFunctionController {
        &self.transfer_function
    }

    pub fn transfer_function_mut(&mut self) -> &mut TransferFunctionController {
        &mut self.transfer_function
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn slices(&self) -> &SliceNavigator {
        &self.slices
    }

    pub fn slices_mut(&mut self) -> &mut SliceNavigator {
        &mut self.slices
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn export_pipeline_mut(&mut self) -> &mut ExportPipeline {
        &mut self.export
    }

    /// Current viewport size in pixels.
    pub fn viewport(&self) -> (u32, u32) {
        self.window
            .as_ref()
            .map_or(self.viewport, |window| window.viewport_size())
    }

    /// Interval at which the host should call [`tick`](Self::tick).
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.options.refresh_interval_ms)
    }

    /// Window title with the FPS readout.
    pub fn window_title(&self) -> String {
        self.overlay.window_title(WINDOW_TITLE)
    }

    /// View toggles as shown in the UI.
    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            show_bounding_box: self.options.show_bounding_box,
            bounding_box_scale: self.options.bounding_box_scale,
            background_color: self.options.background_color,
            show_overlay: self.overlay.is_visible(),
        }
    }

    /// Loads a volume.
    ///
    /// On success the path goes to the front of the history, the overlay
    /// shows its name, the view and colormap state are re-applied, the
    /// camera is framed and the slice range is recomputed. On failure a
    /// notification is raised and no viewer state changes.
    pub fn open(&mut self, path: &Path, now: Instant) -> bool {
        match self.backend.try_load_volume(path) {
            Ok(true) => {}
            Ok(false) => {
                self.notifier.notify(
                    NotificationLevel::Error,
                    format!("Could not load {}", path.display()),
                    now,
                );
                return false;
            }
            Err(err) => {
                self.notifier.notify(
                    NotificationLevel::Error,
                    format!("Could not load {}: {err}", path.display()),
                    now,
                );
                return false;
            }
        }
        log::info!("loaded volume {}", path.display());

        self.history.push(path);
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.overlay.set_dataset(name, now);

        self.push_view_settings();
        self.transfer_function.reapply(&mut self.backend);
        if let Err(err) = self.camera.frame_to_box(&mut self.backend) {
            log::warn!("could not frame the new volume: {err}");
        }
        self.slices.refresh_range(&mut self.backend, now);
        true
    }

    /// Display-refresh tick: advances the auto-sweep, renders a frame,
    /// updates the FPS readout, expires notifications and reports any
    /// renderer faults caught since the last tick.
    pub fn tick(&mut self, now: Instant) {
        self.slices.poll(&mut self.backend, now);
        self.backend.render();
        self.overlay.frame(now);
        self.notifier.expire(now);
        for fault in self.backend.take_faults() {
            self.notifier
                .notify(NotificationLevel::Warning, fault.error.to_string(), now);
        }
    }

    /// Applies one user action.
    pub fn dispatch(&mut self, action: Action, now: Instant) {
        log::trace!("dispatch {action:?}");
        let backend = &mut self.backend;
        match action {
            Action::Open(path) => {
                self.open(&path, now);
            }
            Action::ClearRecent => self.history.clear(),

            Action::AddPoint(point) => self.transfer_function.add_point(point),
            Action::RemovePoints(rows) => self.transfer_function.remove_points(&rows),
            Action::SetColormapMode(mode) => self.transfer_function.set_mode(backend, mode),
            Action::SelectPreset(index) => self.transfer_function.select_preset(backend, index),
            Action::ApplyCustom => {
                if !self.transfer_function.apply_custom(backend) {
                    log::debug!("apply ignored outside custom mode");
                }
            }
            Action::ResetToPreset(index) => {
                self.transfer_function.reset_to_preset(backend, index);
            }
            Action::CurveEdited(ticks) => {
                self.transfer_function.on_curve_edited(&ticks);
            }
            Action::TableEdited(edit) => {
                self.transfer_function.on_table_edited(edit);
            }

            Action::Rotate { dx, dy } => self.camera.rotate(backend, dx, dy),
            Action::Wheel { angle_delta, fast } => {
                self.camera.zoom(backend, wheel_steps(angle_delta), fast);
            }
            Action::FrameToBox => {
                let result = self.camera.frame_to_box(backend);
                self.report_camera(result, now);
            }
            Action::AlignToAxis(axis) => {
                let result = self.camera.align_to_axis(backend, axis);
                self.report_camera(result, now);
            }

            Action::SetSliceEnabled(enabled) => self.slices.set_enabled(backend, enabled, now),
            Action::SetSliceAxis(axis) => self.slices.set_axis(backend, axis, now),
            Action::SliderChanged(value) => {
                self.slices.on_slider_changed(backend, value);
            }
            Action::StepperChanged(value) => {
                self.slices.on_stepper_changed(backend, value);
            }
            Action::SetAutoSweep(enabled) => self.slices.set_auto_sweep(enabled, now),
            Action::SetSweepRate(rate) => self.slices.set_sweep_rate(rate, now),

            Action::SetShowBoundingBox(show) => {
                self.options.show_bounding_box = show;
                backend.set_show_bounding_box(show);
            }
            Action::SetBoundingBoxScale(scale) => {
                let scale = clamp_bounding_box_scale(scale);
                self.options.bounding_box_scale = scale;
                backend.set_bounding_box_scale(scale);
            }
            Action::SetBackgroundColor(color) => {
                let color = color.clamp(Vec3::ZERO, Vec3::ONE);
                self.options.background_color = color;
                backend.set_background_color(color);
            }
            Action::SetOverlayVisible(visible) => self.overlay.set_visible(visible),
            Action::Resize { width, height } => {
                self.viewport = (width, height);
                backend.resize(width, height);
            }

            Action::CaptureInteractive(path) => {
                self.export_interactive(&path, now);
            }
            Action::CaptureClean {
                path,
                width,
                height,
            } => {
                self.export_clean(&path, width, height, now);
            }
        }
    }

    /// Builds one UI frame and applies the resulting actions.
    pub fn build_ui(&mut self, ctx: &egui::Context, ui: &mut ViewerUi, now: Instant) {
        let actions = {
            let snapshot = self.ui_snapshot();
            ui.build(ctx, &snapshot)
        };
        for action in actions {
            self.dispatch(action, now);
        }
    }

    /// Read-only state for the UI panels.
    pub fn ui_snapshot(&self) -> UiSnapshot<'_> {
        UiSnapshot {
            transfer_function: &self.transfer_function,
            camera: self.camera.state(),
            slice: self.slices.state(),
            view: self.view_settings(),
            recent: self.history.entries(),
            overlay_text: self.overlay.is_visible().then(|| self.overlay.text()),
            notifications: self.notifier.live(),
            viewport: self.viewport(),
        }
    }

    /// Resolves the export dialog against the current viewport.
    pub fn choose_resolution(&self, outcome: DialogOutcome) -> Option<(u32, u32)> {
        match self.window.as_deref() {
            Some(window) => self.export.choose_resolution(outcome, window),
            None => self.export.dialog.finish(outcome, self.viewport),
        }
    }

    /// Saves the window as shown. Failures become notifications.
    pub fn export_interactive(&mut self, path: &Path, now: Instant) -> Option<ExportReport> {
        let result = match self.window.as_deref_mut() {
            Some(window) => self.export.export_interactive(window, path),
            None => Err(volview_render::ExportError::WindowGrab(
                "no window attached".into(),
            )),
        };
        self.report_export(result, now)
    }

    /// Saves an offscreen render without the overlay, always as PNG.
    ///
    /// Falls back to the window grab when offscreen rendering fails; a
    /// notification is raised only if both paths fail.
    pub fn export_clean(
        &mut self,
        path: &Path,
        width: u32,
        height: u32,
        now: Instant,
    ) -> Option<ExportReport> {
        let result = match self.window.as_deref_mut() {
            Some(window) => self.export.export_clean(
                &mut self.backend,
                &mut self.overlay,
                window,
                path,
                width,
                height,
            ),
            None => Err(volview_render::ExportError::WindowGrab(
                "no window attached".into(),
            )),
        };
        self.report_export(result, now)
    }

    fn report_export(
        &mut self,
        result: ExportResult<ExportReport>,
        now: Instant,
    ) -> Option<ExportReport> {
        match result {
            Ok(report) => {
                log::info!(
                    "saved {}x{} capture to {}",
                    report.width,
                    report.height,
                    report.path.display()
                );
                self.notifier.notify(
                    NotificationLevel::Info,
                    format!("Saved {}", report.path.display()),
                    now,
                );
                Some(report)
            }
            Err(err) => {
                self.notifier.notify(
                    NotificationLevel::Error,
                    format!("Screenshot failed: {err}"),
                    now,
                );
                None
            }
        }
    }

    fn report_camera(&mut self, result: BackendResult<()>, now: Instant) {
        if let Err(err) = result {
            self.notifier
                .notify(NotificationLevel::Warning, format!("Camera: {err}"), now);
        }
    }

    fn push_view_settings(&mut self) {
        self.backend
            .set_background_color(self.options.background_color);
        self.backend
            .set_show_bounding_box(self.options.show_bounding_box);
        self.backend
            .set_bounding_box_scale(self.options.bounding_box_scale);
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("dataset", &self.overlay.dataset())
            .field("viewport", &self.viewport())
            .field("camera", &self.camera.state())
            .field("slice", &self.slices.state())
            .field("recent", &self.history.entries())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use volview_core::{
        Capability, ColormapMode, RecordingRenderer, RendererCall, VolumeAxis, VolumeDims,
    };

    use super::*;

    fn recording_viewer(renderer: RecordingRenderer) -> Viewer {
        Viewer::new(renderer, Options::default(), Instant::now())
            .with_history(HistoryStore::in_memory())
    }

    #[test]
    fn test_new_pushes_initial_view_state() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let _viewer = recording_viewer(renderer);
        let calls = log.calls();
        assert!(calls.contains(&RendererCall::SetBackgroundColor([0.1, 0.1, 0.2])));
        assert!(calls.contains(&RendererCall::SetShowBoundingBox(true)));
        assert!(calls.contains(&RendererCall::SetColormapPreset(0)));
    }

    #[test]
    fn test_open_success() {
        let renderer =
            RecordingRenderer::new().with_volume("/data/head.nii", VolumeDims::new(64, 64, 33));
        let log = renderer.log();
        let mut viewer = recording_viewer(renderer);
        let now = Instant::now();
        log.clear();

        assert!(viewer.open(Path::new("/data/head.nii"), now));
        assert_eq!(viewer.history().entries()[0], Path::new("/data/head.nii"));
        assert_eq!(viewer.overlay().dataset(), Some("head.nii"));
        assert_eq!(viewer.slices().state().max_index, 32);
        assert_eq!(viewer.slices().state().index, 16);

        let calls = log.calls();
        assert_eq!(calls[0], RendererCall::LoadVolume("/data/head.nii".into()));
        assert!(calls.contains(&RendererCall::SetShowBoundingBox(true)));
        assert!(calls.contains(&RendererCall::SetColormapPreset(0)));
        assert!(calls.contains(&RendererCall::FrameCameraToBox));
    }

    #[test]
    fn test_open_failure_mutates_nothing() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let mut viewer = recording_viewer(renderer);
        let now = Instant::now();
        log.clear();

        assert!(!viewer.open(Path::new("/missing.nii"), now));
        assert!(viewer.history().is_empty());
        assert_eq!(viewer.overlay().dataset(), None);
        assert_eq!(viewer.notifier().live().len(), 1);
        assert_eq!(viewer.notifier().live()[0].level, NotificationLevel::Error);
        assert_eq!(
            log.calls(),
            vec![RendererCall::LoadVolume("/missing.nii".into())]
        );
    }

    #[test]
    fn test_open_without_load_capability_notifies() {
        let renderer = RecordingRenderer::new().without(Capability::LoadVolume);
        let mut viewer = recording_viewer(renderer);
        assert!(!viewer.open(Path::new("/data/head.nii"), Instant::now()));
        assert_eq!(viewer.notifier().live().len(), 1);
    }

    #[test]
    fn test_dispatch_routes_view_toggles() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let mut viewer = recording_viewer(renderer);
        let now = Instant::now();
        log.clear();

        viewer.dispatch(Action::SetBoundingBoxScale(9.0), now);
        viewer.dispatch(Action::SetShowBoundingBox(false), now);
        viewer.dispatch(Action::SetOverlayVisible(false), now);
        assert_eq!(viewer.options().bounding_box_scale, 5.0);
        assert!(!viewer.view_settings().show_bounding_box);
        assert!(!viewer.overlay().is_visible());
        assert!(viewer.ui_snapshot().overlay_text.is_none());
        assert_eq!(
            log.calls(),
            vec![
                RendererCall::SetBoundingBoxScale(5.0),
                RendererCall::SetShowBoundingBox(false),
            ]
        );
    }

    #[test]
    fn test_dispatch_colormap_flow() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let mut viewer = recording_viewer(renderer);
        let now = Instant::now();

        viewer.dispatch(Action::SetColormapMode(ColormapMode::Custom), now);
        viewer.dispatch(Action::AddPoint(None), now);
        log.clear();
        viewer.dispatch(Action::ApplyCustom, now);

        let points = viewer.transfer_function().points().to_vec();
        assert_eq!(
            log.calls(),
            vec![
                RendererCall::SetColormapModeCustom(true),
                RendererCall::SetTransferFunctionPoints(points),
            ]
        );
    }

    #[test]
    fn test_wheel_and_axis_views() {
        let mut viewer = recording_viewer(RecordingRenderer::new());
        let now = Instant::now();
        let before = viewer.camera().state().distance;
        viewer.dispatch(
            Action::Wheel {
                angle_delta: 120.0,
                fast: false,
            },
            now,
        );
        assert!(viewer.camera().state().distance < before);

        viewer.dispatch(Action::AlignToAxis(VolumeAxis::Y), now);
        assert_eq!(viewer.camera().state().elevation_deg, 89.0);
        assert!(viewer.notifier().is_empty());
    }

    #[test]
    fn test_tick_reports_faults_and_expires() {
        let renderer = RecordingRenderer::new().failing(Capability::Render);
        let mut viewer = recording_viewer(renderer);
        let now = Instant::now();
        viewer.tick(now);
        assert_eq!(viewer.notifier().live().len(), 1);
        assert_eq!(viewer.notifier().live()[0].level, NotificationLevel::Warning);

        let later = now + Duration::from_millis(viewer.options().notification_lifetime_ms + 1);
        viewer.tick(later);
        // The first warning expired; the render failed again.
        assert_eq!(viewer.notifier().live().len(), 1);
        assert!(viewer.notifier().live()[0].expires_at > later);
    }

    #[test]
    fn test_export_without_window_notifies() {
        let mut viewer = recording_viewer(RecordingRenderer::new());
        let report = viewer.export_interactive(Path::new("shot.png"), Instant::now());
        assert!(report.is_none());
        assert_eq!(viewer.notifier().live()[0].level, NotificationLevel::Error);
    }

    #[test]
    fn test_cancelled_dialog_yields_no_resolution() {
        let viewer = recording_viewer(RecordingRenderer::new());
        assert_eq!(viewer.choose_resolution(DialogOutcome::Cancelled), None);
    }
}
