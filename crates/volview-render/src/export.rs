//! Capturing the view to image files.
//!
//! Two paths exist. An interactive capture grabs the window exactly as shown,
//! UI chrome included. A clean capture renders offscreen at any resolution
//! with the overlay hidden; it temporarily changes the overlay flag and the
//! render-target size and puts both back on every exit path.

use std::path::{Path, PathBuf};

use volview_core::{Backend, BackendResult, Frame, Overlay};

use crate::error::ExportResult;
use crate::resolution::{DialogOutcome, ResolutionDialog};
use crate::screenshot::{save_image, save_png};
use crate::window::WindowGrabber;

/// Where a clean capture's pixels came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    Offscreen,
    /// Offscreen rendering failed and the window was grabbed instead.
    Window,
}

/// A captured frame and its origin.
#[derive(Debug, Clone)]
pub struct Capture {
    pub frame: Frame,
    pub source: CaptureSource,
}

/// A file written by an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub source: CaptureSource,
}

/// Restores overlay visibility and target size when dropped.
struct CleanCaptureGuard<'a> {
    backend: &'a mut Backend,
    overlay: &'a mut Overlay,
    overlay_was_visible: bool,
    viewport: (u32, u32),
    target_created: bool,
}

impl<'a> CleanCaptureGuard<'a> {
    fn new(backend: &'a mut Backend, overlay: &'a mut Overlay, viewport: (u32, u32)) -> Self {
        let overlay_was_visible = overlay.is_visible();
        overlay.set_visible(false);
        Self {
            backend,
            overlay,
            overlay_was_visible,
            viewport,
            target_created: false,
        }
    }

    fn render_offscreen(&mut self, width: u32, height: u32) -> BackendResult<Frame> {
        self.backend.try_create_offscreen_target(width, height)?;
        self.target_created = true;
        self.backend.try_resize(width, height)?;
        self.backend.try_render()?;
        self.backend.try_read_offscreen_pixels()
    }
}

impl Drop for CleanCaptureGuard<'_> {
    fn drop(&mut self) {
        let (width, height) = self.viewport;
        self.backend.resize(width, height);
        if self.target_created {
            self.backend.release_offscreen_target();
        }
        self.overlay.set_visible(self.overlay_was_visible);
    }
}

/// Grabs exactly what is on screen. Mutates nothing.
pub fn capture_interactive(window: &mut dyn WindowGrabber) -> ExportResult<Frame> {
    window.grab_window()
}

/// Renders offscreen at `width` x `height` without the overlay.
///
/// Falls back to [`capture_interactive`] if the offscreen path fails at any
/// step. Overlay visibility and the target size are restored either way.
pub fn capture_clean(
    backend: &mut Backend,
    overlay: &mut Overlay,
    window: &mut dyn WindowGrabber,
    width: u32,
    height: u32,
) -> ExportResult<Capture> {
    let viewport = window.viewport_size();
    let offscreen = {
        let mut guard = CleanCaptureGuard::new(backend, overlay, viewport);
        guard.render_offscreen(width, height)
    };
    match offscreen {
        Ok(frame) => Ok(Capture {
            frame,
            source: CaptureSource::Offscreen,
        }),
        Err(err) => {
            log::warn!("offscreen capture failed ({err}), grabbing the window instead");
            let frame = capture_interactive(window)?;
            Ok(Capture {
                frame,
                source: CaptureSource::Window,
            })
        }
    }
}

/// Export front end: resolution choice plus capture-and-save.
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    pub dialog: ResolutionDialog,
}

impl ExportPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the dialog; `None` when cancelled.
    pub fn choose_resolution(
        &self,
        outcome: DialogOutcome,
        window: &dyn WindowGrabber,
    ) -> Option<(u32, u32)> {
        self.dialog.finish(outcome, window.viewport_size())
    }

    /// Saves the window as shown, as PNG or JPEG by extension.
    pub fn export_interactive(
        &self,
        window: &mut dyn WindowGrabber,
        path: &Path,
    ) -> ExportResult<ExportReport> {
        let frame = capture_interactive(window)?;
        save_image(path, &frame)?;
        Ok(ExportReport {
            path: path.to_path_buf(),
            width: frame.width,
            height: frame.height,
            source: CaptureSource::Window,
        })
    }

    /// Saves a clean capture. The output is always PNG.
    pub fn export_clean(
        &self,
        backend: &mut Backend,
        overlay: &mut Overlay,
        window: &mut dyn WindowGrabber,
        path: &Path,
        width: u32,
        height: u32,
    ) -> ExportResult<ExportReport> {
        let capture = capture_clean(backend, overlay, window, width, height)?;
        let path = save_png(path, &capture.frame)?;
        Ok(ExportReport {
            path,
            width: capture.frame.width,
            height: capture.frame.height,
            source: capture.source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use volview_core::{Capability, RecordingRenderer, RendererCall};

    use super::*;
    use crate::error::ExportError;

    struct StaticWindow {
        frame: Frame,
        grabs: usize,
    }

    impl StaticWindow {
        fn new(width: u32, height: u32) -> Self {
            Self {
                frame: Frame::solid(width, height, [1, 2, 3, 255]),
                grabs: 0,
            }
        }
    }

    impl WindowGrabber for StaticWindow {
        fn viewport_size(&self) -> (u32, u32) {
            (self.frame.width, self.frame.height)
        }

        fn grab_window(&mut self) -> ExportResult<Frame> {
            self.grabs += 1;
            Ok(self.frame.clone())
        }
    }

    struct BrokenWindow;

    impl WindowGrabber for BrokenWindow {
        fn viewport_size(&self) -> (u32, u32) {
            (320, 200)
        }

        fn grab_window(&mut self) -> ExportResult<Frame> {
            Err(ExportError::WindowGrab("no surface".into()))
        }
    }

    #[test]
    fn test_clean_capture_renders_offscreen_and_restores() {
        let renderer = RecordingRenderer::new();
        let log = renderer.log();
        let mut backend = Backend::new(renderer);
        let mut overlay = Overlay::new(true, Instant::now());
        let mut window = StaticWindow::new(320, 200);

        let capture = capture_clean(&mut backend, &mut overlay, &mut window, 1920, 1080).unwrap();
        assert_eq!(capture.source, CaptureSource::Offscreen);
        assert_eq!((capture.frame.width, capture.frame.height), (1920, 1080));
        assert!(overlay.is_visible());
        assert_eq!(window.grabs, 0);
        assert_eq!(
            log.calls(),
            vec![
                RendererCall::CreateOffscreenTarget(1920, 1080),
                RendererCall::Resize(1920, 1080),
                RendererCall::Render,
                RendererCall::ReadOffscreenPixels,
                RendererCall::Resize(320, 200),
                RendererCall::ReleaseOffscreenTarget,
            ]
        );
    }

    #[test]
    fn test_render_failure_restores_and_falls_back() {
        let renderer = RecordingRenderer::new().failing(Capability::Render);
        let log = renderer.log();
        let mut backend = Backend::new(renderer);
        let mut overlay = Overlay::new(true, Instant::now());
        let mut window = StaticWindow::new(320, 200);

        let capture = capture_clean(&mut backend, &mut overlay, &mut window, 640, 480).unwrap();
        assert_eq!(capture.source, CaptureSource::Window);
        assert!(overlay.is_visible());
        assert_eq!(window.grabs, 1);
        assert_eq!(log.last(), Some(RendererCall::ReleaseOffscreenTarget));
        assert!(log.calls().contains(&RendererCall::Resize(320, 200)));
    }

    #[test]
    fn test_hidden_overlay_stays_hidden() {
        let mut backend = Backend::new(RecordingRenderer::new());
        let mut overlay = Overlay::new(false, Instant::now());
        let mut window = StaticWindow::new(64, 64);
        capture_clean(&mut backend, &mut overlay, &mut window, 32, 32).unwrap();
        assert!(!overlay.is_visible());
    }

    #[test]
    fn test_missing_offscreen_falls_back_without_release() {
        let renderer = RecordingRenderer::new().without(Capability::CreateOffscreenTarget);
        let log = renderer.log();
        let mut backend = Backend::new(renderer);
        let mut overlay = Overlay::new(true, Instant::now());
        let mut window = StaticWindow::new(64, 64);
        let capture = capture_clean(&mut backend, &mut overlay, &mut window, 32, 32).unwrap();
        assert_eq!(capture.source, CaptureSource::Window);
        assert_eq!(log.count(|c| *c == RendererCall::ReleaseOffscreenTarget), 0);
    }

    #[test]
    fn test_both_paths_failing_is_an_error() {
        let renderer = RecordingRenderer::new().failing(Capability::CreateOffscreenTarget);
        let mut backend = Backend::new(renderer);
        let mut overlay = Overlay::new(true, Instant::now());
        let result = capture_clean(&mut backend, &mut overlay, &mut BrokenWindow, 32, 32);
        assert!(matches!(result, Err(ExportError::WindowGrab(_))));
        assert!(overlay.is_visible());
    }

    #[test]
    fn test_export_clean_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = Backend::new(RecordingRenderer::new());
        let mut overlay = Overlay::new(true, Instant::now());
        let mut window = StaticWindow::new(64, 64);
        let pipeline = ExportPipeline::new();
        let report = pipeline
            .export_clean(
                &mut backend,
                &mut overlay,
                &mut window,
                &dir.path().join("view.jpg"),
                40,
                30,
            )
            .unwrap();
        assert_eq!(report.path, dir.path().join("view.png"));
        assert_eq!((report.width, report.height), (40, 30));
        assert!(report.path.exists());
    }

    #[test]
    fn test_cancelled_dialog_captures_nothing() {
        let pipeline = ExportPipeline::new();
        let window = StaticWindow::new(64, 64);
        assert_eq!(
            pipeline.choose_resolution(DialogOutcome::Cancelled, &window),
            None
        );
    }
}
