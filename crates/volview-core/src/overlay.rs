//! On-screen dataset/FPS readout.

use std::time::{Duration, Instant};

/// Averaging window for the FPS readout.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Counts frames and reports the rate once per [`FPS_WINDOW`].
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0.0,
        }
    }

    /// Counts one frame. Returns `true` when a new rate was computed.
    #[allow(clippy::cast_precision_loss)]
    pub fn frame(&mut self, now: Instant) -> bool {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < FPS_WINDOW {
            return false;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        true
    }

    /// Last computed rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Starts a fresh window, e.g. after a dataset change.
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }
}

/// Dataset name, FPS and visibility of the overlay label.
#[derive(Debug, Clone)]
pub struct Overlay {
    dataset: Option<String>,
    visible: bool,
    fps: FpsCounter,
}

impl Overlay {
    pub fn new(visible: bool, now: Instant) -> Self {
        Self {
            dataset: None,
            visible,
            fps: FpsCounter::new(now),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    /// Shows a new dataset name and restarts the FPS window.
    pub fn set_dataset(&mut self, name: impl Into<String>, now: Instant) {
        self.dataset = Some(name.into());
        self.fps.reset(now);
    }

    /// Counts a rendered frame.
    pub fn frame(&mut self, now: Instant) -> bool {
        self.fps.frame(now)
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    /// Label text: `"<name>\n<fps> FPS"`.
    pub fn text(&self) -> String {
        format!(
            "{}\n{:.1} FPS",
            self.dataset.as_deref().unwrap_or("No dataset"),
            self.fps.fps()
        )
    }

    /// Window title carrying the rate.
    pub fn window_title(&self, base: &str) -> String {
        format!("{base} - {:.1} FPS", self.fps.fps())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_reported_once_per_window() {
        let start = Instant::now();
        let mut counter = FpsCounter::new(start);
        for i in 1..30 {
            assert!(!counter.frame(start + Duration::from_millis(i * 30)));
        }
        assert!(counter.frame(start + Duration::from_millis(1500)));
        assert!((counter.fps() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_text_without_dataset() {
        let overlay = Overlay::new(true, Instant::now());
        assert_eq!(overlay.text(), "No dataset\n0.0 FPS");
    }

    #[test]
    fn test_text_with_dataset() {
        let now = Instant::now();
        let mut overlay = Overlay::new(true, now);
        overlay.set_dataset("head.nii", now);
        assert_eq!(overlay.text(), "head.nii\n0.0 FPS");
        assert_eq!(overlay.window_title("volview"), "volview - 0.0 FPS");
    }
}
