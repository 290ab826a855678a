//! Export resolution selection.

/// Bounds for a custom export side, in pixels.
pub const CUSTOM_SIDE_RANGE: std::ops::RangeInclusive<u32> = 16..=16384;

/// A named export resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPreset {
    /// Whatever the viewport currently measures.
    #[default]
    Window,
    Hd720,
    Hd1080,
    Uhd2160,
    Custom,
}

impl ResolutionPreset {
    /// All presets in menu order.
    pub const ALL: [ResolutionPreset; 5] = [
        ResolutionPreset::Window,
        ResolutionPreset::Hd720,
        ResolutionPreset::Hd1080,
        ResolutionPreset::Uhd2160,
        ResolutionPreset::Custom,
    ];

    /// Returns display name.
    pub fn name(self) -> &'static str {
        match self {
            ResolutionPreset::Window => "Window size",
            ResolutionPreset::Hd720 => "1280 x 720",
            ResolutionPreset::Hd1080 => "1920 x 1080",
            ResolutionPreset::Uhd2160 => "3840 x 2160",
            ResolutionPreset::Custom => "Custom",
        }
    }

    /// Fixed size of the preset, if it has one.
    pub fn size(self) -> Option<(u32, u32)> {
        match self {
            ResolutionPreset::Hd720 => Some((1280, 720)),
            ResolutionPreset::Hd1080 => Some((1920, 1080)),
            ResolutionPreset::Uhd2160 => Some((3840, 2160)),
            ResolutionPreset::Window | ResolutionPreset::Custom => None,
        }
    }
}

/// How the dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Accepted,
    Cancelled,
}

/// State of the resolution picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionDialog {
    pub preset: ResolutionPreset,
    pub custom_width: u32,
    pub custom_height: u32,
}

impl Default for ResolutionDialog {
    fn default() -> Self {
        Self {
            preset: ResolutionPreset::Window,
            custom_width: 1920,
            custom_height: 1080,
        }
    }
}

fn clamp_side(side: u32) -> u32 {
    side.clamp(*CUSTOM_SIDE_RANGE.start(), *CUSTOM_SIDE_RANGE.end())
}

impl ResolutionDialog {
    /// Resolution currently selected, given the viewport size.
    pub fn selected(&self, viewport: (u32, u32)) -> (u32, u32) {
        match self.preset {
            ResolutionPreset::Window => viewport,
            ResolutionPreset::Custom => (clamp_side(self.custom_width), clamp_side(self.custom_height)),
            preset => preset.size().unwrap_or(viewport),
        }
    }

    /// Closes the dialog. `None` means no capture should happen.
    pub fn finish(&self, outcome: DialogOutcome, viewport: (u32, u32)) -> Option<(u32, u32)> {
        match outcome {
            DialogOutcome::Accepted => Some(self.selected(viewport)),
            DialogOutcome::Cancelled => {
                log::debug!("export cancelled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let mut dialog = ResolutionDialog::default();
        assert_eq!(dialog.selected((800, 600)), (800, 600));
        dialog.preset = ResolutionPreset::Uhd2160;
        assert_eq!(dialog.selected((800, 600)), (3840, 2160));
    }

    #[test]
    fn test_custom_is_bounded() {
        let dialog = ResolutionDialog {
            preset: ResolutionPreset::Custom,
            custom_width: 4,
            custom_height: 100_000,
        };
        assert_eq!(dialog.selected((800, 600)), (16, 16384));
    }

    #[test]
    fn test_cancel_returns_none() {
        let dialog = ResolutionDialog::default();
        assert_eq!(dialog.finish(DialogOutcome::Cancelled, (800, 600)), None);
        assert_eq!(
            dialog.finish(DialogOutcome::Accepted, (800, 600)),
            Some((800, 600))
        );
    }
}
