//! The host window, as seen by the export pipeline.

use volview_core::Frame;

use crate::error::ExportResult;

/// A window whose current contents, UI chrome included, can be read back.
pub trait WindowGrabber {
    /// Current size of the render viewport in pixels.
    fn viewport_size(&self) -> (u32, u32);

    /// Returns exactly what is on screen.
    fn grab_window(&mut self) -> ExportResult<Frame>;
}
