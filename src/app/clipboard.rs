//! Copy to the system clipboard

use super::App;
use crate::constants::{TOAST_COPIED, TOAST_COPY_FAILED};
use std::time::Instant;
use tracing::{debug, warn};

/// Set clipboard text, opening the clipboard on first use.
/// The handle stays alive so the content survives on X11/Wayland.
fn copy_text(slot: &mut Option<arboard::Clipboard>, text: &str) -> Result<(), arboard::Error> {
    if slot.is_none() {
        *slot = Some(arboard::Clipboard::new()?);
    }
    if let Some(clipboard) = slot.as_mut() {
        clipboard.set_text(text)?;
    }
    Ok(())
}

impl App {
    pub(crate) fn copy_to_clipboard(&mut self, text: &str) {
        let result = copy_text(&mut self.clipboard, text);
        self.report_copy(text, result);
    }

    /// Toast the outcome of a copy
    fn report_copy(&mut self, text: &str, result: Result<(), arboard::Error>) {
        let now = Instant::now();
        match result {
            Ok(()) => {
                debug!(chars = text.chars().count(), "Copied to clipboard");
                self.toasts.success(TOAST_COPIED, now);
            }
            Err(e) => {
                warn!(error = %e, "Clipboard copy failed");
                // A broken handle is dropped so the next attempt reopens it
                self.clipboard = None;
                self.toasts.error(TOAST_COPY_FAILED, now);
            }
        }
    }
}
