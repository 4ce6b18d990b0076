//! Clipboard functionality for copying calculator results.

use arboard::Clipboard;
use thiserror::Error;

use super::editor::Calculator;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("Nothing to copy: the last calculation failed")]
    ErrorDisplayed,

    #[error("Failed to access clipboard: {0}")]
    Unavailable(#[source] arboard::Error),

    #[error("Failed to copy to clipboard: {0}")]
    CopyFailed(#[source] arboard::Error),
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(ClipboardError::Unavailable)?;

    clipboard
        .set_text(text.to_string())
        .map_err(ClipboardError::CopyFailed)
}

/// Copy the calculator display. The `Error` placeholder is never copied.
pub fn copy_display(calculator: &Calculator) -> Result<(), ClipboardError> {
    if calculator.is_error() {
        return Err(ClipboardError::ErrorDisplayed);
    }
    copy_to_clipboard(calculator.display())
}
