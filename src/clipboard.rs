//! Clipboard integration

use crate::{FalarError, Result};
use arboard::Clipboard;
use log::debug;

/// Get text from the system clipboard
pub fn get_from_clipboard() -> Result<String> {
    debug!("Getting text from clipboard");

    let mut clipboard = Clipboard::new()
        .map_err(|e| FalarError::Clipboard(format!("Failed to open clipboard: {}", e)))?;

    clipboard
        .get_text()
        .map_err(|e| FalarError::Clipboard(format!("Failed to get from clipboard: {}", e)))
}
