//! Plain-text file loading and export
//!
//! Paths come from the caller (a file dialog, the command line, ...).

use crate::{ReadAloudError, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;

/// Read a UTF-8 text file
///
/// Returns `InvalidEncoding` when the file isn't valid UTF-8 so the front
/// end can tell the user to pick a text file.
pub fn read_text_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    debug!("Reading text from {:?}", path);

    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| ReadAloudError::InvalidEncoding(path.display().to_string()))?;

    info!("Loaded {} chars from {:?}", text.len(), path);
    Ok(text)
}

/// Write trimmed text to a file
///
/// Empty (or whitespace-only) content is rejected with `NothingToExport`
/// and no file is created.
pub fn export_text_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    let content = content.trim();

    if content.is_empty() {
        return Err(ReadAloudError::NothingToExport);
    }

    fs::write(path, content)?;
    info!("Exported {} chars to {:?}", content.len(), path);
    Ok(())
}
