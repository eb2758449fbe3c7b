//! Reads the project's `CMakeLists.txt` and scans it for options.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::application::scan_options;
use crate::domain::OptionSet;

/// The option source could not be read.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads `path` and returns the options it declares, in discovery order.
///
/// # Errors
///
/// Returns [`ScanError::Io`] if the file cannot be opened or is not UTF-8.
/// Malformed declarations are never an error; they are skipped.
pub fn read_cmake_options(path: &Path) -> Result<OptionSet, ScanError> {
    let text = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let options = scan_options(&text);
    debug!("scanned {} option(s) from {}", options.len(), path.display());
    Ok(options)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
