//! TOML persistence for the last chosen option values.
//!
//! The snapshot is one table per option identifier:
//!
//! ```toml
//! [AIMRT_BUILD_TESTS]
//! description = "AimRT build tests."
//! value = false
//!
//! [AIMRT_BUILD_EXAMPLES]
//! description = "AimRT build examples."
//! value = true
//! ```
//!
//! Every save overwrites the whole file; there is no history and no merge.
//! Merging with the freshly scanned options is the caller's job (see
//! [`crate::domain::options::merge_saved`]).

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::domain::OptionSet;

/// Error type for settings snapshot operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file exists but is not a valid snapshot.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The snapshot could not be serialized to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// File-backed store for the settings snapshot.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the snapshot with `options`.
    ///
    /// Creates the parent directory if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system failures or
    /// [`SettingsError::Serialize`] if serialization fails.
    pub fn save(&self, options: &OptionSet) -> Result<(), SettingsError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| SettingsError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = toml::to_string_pretty(options)?;
        std::fs::write(&self.path, content).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;

        debug!("saved {} option(s) to {}", options.len(), self.path.display());
        Ok(())
    }

    /// Loads the last saved snapshot, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] for file-system errors other than "not
    /// found", and [`SettingsError::Parse`] if the TOML is malformed.
    pub fn load(&self) -> Result<Option<OptionSet>, SettingsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(toml::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SettingsError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
