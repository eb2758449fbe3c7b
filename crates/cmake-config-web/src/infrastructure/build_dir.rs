//! The out-of-source build directory.
//!
//! One fixed path per machine, resolved once at startup and then handed to
//! every handler.  Invariant: after any successful operation here the
//! directory exists.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::domain::BuildStatus;

/// Name of the scratch directory created under the temp location.
pub const BUILD_DIR_NAME: &str = "aimrt_build";

/// Errors creating or wiping the build directory.
#[derive(Debug, Error)]
pub enum BuildDirError {
    #[error("failed to create build directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Typically a file still held open by another process.
    #[error("failed to remove build directory {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Handle to the build directory.  Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirectory {
    path: PathBuf,
}

impl BuildDirectory {
    /// Wraps `path` without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Wraps `path` and makes sure the directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`BuildDirError::Create`] if the directory cannot be created.
    pub fn resolve(path: impl Into<PathBuf>) -> Result<Self, BuildDirError> {
        let dir = Self::new(path);
        dir.ensure()?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Creates the directory (and parents) if missing.  Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`BuildDirError::Create`] if creation fails.
    pub fn ensure(&self) -> Result<&Path, BuildDirError> {
        std::fs::create_dir_all(&self.path).map_err(|source| BuildDirError::Create {
            path: self.path.clone(),
            source,
        })?;
        Ok(&self.path)
    }

    /// Removes the directory with everything in it and recreates it empty.
    ///
    /// A directory that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`BuildDirError::Remove`] if removal fails part way, or
    /// [`BuildDirError::Create`] if the fresh directory cannot be created.
    pub fn clean(&self) -> Result<(), BuildDirError> {
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                return Err(BuildDirError::Remove {
                    path: self.path.clone(),
                    source,
                })
            }
        }
        self.ensure()?;
        info!("build directory {} cleaned", self.path.display());
        Ok(())
    }

    /// Snapshot for the configuration page.
    pub fn status(&self) -> BuildStatus {
        BuildStatus {
            exists: self.exists(),
            path: self.path.display().to_string(),
        }
    }
}

/// The default build directory: `$TEMP/aimrt_build`, falling back to
/// `$HOME/aimrt_build`, then to the OS temp directory.
pub fn default_build_dir() -> PathBuf {
    let base = std::env::var_os("TEMP")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    base.join(BUILD_DIR_NAME)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_creates_missing_directory_with_parents() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join("a").join("b").join("build");

        // Act
        let dir = BuildDirectory::resolve(&path).unwrap();

        // Assert
        assert!(path.is_dir());
        assert_eq!(dir.path(), path);
    }

    #[test]
    fn test_ensure_is_idempotent_and_keeps_contents() {
        let root = tempfile::tempdir().unwrap();
        let dir = BuildDirectory::resolve(root.path().join("build")).unwrap();
        std::fs::write(dir.path().join("CMakeCache.txt"), "cache").unwrap();

        let first = dir.ensure().unwrap().to_path_buf();
        let second = dir.ensure().unwrap().to_path_buf();

        assert_eq!(first, second);
        assert!(dir.path().join("CMakeCache.txt").is_file());
    }

    #[test]
    fn test_clean_leaves_same_path_existing_and_empty() {
        // Arrange
        let root = tempfile::tempdir().unwrap();
        let dir = BuildDirectory::resolve(root.path().join("build")).unwrap();
        std::fs::create_dir_all(dir.path().join("CMakeFiles").join("deep")).unwrap();
        std::fs::write(dir.path().join("CMakeFiles").join("deep").join("x.o"), "obj").unwrap();
        let before = dir.path().to_path_buf();

        // Act
        dir.clean().unwrap();

        // Assert
        assert_eq!(dir.path(), before);
        assert!(dir.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_clean_recreates_directory_that_was_removed() {
        let root = tempfile::tempdir().unwrap();
        let dir = BuildDirectory::new(root.path().join("never-created"));

        dir.clean().unwrap();

        assert!(dir.exists());
    }

    #[test]
    fn test_ensure_fails_when_path_is_a_file() {
        let root = tempfile::tempdir().unwrap();
        let file = root.path().join("occupied");
        std::fs::write(&file, "not a dir").unwrap();

        let dir = BuildDirectory::new(&file);
        let result = dir.ensure();

        assert!(matches!(result, Err(BuildDirError::Create { .. })));
    }

    #[test]
    fn test_status_reports_existence_and_path() {
        let root = tempfile::tempdir().unwrap();
        let dir = BuildDirectory::new(root.path().join("build"));

        assert!(!dir.status().exists);
        dir.ensure().unwrap();
        let status = dir.status();
        assert!(status.exists);
        assert_eq!(status.path, dir.path().display().to_string());
    }

    #[test]
    fn test_default_build_dir_ends_with_fixed_name() {
        assert!(default_build_dir().ends_with(BUILD_DIR_NAME));
    }
}
