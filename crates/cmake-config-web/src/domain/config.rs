//! Runtime configuration.
//!
//! [`ToolConfig`] is built once at startup (from CLI args, see `main.rs`) and
//! shared read-only by every request handler.  The build directory path lives
//! here too, so no component recomputes it on its own.

use std::net::SocketAddr;
use std::path::PathBuf;

/// File name of the CMake project definition scanned for `option(...)`.
pub const CMAKE_LISTS_FILE: &str = "CMakeLists.txt";

/// Default settings snapshot location, relative to the project root.
pub const DEFAULT_SETTINGS_RELATIVE: &str = "cmake_config_tool/cmake_config.toml";

/// Default HTTP listener address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// All runtime settings for the web front end.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Absolute path of the CMake source tree.
    ///
    /// Must be absolute: cmake runs with the build directory as its working
    /// directory, so a relative source path would resolve against the wrong
    /// base.
    pub project_root: PathBuf,

    /// Where the settings snapshot is persisted.
    pub settings_path: PathBuf,

    /// Out-of-source scratch directory handed to cmake.
    pub build_dir: PathBuf,

    /// Program invoked for configure and build (normally `cmake`).
    pub cmake_program: String,
}

impl ToolConfig {
    /// Builds a config for `project_root` using default values for everything
    /// that has one.
    pub fn for_project(project_root: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            settings_path: project_root.join(DEFAULT_SETTINGS_RELATIVE),
            project_root,
            build_dir: build_dir.into(),
            cmake_program: "cmake".to_string(),
        }
    }

    /// Path of the `CMakeLists.txt` that declares the options.
    pub fn cmake_lists_path(&self) -> PathBuf {
        self.project_root.join(CMAKE_LISTS_FILE)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
