//! cmake-config-web library crate.
//!
//! A local browser front end for a CMake project: it lists the project's
//! `option(...)` switches as checkboxes, remembers the last choice, runs
//! `cmake` to configure with those switches, and streams `cmake --build`
//! output back to the page.
//!
//! # Architecture
//!
//! ```text
//! Browser (HTML page, JSON actions, streamed build text)
//!         ↕
//! [cmake-config-web]
//!   ├── domain/           Option model, ToolConfig, JSON response bodies
//!   ├── application/      Option scanning, cmake arguments, page rendering
//!   └── infrastructure/
//!         ├── cmake_lists/     read CMakeLists.txt
//!         ├── settings_store/  TOML snapshot of the last choice
//!         ├── build_dir/       out-of-source build directory
//!         ├── command_runner/  cmake child processes (tokio)
//!         └── http_server/     axum router and handlers
//!         ↕
//! cmake (child process, working directory = build directory)
//! ```
//!
//! # Layer rules
//!
//! - `domain` does no I/O.
//! - `application` depends on `domain` only and does no I/O.
//! - `infrastructure` depends on all other layers plus `tokio` and `axum`.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: scanning, argument construction, rendering.
pub mod application;

/// Infrastructure layer: files, processes and HTTP.
pub mod infrastructure;
