//! Infrastructure layer for cmake-config-web.
//!
//! Everything that touches the outside world lives here:
//!
//! - reading `CMakeLists.txt` ([`cmake_lists`])
//! - the TOML settings snapshot ([`settings_store`])
//! - the out-of-source build directory ([`build_dir`])
//! - spawning cmake and collecting its output ([`command_runner`])
//! - the HTTP listener and request handlers ([`http_server`])

pub mod build_dir;
pub mod cmake_lists;
pub mod command_runner;
pub mod http_server;
pub mod settings_store;

pub use build_dir::{default_build_dir, BuildDirError, BuildDirectory};
pub use cmake_lists::{read_cmake_options, ScanError};
pub use command_runner::{CapturedOutput, CommandRunner, ExitOutcome, OutputEvent, RunnerError};
pub use http_server::{router, run_server, AppState};
pub use settings_store::{SettingsError, SettingsStore};
