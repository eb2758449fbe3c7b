//! Domain layer for cmake-config-web.
//!
//! Pure types with no I/O: the option model shared by the scanner, the
//! settings store and the browser, the runtime configuration, and the JSON
//! bodies returned by the action endpoints.
//!
//! Nothing in here touches the file system, spawns processes, or reads
//! environment variables.  The infrastructure layer populates these types.

pub mod config;
pub mod messages;
pub mod options;

pub use config::ToolConfig;
pub use messages::{ApplyResponse, BuildStatus, CleanResponse, SaveResponse, Status};
pub use options::{OptionEntry, OptionSet};
