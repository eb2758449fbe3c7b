//! Application layer for cmake-config-web.
//!
//! Pure functions that decide *what* happens: which options a
//! `CMakeLists.txt` declares, which arguments cmake receives, how a build
//! outcome is reported, and what the configuration page looks like.  All
//! file, process and socket work is left to the infrastructure layer.

pub mod invocation;
pub mod page;
pub mod scanner;

pub use invocation::{build_args, build_sentinel, configure_args, BUILD_FAILED, BUILD_SUCCEEDED};
pub use page::render_page;
pub use scanner::{scan_options, OPTION_PATTERN};
