//! cmake-config-web — entry point.
//!
//! Serves a configuration page for one CMake project on a local port.
//!
//! # Usage
//!
//! ```text
//! cmake-config-web [OPTIONS]
//!
//! Options:
//!   --host          <HOST>  Address to bind [default: 127.0.0.1]
//!   --port          <PORT>  Port to bind [default: 5000]
//!   --project-root  <DIR>   CMake source tree [default: .]
//!   --settings-file <FILE>  Snapshot file [default: <project-root>/cmake_config_tool/cmake_config.toml]
//!   --build-dir     <DIR>   Build directory [default: $TEMP/aimrt_build, else $HOME/aimrt_build]
//!   --cmake         <PROG>  Build tool to invoke [default: cmake]
//! ```
//!
//! Every option can also be set through the environment variable listed in
//! `--help` (`CMAKE_UI_*`).  CLI args take precedence.
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cmake_config_web::domain::config::DEFAULT_SETTINGS_RELATIVE;
use cmake_config_web::domain::ToolConfig;
use cmake_config_web::infrastructure::{default_build_dir, run_server};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Browser front end for toggling CMake options and running configure/build.
#[derive(Debug, Parser)]
#[command(
    name = "cmake-config-web",
    about = "Local web UI for CMake option configuration and builds",
    version
)]
struct Cli {
    /// IP address to bind the HTTP server to.
    ///
    /// `127.0.0.1` keeps the tool local; use `0.0.0.0` to expose it on the LAN.
    #[arg(long, default_value = "127.0.0.1", env = "CMAKE_UI_HOST")]
    host: String,

    /// TCP port for the HTTP server.
    #[arg(long, default_value_t = 5000, env = "CMAKE_UI_PORT")]
    port: u16,

    /// Directory containing the project's CMakeLists.txt.
    #[arg(long, default_value = ".", env = "CMAKE_UI_PROJECT_ROOT")]
    project_root: PathBuf,

    /// Where the last chosen option values are saved.
    #[arg(long, env = "CMAKE_UI_SETTINGS_FILE")]
    settings_file: Option<PathBuf>,

    /// Out-of-source build directory.
    #[arg(long, env = "CMAKE_UI_BUILD_DIR")]
    build_dir: Option<PathBuf>,

    /// Build tool executable.
    #[arg(long = "cmake", default_value = "cmake", env = "CMAKE_UI_CMAKE")]
    cmake_program: String,
}

impl Cli {
    /// Converts the parsed CLI arguments into a [`ToolConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if `--host` is not a valid IP address or
    /// `--project-root` does not exist.
    fn into_tool_config(self) -> anyhow::Result<ToolConfig> {
        let bind_addr: SocketAddr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address: '{}:{}'", self.host, self.port))?;

        // cmake runs inside the build directory, so the source path handed to
        // it must be absolute.
        let project_root = self.project_root.canonicalize().with_context(|| {
            format!("project root '{}' does not exist", self.project_root.display())
        })?;

        let settings_path = self
            .settings_file
            .unwrap_or_else(|| project_root.join(DEFAULT_SETTINGS_RELATIVE));
        let build_dir = self.build_dir.unwrap_or_else(default_build_dir);

        Ok(ToolConfig {
            bind_addr,
            project_root,
            settings_path,
            build_dir,
            cmake_program: self.cmake_program,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_tool_config()?;

    info!(
        "cmake-config-web starting — project={}, build dir={}",
        config.project_root.display(),
        config.build_dir.display()
    );

    run_server(config).await?;

    info!("cmake-config-web stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const CLI_ENV_VARS: [&str; 6] = [
        "CMAKE_UI_HOST",
        "CMAKE_UI_PORT",
        "CMAKE_UI_PROJECT_ROOT",
        "CMAKE_UI_SETTINGS_FILE",
        "CMAKE_UI_BUILD_DIR",
        "CMAKE_UI_CMAKE",
    ];

    /// Defaults are only observable when the developer's shell exports none
    /// of the fallbacks.  No test sets them, so removing is enough.
    fn clear_cli_env() {
        for var in CLI_ENV_VARS {
            std::env::remove_var(var);
        }
    }

    fn cli_in(dir: &std::path::Path, extra: &[&str]) -> Cli {
        clear_cli_env();
        let root = dir.to_str().unwrap();
        let mut args = vec!["cmake-config-web", "--project-root", root];
        args.extend_from_slice(extra);
        Cli::parse_from(args)
    }

    #[test]
    fn test_cli_defaults() {
        clear_cli_env();
        let cli = Cli::parse_from(["cmake-config-web"]);
        assert_eq!(cli.host, "127.0.0.1");
        assert_eq!(cli.port, 5000);
        assert_eq!(cli.project_root, PathBuf::from("."));
        assert_eq!(cli.cmake_program, "cmake");
        assert!(cli.settings_file.is_none());
        assert!(cli.build_dir.is_none());
    }

    #[test]
    fn test_cli_port_and_program_override() {
        clear_cli_env();
        let cli = Cli::parse_from(["cmake-config-web", "--port", "8080", "--cmake", "/opt/cmake/bin/cmake"]);
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.cmake_program, "/opt/cmake/bin/cmake");
    }

    #[test]
    fn test_into_tool_config_derives_defaults_from_project_root() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(dir.path(), &[]);

        // Act
        let config = cli.into_tool_config().unwrap();

        // Assert
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(config.project_root, root);
        assert_eq!(config.settings_path, root.join(DEFAULT_SETTINGS_RELATIVE));
        assert!(config.build_dir.ends_with("aimrt_build"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn test_into_tool_config_explicit_paths_win() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(
            dir.path(),
            &["--settings-file", "/tmp/s.toml", "--build-dir", "/tmp/b"],
        );

        let config = cli.into_tool_config().unwrap();

        assert_eq!(config.settings_path, PathBuf::from("/tmp/s.toml"));
        assert_eq!(config.build_dir, PathBuf::from("/tmp/b"));
    }

    #[test]
    fn test_into_tool_config_invalid_host_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(dir.path(), &["--host", "not.an.ip"]);

        assert!(cli.into_tool_config().is_err());
    }

    #[test]
    fn test_into_tool_config_missing_project_root_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let cli = cli_in(&dir.path().join("missing"), &[]);

        assert!(cli.into_tool_config().is_err());
    }
}
