//! Argument lists for the two cmake invocations and the build sentinels.
//!
//! Arguments are `OsString`s so a source path that is not valid UTF-8 reaches
//! cmake byte for byte.

use std::ffi::OsString;
use std::path::Path;

use crate::domain::OptionSet;

/// Last chunk of a streamed build whose process exited with status 0.
pub const BUILD_SUCCEEDED: &str = "\nBuild completed successfully!\n";

/// Last chunk of a streamed build that failed or could not start.
pub const BUILD_FAILED: &str = "\nBuild failed with errors.\n";

/// Configure mode: `<source_dir> -D<ID>=ON|OFF ...`, one define per option in
/// map order.
pub fn configure_args(source_dir: &Path, options: &OptionSet) -> Vec<OsString> {
    let mut args = Vec::with_capacity(options.len() + 1);
    args.push(source_dir.as_os_str().to_owned());
    args.extend(
        options
            .iter()
            .map(|(name, entry)| OsString::from(format!("-D{name}={}", entry.cmake_value()))),
    );
    args
}

/// Build mode: build the current directory with parallel jobs.
pub fn build_args() -> Vec<OsString> {
    ["--build", ".", "--parallel"].map(OsString::from).to_vec()
}

/// The trailing line that ends a streamed build.
pub fn build_sentinel(success: bool) -> &'static str {
    if success {
        BUILD_SUCCEEDED
    } else {
        BUILD_FAILED
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptionEntry;

    #[test]
    fn test_configure_args_source_dir_first() {
        let args = configure_args(Path::new("/src/proj"), &OptionSet::new());
        assert_eq!(args, ["/src/proj"]);
    }

    #[test]
    fn test_configure_args_false_becomes_off() {
        // Arrange
        let mut options = OptionSet::new();
        options.insert("FOO".to_string(), OptionEntry::new("", false));

        // Act
        let args = configure_args(Path::new("/src/proj"), &options);

        // Assert
        assert!(args.contains(&OsString::from("-DFOO=OFF")));
    }

    #[test]
    fn test_configure_args_follow_map_order() {
        let mut options = OptionSet::new();
        options.insert("B".to_string(), OptionEntry::new("b", true));
        options.insert("A".to_string(), OptionEntry::new("a", false));

        let args = configure_args(Path::new("/p"), &options);

        assert_eq!(args, ["/p", "-DB=ON", "-DA=OFF"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_configure_args_keep_non_utf8_source_dir_intact() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        // Arrange: 0xFF can never appear in UTF-8.
        let source = OsStr::from_bytes(b"/src/proj-\xff");

        // Act
        let args = configure_args(Path::new(source), &OptionSet::new());

        // Assert
        assert_eq!(args[0].as_os_str(), source);
        assert_eq!(args[0].as_bytes(), b"/src/proj-\xff");
    }

    #[test]
    fn test_build_args() {
        assert_eq!(build_args(), ["--build", ".", "--parallel"]);
    }

    #[test]
    fn test_build_sentinel() {
        assert_eq!(build_sentinel(true), BUILD_SUCCEEDED);
        assert_eq!(build_sentinel(false), BUILD_FAILED);
    }
}
