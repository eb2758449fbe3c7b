//! `option(...)` declaration scanning.
//!
//! CMake has no machine-readable option listing short of running a
//! configure, so the declarations are scraped from the text with a regular
//! expression.  The contract is deliberately narrow:
//!
//! ```text
//! option(<IDENT> "<description>" <TOKEN>)
//! ```
//!
//! - `IDENT` and `TOKEN` are word characters (`[A-Za-z0-9_]+`).
//! - `IDENT` must follow `(` directly.  After that, any whitespace (newlines
//!   included) may separate the three parts, so a declaration split over
//!   several lines still matches.
//! - The description must be non-empty and cannot contain `"`.
//! - Nothing may sit between `TOKEN` and `)`, not even a space.
//! - The default is `true` only when `TOKEN` is exactly `ON`.
//!
//! Anything else is silently skipped.  There is no partial result for a
//! malformed declaration and no error.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::{OptionEntry, OptionSet};

/// The declaration pattern.  Capture groups: identifier, description, default.
pub const OPTION_PATTERN: &str = r#"option\((\w+)\s+"([^"]+)"\s+(\w+)\)"#;

fn option_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is a compile-time constant covered by the tests below.
    RE.get_or_init(|| Regex::new(OPTION_PATTERN).expect("OPTION_PATTERN is a valid regex"))
}

/// Extracts every well-formed option declaration from `text`.
///
/// Options are returned in discovery order.  When an identifier is declared
/// twice the later declaration's description and default win, but the
/// option keeps the position of its first appearance.
pub fn scan_options(text: &str) -> OptionSet {
    let mut options = OptionSet::new();

    for caps in option_regex().captures_iter(text) {
        let name = caps[1].to_string();
        let description = caps[2].to_string();
        let default_on = &caps[3] == "ON";
        options.insert(name, OptionEntry::new(description, default_on));
    }

    options
}

// ── Tests ─────────────────────────────────────────────────────────────────────
