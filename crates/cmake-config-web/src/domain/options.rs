//! The option model.
//!
//! A CMake project declares boolean switches with
//! `option(NAME "description" ON|OFF)`.  Each switch becomes an
//! [`OptionEntry`] keyed by its identifier inside an [`OptionSet`].
//!
//! The same shape is used in three places, which keeps the conversions
//! trivial:
//!
//! - the scanner's output (defaults read from `CMakeLists.txt`),
//! - the persisted settings snapshot (last user choice),
//! - the JSON body the browser posts to `/save` and `/apply`.
//!
//! ```json
//! {"FOO": {"description": "enable foo", "value": true}}
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered-by-discovery mapping from option identifier to its entry.
///
/// `IndexMap` keeps insertion order, so options appear on the page (and in
/// the `-D` flag list) in the order they were declared or posted.
pub type OptionSet = IndexMap<String, OptionEntry>;

/// A single boolean build switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// Human-readable description taken from the declaration.
    ///
    /// Optional on the wire: the browser may post only `value`.
    #[serde(default)]
    pub description: String,

    /// Current value: `true` maps to `ON`, `false` to `OFF`.
    pub value: bool,
}

impl OptionEntry {
    pub fn new(description: impl Into<String>, value: bool) -> Self {
        Self {
            description: description.into(),
            value,
        }
    }

    /// The CMake spelling of the value.
    pub fn cmake_value(&self) -> &'static str {
        if self.value {
            "ON"
        } else {
            "OFF"
        }
    }
}

/// Overlays a saved snapshot onto freshly scanned options.
///
/// For every identifier present in both maps the saved value wins.  The
/// description always comes from the scan.  Identifiers that only exist in
/// the snapshot are dropped, and scanned options missing from the snapshot
/// keep their declared default.
pub fn merge_saved(mut scanned: OptionSet, saved: Option<&OptionSet>) -> OptionSet {
    let Some(saved) = saved else {
        return scanned;
    };

    for (name, entry) in scanned.iter_mut() {
        if let Some(saved_entry) = saved.get(name) {
            entry.value = saved_entry.value;
        }
    }

    scanned
}

// ── Tests ─────────────────────────────────────────────────────────────────────
