//! JSON bodies returned to the browser.
//!
//! ```json
//! {"status":"success"}                                  // POST /save
//! {"status":"error","message":"Failed to parse ..."}    // POST /save, bad body
//! {"status":"error","message":"permission denied"}      // POST /clean
//! {"status":"success","output":"-- Configuring done"}   // POST /apply
//! ```

use serde::{Deserialize, Serialize};

/// Outcome tag shared by every action response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl Status {
    pub fn from_success(success: bool) -> Self {
        if success {
            Status::Success
        } else {
            Status::Error
        }
    }
}

/// Response to `POST /save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub status: Status,
    /// Set only when the request body was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response to `POST /clean`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanResponse {
    pub status: Status,
    pub message: String,
}

/// Response to `POST /apply`: exit outcome plus everything cmake printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResponse {
    pub status: Status,
    pub output: String,
}

/// Build directory state shown on the configuration page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStatus {
    pub exists: bool,
    pub path: String,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
