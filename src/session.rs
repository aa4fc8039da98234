//! Session types
//!
//! A `Session` groups the QR payloads scanned during one scanning flow.
//! Each `ScannedCode` belongs to exactly one session and disappears with it.

use crate::{Error, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format of `created_at` columns (UTC, millisecond precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Parse a stored `created_at` value.
///
/// Accepts both the millisecond format written by the schema default and the
/// plain `CURRENT_TIMESTAMP` form, so databases created by older builds still load.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| Error::InvalidTimestamp(format!("{raw}: {e}")))
}

/// A named grouping of QR scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Client-generated UUID
    pub id: String,
    /// Human-readable label, not unique
    pub name: String,
    /// Set by the store on insert (UTC)
    pub created_at: NaiveDateTime,
}

/// One decoded QR payload belonging to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedCode {
    /// Auto-incrementing row id
    pub id: i64,
    /// Owning session
    pub session_id: String,
    /// Raw decoded payload
    pub text: String,
    /// Secondary field, always `None` from the scanner
    pub url: Option<String>,
    /// Set by the store on insert (UTC)
    pub created_at: NaiveDateTime,
}

impl ScannedCode {
    /// Whether the payload itself looks like a web link
    pub fn is_link(&self) -> bool {
        let lower = self.text.trim_start().to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}

impl std::fmt::Display for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
