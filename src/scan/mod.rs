//! Scanning flow - caller-side logic around the repository
//!
//! The storage layer only runs single statements. Everything a scanning
//! screen does on top of that lives here:
//! - `ScanBuffer`: de-duplicated payloads waiting to be saved
//! - `ScanLock`: debounce between camera detections
//! - `ScanFlow`: session lifecycle, including removal of sessions left empty

pub mod buffer;
pub mod flow;
pub mod lock;

pub use buffer::ScanBuffer;
pub use flow::{FlowOutcome, ScanFlow};
pub use lock::{DEFAULT_COOLDOWN, ScanLock};

use chrono::{DateTime, Local};

/// Prefix for sessions started without an explicit name
pub const DEFAULT_SESSION_PREFIX: &str = "Escaneo";

/// Name for a new session, e.g. `Escaneo 2024-01-01 09:30:00`
pub fn default_session_name(prefix: &str, now: DateTime<Local>) -> String {
    format!("{} {}", prefix, now.format("%Y-%m-%d %H:%M:%S"))
}
