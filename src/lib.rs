//! # qrscan - Session-based QR scan log
//!
//! Records decoded QR payloads into named sessions and keeps them in a local
//! SQLite file.
//!
//! qrscan provides:
//! - `Session` / `ScannedCode` domain types
//! - SQLite-backed storage with cascade-deleting sessions
//! - A caller-side scanning flow (de-duplication, cooldown lock, orphan cleanup)
//! - Session history loading for list views

pub mod session;
pub mod storage;
pub mod scan;
pub mod history;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use session::{Session, ScannedCode};
pub use storage::SqliteStore;
pub use scan::{ScanFlow, FlowOutcome};
pub use history::{SessionHistory, load_history};

/// Result type alias for qrscan operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for qrscan operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Nothing scanned yet")]
    NothingScanned,
}
