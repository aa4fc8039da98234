//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - sessions(id, name, created_at)
//! - qr_codes(id, session_id, text, url, created_at), cascade-deleted with their session

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, DbStats};
