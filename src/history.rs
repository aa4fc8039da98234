//! Session history: every session with its codes, as the list view shows it

use serde::Serialize;
use crate::Result;
use crate::session::{ScannedCode, Session};
use crate::storage::SqliteStore;

#[derive(Debug, Clone, Serialize)]
pub struct SessionHistory {
    pub session: Session,
    pub codes: Vec<ScannedCode>,
}

/// Load all sessions, newest first, each with its codes newest first.
///
/// One query for the sessions, then one per session.
pub fn load_history(store: &SqliteStore) -> Result<Vec<SessionHistory>> {
    let sessions = store.get_sessions()?;
    let mut history = Vec::with_capacity(sessions.len());
    for session in sessions {
        let codes = store.get_qr_codes_by_session(&session.id)?;
        history.push(SessionHistory { session, codes });
    }
    Ok(history)
}
