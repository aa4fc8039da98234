//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OptionalExtension, params};
use crate::Result;
use crate::session::{self, ScannedCode, Session};
use super::schema;

const SESSION_COLUMNS: &str = "id, name, created_at";
const QR_CODE_COLUMNS: &str = "id, session_id, text, url, created_at";

/// SQLite-backed storage for sessions and their scanned codes
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.configure()?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.configure()?;
        store.initialize_schema()?;
        Ok(store)
    }

    fn configure(&self) -> Result<()> {
        for pragma in schema::PRAGMAS {
            self.conn.execute(pragma, [])?;
        }
        Ok(())
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn
                .execute(stmt, [])
                .inspect_err(|e| tracing::error!("Schema statement failed: {}", e))?;
        }
        tracing::info!("Tables 'sessions' and 'qr_codes' created or already present");
        Ok(())
    }

    // ========== Session Operations ==========

    /// Create a session and return its freshly generated id
    pub fn create_session(&self, name: &str) -> Result<String> {
        let session_id = uuid::Uuid::new_v4().to_string();
        self.conn
            .execute(
                "INSERT INTO sessions (id, name) VALUES (?1, ?2)",
                params![session_id, name],
            )
            .inspect_err(|e| tracing::error!("Error creating session: {}", e))?;
        tracing::info!("Session created with id {}", session_id);
        Ok(session_id)
    }

    /// All sessions, most recent first
    pub fn get_sessions(&self) -> Result<Vec<Session>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS} FROM sessions ORDER BY created_at DESC, rowid DESC"
        );
        let sessions = self
            .prepare_and_collect(&sql, [], Self::row_to_session)
            .inspect_err(|e| tracing::error!("Error fetching sessions: {}", e))?;
        Ok(sessions)
    }

    /// Get a session by id
    pub fn get_session(&self, session_id: &str) -> Result<Option<Session>> {
        let sql = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = ?1");
        self.conn
            .query_row(&sql, [session_id], Self::row_to_session)
            .optional()
            .inspect_err(|e| tracing::error!("Error fetching session {}: {}", session_id, e))
            .map_err(Into::into)
    }

    /// Rename a session. Returns the number of rows changed (0 for an unknown id).
    pub fn edit_session_name(&self, session_id: &str, name: &str) -> Result<usize> {
        let changed = self
            .conn
            .execute(
                "UPDATE sessions SET name = ?1 WHERE id = ?2",
                params![name, session_id],
            )
            .inspect_err(|e| tracing::error!("Error renaming session {}: {}", session_id, e))?;
        Ok(changed)
    }

    /// Delete a session; its codes follow through `ON DELETE CASCADE`
    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE id = ?1", [session_id])
            .inspect_err(|e| tracing::error!("Error deleting session {}: {}", session_id, e))?;
        tracing::info!("Session {} deleted together with its QR codes", session_id);
        Ok(())
    }

    /// Count all sessions
    pub fn count_sessions(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a Session
    fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<Session> {
        Ok(Session {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: Self::timestamp_at(row, 2)?,
        })
    }

    // ========== QR Code Operations ==========

    /// Save one decoded payload under a session
    pub fn save_qr_code(&self, session_id: &str, text: &str, url: Option<&str>) -> Result<()> {
        insert_qr_code(&self.conn, session_id, text, url)
            .inspect_err(|e| tracing::error!("Error saving QR code: {}", e))?;
        tracing::debug!("QR code saved in session {}", session_id);
        Ok(())
    }

    /// Save several payloads one statement at a time, in order.
    ///
    /// There is no transaction: when an insert fails, the rows written before
    /// it stay committed and the error is returned.
    pub fn save_qr_codes<S: AsRef<str>>(&self, session_id: &str, texts: &[S]) -> Result<usize> {
        for text in texts {
            self.save_qr_code(session_id, text.as_ref(), None)?;
        }
        Ok(texts.len())
    }

    /// Save several payloads inside a single transaction: all rows or none.
    pub fn save_qr_codes_atomic<S: AsRef<str>>(&self, session_id: &str, texts: &[S]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for text in texts {
            insert_qr_code(&tx, session_id, text.as_ref(), None)
                .inspect_err(|e| tracing::error!("Error saving QR code, rolling back: {}", e))?;
        }
        tx.commit()?;
        tracing::debug!("{} QR codes saved in session {}", texts.len(), session_id);
        Ok(texts.len())
    }

    /// Codes of one session, most recent first
    pub fn get_qr_codes_by_session(&self, session_id: &str) -> Result<Vec<ScannedCode>> {
        let sql = format!(
            "SELECT {QR_CODE_COLUMNS} FROM qr_codes WHERE session_id = ?1 ORDER BY created_at DESC, id DESC"
        );
        let codes = self
            .prepare_and_collect(&sql, [session_id], Self::row_to_qr_code)
            .inspect_err(|e| tracing::error!("Error fetching QR codes for session {}: {}", session_id, e))?;
        Ok(codes)
    }

    /// Count codes recorded for a session
    pub fn count_qr_codes(&self, session_id: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM qr_codes WHERE session_id = ?1",
            [session_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Count all codes
    pub fn count_all_qr_codes(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM qr_codes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Helper to convert a row to a ScannedCode
    fn row_to_qr_code(row: &rusqlite::Row) -> rusqlite::Result<ScannedCode> {
        Ok(ScannedCode {
            id: row.get(0)?,
            session_id: row.get(1)?,
            text: row.get(2)?,
            url: row.get(3)?,
            created_at: Self::timestamp_at(row, 4)?,
        })
    }

    // ========== Helpers ==========

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            sessions: self.count_sessions()?,
            qr_codes: self.count_all_qr_codes()?,
        })
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    fn prepare_and_collect<T, P, F>(&self, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
    where
        P: rusqlite::Params,
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, f)?;
        rows.collect()
    }

    fn timestamp_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<chrono::NaiveDateTime> {
        let raw: String = row.get(idx)?;
        session::parse_timestamp(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    }
}

fn insert_qr_code(conn: &Connection, session_id: &str, text: &str, url: Option<&str>) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO qr_codes (session_id, text, url) VALUES (?1, ?2, ?3)",
        params![session_id, text, url],
    )
}

/// Database statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub sessions: usize,
    pub qr_codes: usize,
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Sessions: {}", self.sessions)?;
        write!(f, "  QR codes: {}", self.qr_codes)
    }
}
