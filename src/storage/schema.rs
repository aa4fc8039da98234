//! Database schema definitions

/// SQL to create the sessions table
pub const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now'))
)
"#;

/// SQL to create the qr_codes table
/// Rows go away with their session (requires `PRAGMA foreign_keys = ON`)
pub const CREATE_QR_CODES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS qr_codes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    text TEXT NOT NULL,
    url TEXT,
    created_at TIMESTAMP DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
    FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_qr_codes_session ON qr_codes(session_id)",
];

/// Connection settings applied before the schema
pub const PRAGMAS: &[&str] = &["PRAGMA foreign_keys = ON"];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_SESSIONS_TABLE, CREATE_QR_CODES_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
