// crates/librilabs-store-sqlite/tests/common/mod.rs
// =============================================================================
// Module: Store Test Helpers
// Description: Shared fixtures for SQLite store tests.
// Purpose: Open migrated scratch databases and build insert payloads.
// =============================================================================

#![allow(
    dead_code,
    clippy::expect_used,
    reason = "Test helpers are selectively used across suites."
)]

use librilabs_store_sqlite::NewDocument;
use librilabs_store_sqlite::SqliteStoreConfig;
use librilabs_store_sqlite::SqliteTranslationStore;
use rusqlite::Connection;
use tempfile::TempDir;
use uuid::Uuid;

/// File name of the scratch database inside each temp directory.
pub const DB_FILE: &str = "librilabs.sqlite";

/// Executes `sql` on a separate connection to the scratch database in `dir`.
pub fn execute_raw(dir: &TempDir, sql: &str) -> rusqlite::Result<usize> {
    let connection = Connection::open(dir.path().join(DB_FILE))?;
    connection.busy_timeout(std::time::Duration::from_secs(5))?;
    connection.execute(sql, [])
}

/// Returns true when `result` failed on a schema constraint.
pub fn is_constraint_violation(result: &rusqlite::Result<usize>) -> bool {
    matches!(
        result,
        Err(rusqlite::Error::SqliteFailure(error, _))
            if error.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Opens a store in a fresh temp directory without applying migrations.
pub fn open_empty() -> (TempDir, SqliteTranslationStore) {
    let dir = TempDir::new().expect("temp dir");
    let config = SqliteStoreConfig::new(dir.path().join(DB_FILE));
    let store = SqliteTranslationStore::open(&config).expect("open store");
    (dir, store)
}

/// Opens a store in a fresh temp directory with every migration applied.
pub fn open_migrated() -> (TempDir, SqliteTranslationStore) {
    let (dir, store) = open_empty();
    store.upgrade(None).expect("upgrade");
    (dir, store)
}

/// Document owned by an anonymous session.
pub fn session_document(session_id: &str) -> NewDocument {
    NewDocument {
        content: "Bonjour le monde".to_string(),
        file_name: "hello.txt".to_string(),
        file_size: 16,
        source_language: "fr".to_string(),
        user_id: None,
        session_id: Some(session_id.to_string()),
    }
}

/// Document owned by a registered user.
pub fn user_document(user_id: Uuid) -> NewDocument {
    NewDocument {
        user_id: Some(user_id),
        session_id: None,
        ..session_document("unused")
    }
}
