// crates/librilabs-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Translation Store
// Description: SQLite-backed persistence for translator entities.
// Purpose: Open, migrate, and query the translator database.
// Dependencies: rusqlite, serde, serde_json, thiserror, uuid
// ============================================================================

//! ## Overview
//! [`SqliteTranslationStore`] owns one `SQLite` connection guarded by a mutex.
//! Opening the store applies durability pragmas and creates the migration
//! ledger but never changes the application schema; schema changes go
//! through [`SqliteTranslationStore::upgrade`] and
//! [`SqliteTranslationStore::downgrade`]. A database stamped with a version
//! newer than this build understands is refused with
//! [`SqliteStoreError::VersionMismatch`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::ErrorCode;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use rusqlite::types::Type;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::migrations::LATEST_VERSION;
use crate::migrations::MIGRATIONS;
use crate::model::Document;
use crate::model::NewDocument;
use crate::model::NewTranslation;
use crate::model::Translation;
use crate::model::TranslationStatus;
use crate::model::TranslationUpdate;
use crate::model::User;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Column list for user selects.
const USER_COLUMNS: &str = "id, email, created_at, updated_at";
/// Column list for document selects.
const DOCUMENT_COLUMNS: &str = "id, content, file_name, file_size, source_language, user_id, \
                                session_id, created_at, updated_at";
/// Column list for translation selects.
const TRANSLATION_COLUMNS: &str = "id, document_id, target_language, translated_content, status, \
                                   progress_percentage, translation_state, user_id, session_id, \
                                   created_at, updated_at";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode.
    #[default]
    Wal,
    /// Delete journal mode.
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode.
    #[default]
    Full,
    /// Normal synchronous mode.
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` translation store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Builds a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// A database constraint rejected the write.
    #[error("sqlite store constraint violation: {0}")]
    Constraint(String),
    /// Referenced row does not exist.
    #[error("sqlite store record not found: {0}")]
    NotFound(String),
    /// Stored data could not be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid request or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Migration Status
// ============================================================================

/// Migration recorded in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// Schema version.
    pub version: u32,
    /// Migration label.
    pub name: String,
    /// Time the migration was applied.
    pub applied_at: String,
}

/// Snapshot of the migration ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Highest applied version, 0 for an empty schema.
    pub current_version: u32,
    /// Highest version this build understands.
    pub latest_version: u32,
    /// Applied migrations in ascending order.
    pub applied: Vec<AppliedMigration>,
    /// Versions not yet applied, ascending.
    pub pending: Vec<u32>,
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed translator store.
#[derive(Clone)]
pub struct SqliteTranslationStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTranslationStore {
    /// Opens the store and prepares the migration ledger.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or was
    /// written by a newer schema.
    pub fn open(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let connection = open_connection(config)?;
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version INTEGER PRIMARY KEY NOT NULL,
                    name TEXT NOT NULL,
                    applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                );",
            )
            .map_err(db_error)?;
        let current = read_current_version(&connection)?;
        if current > LATEST_VERSION {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "database schema version {current} is newer than supported version \
                 {LATEST_VERSION}"
            )));
        }
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Acquires the connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))
    }

    /// Runs a trivial query to confirm the connection is usable.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Db`] when the query fails.
    pub fn ping(&self) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        let value: i64 = guard.query_row("SELECT 1", [], |row| row.get(0)).map_err(db_error)?;
        drop(guard);
        if value == 1 {
            Ok(())
        } else {
            Err(SqliteStoreError::Db(format!("unexpected ping result {value}")))
        }
    }

    // ------------------------------------------------------------------------
    // Migrations
    // ------------------------------------------------------------------------

    /// Returns the highest applied schema version.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the ledger cannot be read.
    pub fn current_version(&self) -> Result<u32, SqliteStoreError> {
        let guard = self.lock()?;
        read_current_version(&guard)
    }

    /// Returns the applied and pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the ledger cannot be read.
    pub fn status(&self) -> Result<MigrationStatus, SqliteStoreError> {
        let guard = self.lock()?;
        let mut statement = guard
            .prepare("SELECT version, name, applied_at FROM schema_migrations ORDER BY version")
            .map_err(db_error)?;
        let applied = statement
            .query_map([], |row| {
                Ok(AppliedMigration {
                    version: row.get(0)?,
                    name: row.get(1)?,
                    applied_at: row.get(2)?,
                })
            })
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;
        drop(statement);
        drop(guard);
        let current_version = applied.last().map_or(0, |migration| migration.version);
        let pending = MIGRATIONS
            .iter()
            .map(|migration| migration.version)
            .filter(|version| *version > current_version)
            .collect();
        Ok(MigrationStatus {
            current_version,
            latest_version: LATEST_VERSION,
            applied,
            pending,
        })
    }

    /// Applies pending migrations up to `target` (latest when `None`).
    /// Returns the versions applied, ascending.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] for unknown or backward targets
    /// and [`SqliteStoreError::Db`] when a migration fails. A failed
    /// migration leaves earlier ones applied.
    pub fn upgrade(&self, target: Option<u32>) -> Result<Vec<u32>, SqliteStoreError> {
        let target = target.unwrap_or(LATEST_VERSION);
        if target > LATEST_VERSION {
            return Err(SqliteStoreError::Invalid(format!(
                "unknown target version {target} (latest is {LATEST_VERSION})"
            )));
        }
        let mut guard = self.lock()?;
        let current = read_current_version(&guard)?;
        if target < current {
            return Err(SqliteStoreError::Invalid(format!(
                "target version {target} is below current version {current}"
            )));
        }
        let mut applied = Vec::new();
        for migration in
            MIGRATIONS.iter().filter(|migration| migration.version > current && migration.version <= target)
        {
            let tx = guard.transaction().map_err(db_error)?;
            tx.execute_batch(migration.up).map_err(db_error)?;
            tx.execute(
                "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )
            .map_err(db_error)?;
            tx.commit().map_err(db_error)?;
            applied.push(migration.version);
        }
        drop(guard);
        Ok(applied)
    }

    /// Reverts applied migrations down to `target`. Returns the versions
    /// reverted, descending.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Invalid`] for forward targets and
    /// [`SqliteStoreError::Db`] when a revert fails.
    pub fn downgrade(&self, target: u32) -> Result<Vec<u32>, SqliteStoreError> {
        let mut guard = self.lock()?;
        let current = read_current_version(&guard)?;
        if target > current {
            return Err(SqliteStoreError::Invalid(format!(
                "target version {target} is above current version {current}"
            )));
        }
        let mut reverted = Vec::new();
        for migration in MIGRATIONS
            .iter()
            .rev()
            .filter(|migration| migration.version > target && migration.version <= current)
        {
            let tx = guard.transaction().map_err(db_error)?;
            tx.execute_batch(migration.down).map_err(db_error)?;
            tx.execute("DELETE FROM schema_migrations WHERE version = ?1", params![migration.version])
                .map_err(db_error)?;
            tx.commit().map_err(db_error)?;
            reverted.push(migration.version);
        }
        drop(guard);
        Ok(reverted)
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    /// Inserts a user with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Constraint`] for duplicate or out-of-range
    /// emails.
    pub fn create_user(&self, email: &str) -> Result<User, SqliteStoreError> {
        let id = Uuid::new_v4();
        let guard = self.lock()?;
        guard
            .execute("INSERT INTO users (id, email) VALUES (?1, ?2)", params![id.to_string(), email])
            .map_err(db_error)?;
        select_user(&guard, id)?.ok_or_else(|| SqliteStoreError::NotFound(format!("user {id}")))
    }

    /// Loads a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn user(&self, id: Uuid) -> Result<Option<User>, SqliteStoreError> {
        let guard = self.lock()?;
        select_user(&guard, id)
    }

    /// Deletes a user and, through cascades, everything it owns.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::NotFound`] when no user matches.
    pub fn delete_user(&self, id: Uuid) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        let changed =
            guard.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()]).map_err(db_error)?;
        drop(guard);
        if changed == 0 {
            return Err(SqliteStoreError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    /// Inserts a document with a fresh identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Constraint`] when the size, ownership, or
    /// length constraints reject the row.
    pub fn create_document(&self, document: &NewDocument) -> Result<Document, SqliteStoreError> {
        let id = Uuid::new_v4();
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO documents (id, content, file_name, file_size, source_language, \
                 user_id, session_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    id.to_string(),
                    document.content,
                    document.file_name,
                    document.file_size,
                    document.source_language,
                    document.user_id.map(|user_id| user_id.to_string()),
                    document.session_id,
                ],
            )
            .map_err(db_error)?;
        select_document(&guard, id)?
            .ok_or_else(|| SqliteStoreError::NotFound(format!("document {id}")))
    }

    /// Loads a document by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn document(&self, id: Uuid) -> Result<Option<Document>, SqliteStoreError> {
        let guard = self.lock()?;
        select_document(&guard, id)
    }

    /// Loads a document together with its translations.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when a query fails.
    pub fn document_with_translations(
        &self,
        id: Uuid,
    ) -> Result<Option<(Document, Vec<Translation>)>, SqliteStoreError> {
        let guard = self.lock()?;
        let Some(document) = select_document(&guard, id)? else {
            return Ok(None);
        };
        let translations = select_translations_for_document(&guard, id)?;
        drop(guard);
        Ok(Some((document, translations)))
    }

    /// Deletes a document and its translations.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::NotFound`] when no document matches.
    pub fn delete_document(&self, id: Uuid) -> Result<(), SqliteStoreError> {
        let guard = self.lock()?;
        let changed = guard
            .execute("DELETE FROM documents WHERE id = ?1", params![id.to_string()])
            .map_err(db_error)?;
        drop(guard);
        if changed == 0 {
            return Err(SqliteStoreError::NotFound(format!("document {id}")));
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Translations
    // ------------------------------------------------------------------------

    /// Inserts a pending translation with zero progress.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::Constraint`] for a duplicate target
    /// language, a missing document, or missing ownership.
    pub fn create_translation(
        &self,
        translation: &NewTranslation,
    ) -> Result<Translation, SqliteStoreError> {
        let id = Uuid::new_v4();
        let guard = self.lock()?;
        guard
            .execute(
                "INSERT INTO translations (id, document_id, target_language, user_id, session_id) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    translation.document_id.to_string(),
                    translation.target_language,
                    translation.user_id.map(|user_id| user_id.to_string()),
                    translation.session_id,
                ],
            )
            .map_err(db_error)?;
        select_translation(&guard, id)?
            .ok_or_else(|| SqliteStoreError::NotFound(format!("translation {id}")))
    }

    /// Loads a translation by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the query fails.
    pub fn translation(&self, id: Uuid) -> Result<Option<Translation>, SqliteStoreError> {
        let guard = self.lock()?;
        select_translation(&guard, id)
    }

    /// Records progress on a translation.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError::NotFound`] when no translation matches and
    /// [`SqliteStoreError::Constraint`] when progress is out of range.
    pub fn update_translation(
        &self,
        id: Uuid,
        update: &TranslationUpdate,
    ) -> Result<Translation, SqliteStoreError> {
        let state = update
            .translation_state
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;
        let guard = self.lock()?;
        let changed = guard
            .execute(
                "UPDATE translations SET status = ?1, progress_percentage = ?2, \
                 translated_content = COALESCE(?3, translated_content), translation_state = \
                 COALESCE(?4, translation_state) WHERE id = ?5",
                params![
                    update.status.as_str(),
                    update.progress_percentage,
                    update.translated_content,
                    state,
                    id.to_string(),
                ],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Err(SqliteStoreError::NotFound(format!("translation {id}")));
        }
        select_translation(&guard, id)?
            .ok_or_else(|| SqliteStoreError::NotFound(format!("translation {id}")))
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Reads a UUID stored as text.
fn uuid_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Uuid> {
    let text: String = row.get(index)?;
    Uuid::parse_str(&text)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

/// Reads an optional UUID stored as text.
fn optional_uuid_column(row: &Row<'_>, index: usize) -> rusqlite::Result<Option<Uuid>> {
    let text: Option<String> = row.get(index)?;
    text.map(|value| {
        Uuid::parse_str(&value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
        })
    })
    .transpose()
}

/// Maps a user row.
fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        email: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

/// Maps a document row.
fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: uuid_column(row, 0)?,
        content: row.get(1)?,
        file_name: row.get(2)?,
        file_size: row.get(3)?,
        source_language: row.get(4)?,
        user_id: optional_uuid_column(row, 5)?,
        session_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

/// Maps a translation row.
fn translation_from_row(row: &Row<'_>) -> rusqlite::Result<Translation> {
    let status: String = row.get(4)?;
    let status = status.parse::<TranslationStatus>().map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::from(err))
    })?;
    let state: Option<String> = row.get(6)?;
    let translation_state = state
        .map(|text| serde_json::from_str::<Value>(&text))
        .transpose()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;
    Ok(Translation {
        id: uuid_column(row, 0)?,
        document_id: uuid_column(row, 1)?,
        target_language: row.get(2)?,
        translated_content: row.get(3)?,
        status,
        progress_percentage: row.get(5)?,
        translation_state,
        user_id: optional_uuid_column(row, 7)?,
        session_id: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Selects one user.
fn select_user(connection: &Connection, id: Uuid) -> Result<Option<User>, SqliteStoreError> {
    connection
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.to_string()],
            user_from_row,
        )
        .optional()
        .map_err(db_error)
}

/// Selects one document.
fn select_document(
    connection: &Connection,
    id: Uuid,
) -> Result<Option<Document>, SqliteStoreError> {
    connection
        .query_row(
            &format!("SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"),
            params![id.to_string()],
            document_from_row,
        )
        .optional()
        .map_err(db_error)
}

/// Selects one translation.
fn select_translation(
    connection: &Connection,
    id: Uuid,
) -> Result<Option<Translation>, SqliteStoreError> {
    connection
        .query_row(
            &format!("SELECT {TRANSLATION_COLUMNS} FROM translations WHERE id = ?1"),
            params![id.to_string()],
            translation_from_row,
        )
        .optional()
        .map_err(db_error)
}

/// Selects every translation of a document ordered by target language.
fn select_translations_for_document(
    connection: &Connection,
    document_id: Uuid,
) -> Result<Vec<Translation>, SqliteStoreError> {
    let mut statement = connection
        .prepare(&format!(
            "SELECT {TRANSLATION_COLUMNS} FROM translations WHERE document_id = ?1 ORDER BY \
             target_language"
        ))
        .map_err(db_error)?;
    statement
        .query_map(params![document_id.to_string()], translation_from_row)
        .map_err(db_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(db_error)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps engine errors onto store errors.
fn db_error(err: rusqlite::Error) -> SqliteStoreError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            SqliteStoreError::Constraint(message.clone().unwrap_or_else(|| err.to_string()))
        }
        rusqlite::Error::FromSqlConversionFailure(..) => SqliteStoreError::Corrupt(err.to_string()),
        _ => SqliteStoreError::Db(err.to_string()),
    }
}

/// Reads the highest applied migration version.
fn read_current_version(connection: &Connection) -> Result<u32, SqliteStoreError> {
    connection
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_migrations", [], |row| row.get(0))
        .map_err(db_error)
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.trim().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must be non-empty".to_string()));
    }
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with durability pragmas.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags).map_err(db_error)?;
    connection.execute_batch("PRAGMA foreign_keys = ON;").map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(db_error)?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(db_error)?;
    connection.busy_timeout(Duration::from_millis(config.busy_timeout_ms)).map_err(db_error)?;
    Ok(connection)
}
