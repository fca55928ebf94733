// crates/librilabs-store-sqlite/src/migrations.rs
// ============================================================================
// Module: Schema Migrations
// Description: Ordered, reversible schema migrations for the store.
// Purpose: Define the translator schema and how to remove it.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Migrations are applied in ascending version order and reverted in
//! descending order. Each migration carries the SQL to apply it and the SQL
//! to revert it. Versions are contiguous and start at 1; version 0 means an
//! empty schema.

// ============================================================================
// SECTION: Types
// ============================================================================

/// A single reversible schema migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Monotonic schema version introduced by this migration.
    pub version: u32,
    /// Short migration label.
    pub name: &'static str,
    /// SQL applied on upgrade.
    pub up: &'static str,
    /// SQL applied on downgrade.
    pub down: &'static str,
}

// ============================================================================
// SECTION: Migrations
// ============================================================================

/// Initial schema: users, documents, translations, indexes, and triggers.
const INITIAL_SCHEMA_UP: &str = r"
CREATE TABLE users (
    id TEXT PRIMARY KEY NOT NULL,
    email TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    CONSTRAINT users_email_length CHECK (length(email) BETWEEN 1 AND 255)
);

CREATE TABLE documents (
    id TEXT PRIMARY KEY NOT NULL,
    content TEXT NOT NULL,
    file_name TEXT NOT NULL,
    file_size INTEGER NOT NULL,
    source_language TEXT NOT NULL,
    user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
    session_id TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    CONSTRAINT documents_file_size_check CHECK (file_size > 0 AND file_size <= 10485760),
    CONSTRAINT documents_user_or_session CHECK (user_id IS NOT NULL OR session_id IS NOT NULL),
    CONSTRAINT documents_file_name_length CHECK (length(file_name) <= 255),
    CONSTRAINT documents_source_language_length CHECK (length(source_language) <= 10),
    CONSTRAINT documents_session_id_length CHECK (session_id IS NULL OR length(session_id) <= 255)
);

CREATE TABLE translations (
    id TEXT PRIMARY KEY NOT NULL,
    document_id TEXT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
    target_language TEXT NOT NULL,
    translated_content TEXT,
    status TEXT NOT NULL DEFAULT 'pending',
    progress_percentage INTEGER NOT NULL DEFAULT 0,
    translation_state TEXT,
    user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
    session_id TEXT,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    CONSTRAINT translations_status_check
        CHECK (status IN ('pending', 'in_progress', 'completed', 'failed')),
    CONSTRAINT translations_progress_check
        CHECK (progress_percentage >= 0 AND progress_percentage <= 100),
    CONSTRAINT translations_user_or_session CHECK (user_id IS NOT NULL OR session_id IS NOT NULL),
    CONSTRAINT translations_target_language_length CHECK (length(target_language) <= 10),
    CONSTRAINT translations_session_id_length CHECK (session_id IS NULL OR length(session_id) <= 255),
    CONSTRAINT translations_state_json CHECK (translation_state IS NULL OR json_valid(translation_state)),
    CONSTRAINT unique_document_target_language UNIQUE (document_id, target_language)
);

CREATE INDEX idx_documents_user_id ON documents (user_id) WHERE user_id IS NOT NULL;
CREATE INDEX idx_documents_session_id ON documents (session_id) WHERE session_id IS NOT NULL;
CREATE INDEX idx_documents_created_at ON documents (created_at DESC);
CREATE INDEX idx_translations_document_id ON translations (document_id);
CREATE INDEX idx_translations_user_id ON translations (user_id) WHERE user_id IS NOT NULL;
CREATE INDEX idx_translations_session_id ON translations (session_id) WHERE session_id IS NOT NULL;
CREATE INDEX idx_translations_status ON translations (status);
CREATE INDEX idx_translations_created_at ON translations (created_at DESC);

CREATE TRIGGER update_users_updated_at AFTER UPDATE ON users
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE users SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = NEW.id;
END;

CREATE TRIGGER update_documents_updated_at AFTER UPDATE ON documents
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE documents SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = NEW.id;
END;

CREATE TRIGGER update_translations_updated_at AFTER UPDATE ON translations
FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE translations SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = NEW.id;
END;
";

/// Reverts the initial schema. Children are dropped before parents.
const INITIAL_SCHEMA_DOWN: &str = r"
DROP TRIGGER IF EXISTS update_users_updated_at;
DROP TRIGGER IF EXISTS update_translations_updated_at;
DROP TRIGGER IF EXISTS update_documents_updated_at;
DROP INDEX IF EXISTS idx_translations_created_at;
DROP INDEX IF EXISTS idx_translations_status;
DROP INDEX IF EXISTS idx_translations_session_id;
DROP INDEX IF EXISTS idx_translations_user_id;
DROP INDEX IF EXISTS idx_translations_document_id;
DROP INDEX IF EXISTS idx_documents_created_at;
DROP INDEX IF EXISTS idx_documents_session_id;
DROP INDEX IF EXISTS idx_documents_user_id;
DROP TABLE IF EXISTS translations;
DROP TABLE IF EXISTS documents;
DROP TABLE IF EXISTS users;
";

/// All known migrations in ascending version order.
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    up: INITIAL_SCHEMA_UP,
    down: INITIAL_SCHEMA_DOWN,
}];

/// Highest schema version this build understands.
pub const LATEST_VERSION: u32 = 1;

// ============================================================================
// SECTION: Tests
// ============================================================================
