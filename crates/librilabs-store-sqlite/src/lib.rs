// crates/librilabs-store-sqlite/src/lib.rs
// ============================================================================
// Module: Librilabs SQLite Store
// Description: Durable storage for translator users, documents, translations.
// Purpose: Persist translator entities with database-enforced constraints.
// Dependencies: rusqlite, serde_json, uuid
// ============================================================================

//! ## Overview
//! This crate provides [`SqliteTranslationStore`], a `SQLite`-backed store for
//! the translator's persisted entities. The schema is managed by ordered,
//! reversible migrations tracked in a `schema_migrations` table. Every
//! documented constraint (ranges, ownership, uniqueness, cascades) is
//! enforced by the database itself, so rows written outside this crate are
//! rejected as well.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod migrations;
pub mod model;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use migrations::LATEST_VERSION;
pub use migrations::MIGRATIONS;
pub use migrations::Migration;
pub use model::Document;
pub use model::MAX_FILE_SIZE_BYTES;
pub use model::NewDocument;
pub use model::NewTranslation;
pub use model::Translation;
pub use model::TranslationStatus;
pub use model::TranslationUpdate;
pub use model::User;
pub use store::AppliedMigration;
pub use store::MigrationStatus;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTranslationStore;
