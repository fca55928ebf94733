// crates/librilabs-store-sqlite/src/model.rs
// ============================================================================
// Module: Store Model
// Description: Persisted translator entities and insert payloads.
// Purpose: Typed rows for users, documents, and translations.
// Dependencies: serde, serde_json, uuid
// ============================================================================

//! ## Overview
//! Row types mirror the tables created by the initial migration. Timestamps
//! are UTC RFC 3339 strings written by the database.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted document size in bytes (10 MiB).
pub const MAX_FILE_SIZE_BYTES: i64 = 10 * 1024 * 1024;

// ============================================================================
// SECTION: Status
// ============================================================================

/// Lifecycle state of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Queued, not started.
    #[default]
    Pending,
    /// Work underway.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl TranslationStatus {
    /// Returns the stored label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TranslationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown translation status: {other}")),
        }
    }
}

// ============================================================================
// SECTION: Rows
// ============================================================================

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Primary key.
    pub id: Uuid,
    /// Unique email address.
    pub email: String,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

/// Uploaded source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Primary key.
    pub id: Uuid,
    /// Full text content.
    pub content: String,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: i64,
    /// ISO 639-1 source language code.
    pub source_language: String,
    /// Owning user, if any.
    pub user_id: Option<Uuid>,
    /// Owning anonymous session, if any.
    pub session_id: Option<String>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

/// Translation of a document into one target language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    /// Primary key.
    pub id: Uuid,
    /// Source document.
    pub document_id: Uuid,
    /// Target language code.
    pub target_language: String,
    /// Translated text once available.
    pub translated_content: Option<String>,
    /// Lifecycle state.
    pub status: TranslationStatus,
    /// Progress from 0 to 100.
    pub progress_percentage: i64,
    /// Opaque resumable translation state.
    pub translation_state: Option<Value>,
    /// Owning user, if any.
    pub user_id: Option<Uuid>,
    /// Owning anonymous session, if any.
    pub session_id: Option<String>,
    /// Creation time.
    pub created_at: String,
    /// Last update time.
    pub updated_at: String,
}

// ============================================================================
// SECTION: Payloads
// ============================================================================

/// Insert payload for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Full text content.
    pub content: String,
    /// Original file name.
    pub file_name: String,
    /// Size in bytes.
    pub file_size: i64,
    /// ISO 639-1 source language code.
    pub source_language: String,
    /// Owning user.
    pub user_id: Option<Uuid>,
    /// Owning anonymous session.
    pub session_id: Option<String>,
}

/// Insert payload for a translation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTranslation {
    /// Source document.
    pub document_id: Uuid,
    /// Target language code.
    pub target_language: String,
    /// Owning user.
    pub user_id: Option<Uuid>,
    /// Owning anonymous session.
    pub session_id: Option<String>,
}

/// Progress update for a translation.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationUpdate {
    /// New lifecycle state.
    pub status: TranslationStatus,
    /// New progress value.
    pub progress_percentage: i64,
    /// Replacement translated text; `None` keeps the stored value.
    pub translated_content: Option<String>,
    /// Replacement resumable state; `None` keeps the stored value.
    pub translation_state: Option<Value>,
}
