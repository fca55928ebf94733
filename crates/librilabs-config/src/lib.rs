// crates/librilabs-config/src/lib.rs
// ============================================================================
// Module: Librilabs Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for librilabs.toml semantics.
// Dependencies: librilabs-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! `librilabs-config` loads the translator configuration from TOML, applies
//! environment overrides, and validates the result before any server
//! component sees it. Invalid configuration fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
