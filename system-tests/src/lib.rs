// system-tests/src/lib.rs
// ============================================================================
// Module: Librilabs System Tests Library
// Description: Shared configuration for system test scenarios.
// Purpose: Provide common settings for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. Suites either spawn a server on a loopback port or,
//! when a base URL is configured, probe an existing deployment.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
