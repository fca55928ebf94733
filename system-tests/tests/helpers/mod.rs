// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for Librilabs system-tests.
// Purpose: Provide the server harness and readiness probes.
// Dependencies: system-tests, librilabs-server, librilabs-verify
// ============================================================================

//! ## Overview
//! Shared helpers for Librilabs system-tests.
//! Invariants:
//! - Servers bind loopback ephemeral ports and are stopped by each test.
//! - Readiness is polled, never assumed after a fixed sleep.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod harness;
pub mod readiness;
