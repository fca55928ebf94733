// crates/librilabs-verify/src/lib.rs
// ============================================================================
// Module: Librilabs Verify
// Description: Verification harness for rendered pages.
// Purpose: Assert observable properties of rendered documents and components.
// Dependencies: librilabs-page, scraper, reqwest, tokio
// ============================================================================

//! ## Overview
//! The verification harness checks rendered output in two ways:
//! - served-instance checks fetch the root route of a running server through
//!   [`ServedInstanceProbe`] and evaluate [`served_instance_checks`];
//! - isolated-component checks render one component in memory and evaluate
//!   [`isolated_component_check`].
//!
//! Every check produces a [`CheckResult`]. Mismatches are data, reported with
//! the expected and actual values, and never stop other checks from running.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod checks;
pub mod document;
pub mod probe;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use checks::CheckOutcome;
pub use checks::CheckReport;
pub use checks::CheckResult;
pub use checks::ServedExpectations;
pub use checks::isolated_component_check;
pub use checks::served_instance_checks;
pub use document::RenderedDocument;
pub use probe::ProbeError;
pub use probe::ServedInstanceProbe;
