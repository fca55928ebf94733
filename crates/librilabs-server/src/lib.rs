// crates/librilabs-server/src/lib.rs
// ============================================================================
// Module: Librilabs Server Library
// Description: HTTP server for the Librilabs Translator front page.
// Purpose: Expose the server, its errors, and request logging sinks.
// Dependencies: axum, librilabs-config, librilabs-page, tower-http
// ============================================================================

//! ## Overview
//! `librilabs-server` serves the rendered page shell over HTTP with a health
//! endpoint, CORS restricted to configured origins, request ids, and a
//! structured error envelope for every failure.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod log;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use log::FileRequestLog;
pub use log::HttpRequestEvent;
pub use log::InternalErrorEvent;
pub use log::NoopRequestLog;
pub use log::RequestLogSink;
pub use log::ServerEvent;
pub use log::StderrRequestLog;
pub use log::request_log_sink;
pub use server::INTERNAL_ERROR_CODE;
pub use server::INTERNAL_ERROR_MESSAGE;
pub use server::REQUEST_ID_HEADER;
pub use server::ServerError;
pub use server::TranslatorServer;
