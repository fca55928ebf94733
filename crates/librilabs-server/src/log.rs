// crates/librilabs-server/src/log.rs
// ============================================================================
// Module: Request Logging
// Description: Structured JSON-lines events for HTTP handling.
// Purpose: Emit request, server, and internal error events to a sink.
// Dependencies: librilabs-config, serde, serde_json
// ============================================================================

//! ## Overview
//! Events are serialized as one JSON object per line. Sinks are selected
//! from `server.request_log`: disabled logging uses the no-op sink, a
//! configured path appends to a file, and anything else goes to stderr.
//! Internal error events carry only a request id and a fixed kind label.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use librilabs_config::RequestLogConfig;
use serde::Serialize;

// ============================================================================
// SECTION: Events
// ============================================================================

/// One handled HTTP request.
#[derive(Debug, Clone, Serialize)]
pub struct HttpRequestEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier echoed in `x-request-id`.
    pub request_id: String,
    /// HTTP method.
    pub method: String,
    /// Request path without query.
    pub path: String,
    /// Response status code.
    pub status: u16,
    /// Handling latency in milliseconds.
    pub latency_ms: u128,
    /// Whether the request `Origin` is allowed; `None` without an `Origin`.
    pub origin_allowed: Option<bool>,
}

impl HttpRequestEvent {
    /// Builds a request event stamped with the current time.
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        status: u16,
        latency_ms: u128,
        origin_allowed: Option<bool>,
    ) -> Self {
        Self {
            event: "http_request",
            timestamp_ms: now_millis(),
            request_id: request_id.into(),
            method: method.into(),
            path: path.into(),
            status,
            latency_ms,
            origin_allowed,
        }
    }
}

/// Lifecycle event emitted by the server itself.
#[derive(Debug, Clone, Serialize)]
pub struct ServerEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Event kind label such as `startup` or `database_check`.
    pub kind: &'static str,
    /// Human-readable detail.
    pub message: String,
}

impl ServerEvent {
    /// Builds a server event stamped with the current time.
    #[must_use]
    pub fn new(kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            event: "server_event",
            timestamp_ms: now_millis(),
            kind,
            message: message.into(),
        }
    }
}

/// Failure converted into a 500 response.
#[derive(Debug, Clone, Serialize)]
pub struct InternalErrorEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier returned to the client.
    pub request_id: String,
    /// Fixed failure label.
    pub kind: &'static str,
}

impl InternalErrorEvent {
    /// Builds an internal error event stamped with the current time.
    #[must_use]
    pub fn new(request_id: impl Into<String>, kind: &'static str) -> Self {
        Self {
            event: "internal_error",
            timestamp_ms: now_millis(),
            request_id: request_id.into(),
            kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for structured server events.
pub trait RequestLogSink: Send + Sync {
    /// Records a handled request.
    fn record_request(&self, event: &HttpRequestEvent);

    /// Records a server lifecycle event.
    fn record_server(&self, event: &ServerEvent);

    /// Records an internal failure.
    fn record_internal_error(&self, event: &InternalErrorEvent);
}

/// Sink writing JSON lines to stderr.
pub struct StderrRequestLog;

impl StderrRequestLog {
    /// Writes one serialized event to stderr.
    fn emit(event: &impl Serialize) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(io::stderr(), "{payload}");
        }
    }
}

impl RequestLogSink for StderrRequestLog {
    fn record_request(&self, event: &HttpRequestEvent) {
        Self::emit(event);
    }

    fn record_server(&self, event: &ServerEvent) {
        Self::emit(event);
    }

    fn record_internal_error(&self, event: &InternalErrorEvent) {
        Self::emit(event);
    }
}

/// Sink appending JSON lines to a file.
pub struct FileRequestLog {
    /// Shared handle; writes are serialized.
    file: Mutex<File>,
}

impl FileRequestLog {
    /// Opens (or creates) the log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file or its parent directory cannot be
    /// created.
    pub fn new(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn emit(&self, event: &impl Serialize) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl RequestLogSink for FileRequestLog {
    fn record_request(&self, event: &HttpRequestEvent) {
        self.emit(event);
    }

    fn record_server(&self, event: &ServerEvent) {
        self.emit(event);
    }

    fn record_internal_error(&self, event: &InternalErrorEvent) {
        self.emit(event);
    }
}

/// Sink discarding every event.
pub struct NoopRequestLog;

impl RequestLogSink for NoopRequestLog {
    fn record_request(&self, _event: &HttpRequestEvent) {}

    fn record_server(&self, _event: &ServerEvent) {}

    fn record_internal_error(&self, _event: &InternalErrorEvent) {}
}

/// Selects the sink described by `config`.
///
/// # Errors
///
/// Returns [`io::Error`] when a configured log file cannot be opened.
pub fn request_log_sink(config: &RequestLogConfig) -> io::Result<Arc<dyn RequestLogSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopRequestLog));
    }
    match &config.path {
        Some(path) => Ok(Arc::new(FileRequestLog::new(Path::new(path))?)),
        None => Ok(Arc::new(StderrRequestLog)),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Milliseconds since the Unix epoch, zero if the clock is before it.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
