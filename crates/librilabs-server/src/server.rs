// crates/librilabs-server/src/server.rs
// ============================================================================
// Module: Translator Server
// Description: HTTP server for the translator front page.
// Purpose: Serve the page shell, health, and structured error envelopes.
// Dependencies: axum, librilabs-config, librilabs-page, librilabs-store-sqlite,
//               tower-http
// ============================================================================

//! ## Overview
//! The server renders the home document at `/` and reports liveness at
//! `/health`. Every response carries an `x-request-id` header; error
//! responses carry the same id inside a JSON envelope. Unknown paths and
//! unsupported methods map to 404 and 405 envelopes, and a panicking handler
//! maps to a 500 envelope whose message never includes panic text.
//!
//! When a database is configured, startup opens and pings the store with
//! exponential backoff and refuses to serve if every attempt fails.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use axum::Extension;
use axum::Json;
use axum::Router;
use axum::extract::Request;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::ORIGIN;
use axum::middleware::Next;
use axum::middleware::from_fn_with_state;
use axum::response::Html;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use librilabs_config::DatabaseConfig;
use librilabs_config::TranslatorConfig;
use librilabs_page::render_home_document;
use librilabs_store_sqlite::MigrationStatus;
use librilabs_store_sqlite::SqliteStoreError;
use librilabs_store_sqlite::SqliteTranslationStore;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::log::HttpRequestEvent;
use crate::log::InternalErrorEvent;
use crate::log::RequestLogSink;
use crate::log::ServerEvent;
use crate::log::request_log_sink;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the per-request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Error code used for unhandled failures.
pub const INTERNAL_ERROR_CODE: &str = "INTERNAL_ERROR";

/// Client-facing message for unhandled failures.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal error occurred";

/// Message used when a status has no canonical reason phrase.
const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// Timestamp written when the clock cannot be formatted.
const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Translator HTTP server.
pub struct TranslatorServer {
    /// Validated configuration.
    config: TranslatorConfig,
    /// Structured event sink.
    log: Arc<dyn RequestLogSink>,
}

impl TranslatorServer {
    /// Builds a server from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the request
    /// log cannot be opened.
    pub fn from_config(config: TranslatorConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let log = request_log_sink(&config.server.request_log)
            .map_err(|err| ServerError::Init(format!("request log unavailable: {err}")))?;
        Ok(Self {
            config,
            log,
        })
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_log_sink(mut self, log: Arc<dyn RequestLogSink>) -> Self {
        self.log = log;
        self
    }

    /// Returns the configuration the server was built from.
    #[must_use]
    pub const fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Builds the application router without binding a socket.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Config`] when an allowed origin is not a valid
    /// header value.
    pub fn router(&self) -> Result<Router, ServerError> {
        let state = Arc::new(AppState {
            log: Arc::clone(&self.log),
            allowed_origins: self.config.server.allowed_origins.clone(),
        });
        build_router(state, app_routes())
    }

    /// Binds the configured address and serves until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding, the database check, or serving
    /// fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr = self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serves on an already bound listener until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when the database check or serving fails.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        for warning in self.config.warnings() {
            self.log.record_server(&ServerEvent::new("config_warning", warning));
        }
        if let Some(database) = &self.config.database {
            check_database(database, self.log.as_ref()).await?;
        }
        let app = self.router()?;
        let addr = listener
            .local_addr()
            .map_err(|err| ServerError::Transport(format!("listener address unavailable: {err}")))?;
        self.log.record_server(&ServerEvent::new(
            "startup",
            format!("listening on http://{addr} ({})", self.config.server.environment),
        ));
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))?;
        self.log.record_server(&ServerEvent::new("shutdown", "server stopped"));
        Ok(())
    }
}

/// Resolves when the process receives Ctrl-C.
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Shared, immutable handler state.
struct AppState {
    /// Structured event sink.
    log: Arc<dyn RequestLogSink>,
    /// Origins that receive CORS headers.
    allowed_origins: Vec<String>,
}

impl AppState {
    /// Returns whether `origin` is one of the allowed origins.
    fn origin_allowed(&self, origin: &HeaderValue) -> bool {
        self.allowed_origins.iter().any(|allowed| allowed.as_bytes() == origin.as_bytes())
    }
}

/// Identifier assigned to each request by the middleware.
#[derive(Debug, Clone)]
struct RequestId(String);

/// Application routes before fallbacks and layers.
fn app_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(home)).route("/health", get(health))
}

/// Wraps `routes` with fallbacks, panic capture, CORS, and request ids.
fn build_router(state: Arc<AppState>, routes: Router<Arc<AppState>>) -> Result<Router, ServerError> {
    let cors = cors_layer(&state.allowed_origins)?;
    let panic_log = Arc::clone(&state.log);
    Ok(routes
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(move |_: Box<dyn Any + Send + 'static>| {
            panic_response(panic_log.as_ref())
        }))
        .layer(cors)
        .layer(from_fn_with_state(Arc::clone(&state), assign_request_id))
        .with_state(state))
}

/// Builds the CORS layer for the configured origins.
fn cors_layer(origins: &[String]) -> Result<CorsLayer, ServerError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|_| ServerError::Config(format!("invalid allowed origin: {origin}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Assigns a request id, echoes it in `x-request-id`, and logs the request.
///
/// A response that already carries an id (the panic handler mints its own)
/// keeps it, and that id is the one logged.
async fn assign_request_id(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = new_request_id();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let origin_allowed = request.headers().get(ORIGIN).map(|origin| state.origin_allowed(origin));
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;
    let logged_id = match response.headers().get(REQUEST_ID_HEADER) {
        Some(existing) => existing.to_str().map_or_else(|_| request_id.clone(), str::to_string),
        None => {
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }
            request_id
        }
    };
    state.log.record_request(&HttpRequestEvent::new(
        logged_id,
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
        origin_allowed,
    ));
    response
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Health response body.
#[derive(Debug, Serialize)]
struct HealthResponse {
    /// Always `healthy` while the process serves requests.
    status: &'static str,
    /// RFC 3339 UTC timestamp.
    timestamp: String,
}

/// Renders the home document.
async fn home() -> Html<String> {
    Html(render_home_document())
}

/// Reports liveness.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: rfc3339_now(),
    })
}

/// Fallback for unknown paths.
async fn not_found(Extension(request_id): Extension<RequestId>) -> Response {
    status_error(StatusCode::NOT_FOUND, &request_id.0)
}

/// Fallback for known paths with an unsupported method.
async fn method_not_allowed(Extension(request_id): Extension<RequestId>) -> Response {
    status_error(StatusCode::METHOD_NOT_ALLOWED, &request_id.0)
}

/// Converts a caught panic into a 500 envelope. The panic payload is never
/// inspected.
fn panic_response(log: &dyn RequestLogSink) -> Response {
    let request_id = new_request_id();
    log.record_internal_error(&InternalErrorEvent::new(request_id.clone(), "panic"));
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_CODE.to_string(),
        INTERNAL_ERROR_MESSAGE,
        &request_id,
    )
}

// ============================================================================
// SECTION: Error Envelope
// ============================================================================

/// Structured error response.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    /// Error details.
    error: ErrorBody,
}

/// Error details carried by the envelope.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// `HTTP_<status>` or `INTERNAL_ERROR`.
    code: String,
    /// Client-safe message.
    message: String,
    /// RFC 3339 UTC timestamp.
    timestamp: String,
    /// Request identifier, also sent in `x-request-id`.
    request_id: String,
}

/// Envelope for a plain HTTP status using its reason phrase.
fn status_error(status: StatusCode, request_id: &str) -> Response {
    error_response(
        status,
        format!("HTTP_{}", status.as_u16()),
        status.canonical_reason().unwrap_or(GENERIC_ERROR_MESSAGE),
        request_id,
    )
}

/// Builds an envelope response and stamps the request id header.
fn error_response(status: StatusCode, code: String, message: &str, request_id: &str) -> Response {
    let envelope = ErrorEnvelope {
        error: ErrorBody {
            code,
            message: message.to_string(),
            timestamp: rfc3339_now(),
            request_id: request_id.to_string(),
        },
    };
    let mut response = (status, Json(envelope)).into_response();
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}

// ============================================================================
// SECTION: Database Check
// ============================================================================

/// Opens and pings the configured store, retrying with exponential backoff.
///
/// # Errors
///
/// Returns [`ServerError::Init`] once every attempt has failed.
async fn check_database(config: &DatabaseConfig, log: &dyn RequestLogSink) -> Result<(), ServerError> {
    let attempts = config.connect_retries.max(1);
    let mut delay = Duration::from_millis(config.initial_retry_delay_ms);
    let mut attempt = 1;
    loop {
        let store_config = config.store_config();
        let outcome = tokio::task::spawn_blocking(move || {
            let store = SqliteTranslationStore::open(&store_config)?;
            store.ping()?;
            store.status()
        })
        .await
        .map_err(|err| ServerError::Init(format!("database check task failed: {err}")))?;
        match outcome {
            Ok(status) => {
                log.record_server(&ServerEvent::new(
                    "database_check",
                    format!("database reachable after {attempt} attempt(s)"),
                ));
                report_pending_migrations(&status, log);
                return Ok(());
            }
            Err(err) if attempt < attempts => {
                log.record_server(&ServerEvent::new(
                    "database_check",
                    format!(
                        "attempt {attempt}/{attempts} failed: {err}; retrying in {}ms",
                        delay.as_millis()
                    ),
                ));
                tokio::time::sleep(delay).await;
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(err) => return Err(database_unavailable(attempts, &err, log)),
        }
    }
}

/// Logs the final database failure and builds the startup error.
fn database_unavailable(attempts: u32, err: &SqliteStoreError, log: &dyn RequestLogSink) -> ServerError {
    let message = format!("database unavailable after {attempts} attempt(s): {err}");
    log.record_server(&ServerEvent::new("database_check", message.clone()));
    ServerError::Init(message)
}

/// Warns when the store schema is behind this build.
fn report_pending_migrations(status: &MigrationStatus, log: &dyn RequestLogSink) {
    if status.pending.is_empty() {
        return;
    }
    log.record_server(&ServerEvent::new(
        "database_migrations",
        format!(
            "schema at version {} of {}; run `librilabs db upgrade`",
            status.current_version, status.latest_version
        ),
    ));
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Mints a fresh request identifier.
fn new_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current UTC time as RFC 3339.
fn rfc3339_now() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_else(|_| EPOCH_TIMESTAMP.to_string())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Translator server errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
