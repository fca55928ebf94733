// crates/librilabs-verify/src/probe.rs
// ============================================================================
// Module: Served Instance Probe
// Description: HTTP probe that loads the root route of a running server.
// Purpose: Wait for a served instance and run the served-instance checks.
// Dependencies: reqwest, tokio, url
// ============================================================================

//! ## Overview
//! [`ServedInstanceProbe`] polls the root route until the page loads or the
//! readiness timeout expires. Connection failures are retried; a non-success
//! HTTP status is returned immediately since the server answered.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use thiserror::Error;
use tokio::time::sleep;
use url::Url;

use crate::checks::CheckReport;
use crate::checks::ServedExpectations;
use crate::checks::served_instance_checks;
use crate::document::RenderedDocument;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default delay between readiness attempts.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Per-request timeout applied by the HTTP client.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while probing a served instance.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Base URL could not be parsed.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// HTTP transport failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// Server never became ready.
    #[error("server not ready after {attempts} attempts: {last_error}")]
    Timeout {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last transport error observed.
        last_error: String,
    },
    /// Root route answered with a non-success status.
    #[error("root route returned http status {0}")]
    Status(u16),
}

// ============================================================================
// SECTION: Probe
// ============================================================================

/// Loads the root route of a served instance.
#[derive(Debug, Clone)]
pub struct ServedInstanceProbe {
    /// Shared HTTP client.
    client: Client,
    /// Absolute URL of the root route.
    root_url: Url,
    /// Maximum time to wait for the page to load.
    ready_timeout: Duration,
    /// Delay between attempts.
    poll_interval: Duration,
}

impl ServedInstanceProbe {
    /// Builds a probe for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the URL is invalid or the client cannot be
    /// built.
    pub fn new(base_url: &str, ready_timeout: Duration) -> Result<Self, ProbeError> {
        let base = Url::parse(base_url).map_err(|err| ProbeError::InvalidUrl(err.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ProbeError::InvalidUrl(format!("unsupported scheme {}", base.scheme())));
        }
        let root_url = base.join("/").map_err(|err| ProbeError::InvalidUrl(err.to_string()))?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            root_url,
            ready_timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Overrides the delay between readiness attempts.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns the root route URL.
    #[must_use]
    pub const fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Fetches the root route once.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Transport`] on connection failure and
    /// [`ProbeError::Status`] on a non-success status.
    pub async fn fetch_root(&self) -> Result<String, ProbeError> {
        let response = self
            .client
            .get(self.root_url.clone())
            .send()
            .await
            .map_err(|err| ProbeError::Transport(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status.as_u16()));
        }
        response.text().await.map_err(|err| ProbeError::Transport(err.to_string()))
    }

    /// Polls the root route until it loads or the readiness timeout expires.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] when the server never answers and
    /// [`ProbeError::Status`] when it answers with a failure status.
    pub async fn wait_until_loaded(&self) -> Result<String, ProbeError> {
        let start = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            match self.fetch_root().await {
                Ok(body) => return Ok(body),
                Err(ProbeError::Transport(last_error)) => {
                    if start.elapsed() >= self.ready_timeout {
                        return Err(ProbeError::Timeout {
                            attempts,
                            last_error,
                        });
                    }
                    sleep(self.poll_interval).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Loads the root route and evaluates the served-instance checks.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the page cannot be loaded. Check failures
    /// are reported in the returned [`CheckReport`].
    pub async fn run(&self, expectations: &ServedExpectations) -> Result<CheckReport, ProbeError> {
        let body = self.wait_until_loaded().await?;
        let document = RenderedDocument::parse(&body);
        Ok(served_instance_checks(&document, expectations))
    }
}
