// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for translator servers.
// Purpose: Ensure servers are ready without arbitrary sleeps.
// Dependencies: reqwest, tokio
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;

/// Polls `/health` until the server answers 200 or the timeout expires.
pub async fn wait_for_server_ready(
    client: &reqwest::Client,
    base_url: &str,
    timeout: Duration,
) -> Result<(), String> {
    let start = Instant::now();
    let url = format!("{base_url}/health");
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        let error = match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => return Ok(()),
            Ok(response) => format!("status {}", response.status()),
            Err(err) => err.to_string(),
        };
        if start.elapsed() > timeout {
            return Err(format!("server readiness timeout after {attempts} attempts: {error}"));
        }
        sleep(Duration::from_millis(50)).await;
    }
}
