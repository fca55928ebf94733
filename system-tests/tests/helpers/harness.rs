// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Translator Server Harness
// Description: Helpers for spawning translator servers in system-tests.
// Purpose: Provide deterministic server startup and teardown for tests.
// Dependencies: librilabs-config, librilabs-server, tokio
// ============================================================================

use std::time::Duration;

use librilabs_config::TranslatorConfig;
use librilabs_server::ServerError;
use librilabs_server::TranslatorServer;
use system_tests::config::DEFAULT_TIMEOUT;
use system_tests::config::SystemTestConfig;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use super::readiness::wait_for_server_ready;

/// Handle for a spawned translator server.
pub struct ServerHandle {
    base_url: String,
    stop: oneshot::Sender<()>,
    join: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    /// Returns the server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Signals graceful shutdown and waits for the server task.
    pub async fn shutdown(self) -> Result<(), String> {
        let _ = self.stop.send(());
        self.join
            .await
            .map_err(|err| format!("server task failed: {err}"))?
            .map_err(|err| format!("server exited with error: {err}"))
    }
}

/// Server or deployment a suite probes.
pub struct ServedTarget {
    base_url: String,
    server: Option<ServerHandle>,
}

impl ServedTarget {
    /// Uses `LIBRILABS_SYSTEM_TEST_BASE_URL` when set, otherwise spawns a
    /// local server with the default configuration.
    pub async fn acquire() -> Result<Self, String> {
        let env = SystemTestConfig::load()?;
        if let Some(url) = env.base_url {
            let base_url = url.trim_end_matches('/').to_string();
            wait_for_server_ready(&http_client()?, &base_url, timeout()?).await?;
            return Ok(Self {
                base_url,
                server: None,
            });
        }
        let server = spawn_server(base_config()).await?;
        Ok(Self {
            base_url: server.base_url().to_string(),
            server: Some(server),
        })
    }

    /// Returns the target base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stops the local server, if one was spawned.
    pub async fn release(self) -> Result<(), String> {
        match self.server {
            Some(server) => server.shutdown().await,
            None => Ok(()),
        }
    }
}

/// Default configuration with request logging disabled.
pub fn base_config() -> TranslatorConfig {
    let mut config = TranslatorConfig::default();
    config.server.request_log.enabled = false;
    config
}

/// Spawns a server on an ephemeral loopback port and waits for readiness.
pub async fn spawn_server(config: TranslatorConfig) -> Result<ServerHandle, String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("failed to bind loopback: {err}"))?;
    let addr = listener.local_addr().map_err(|err| format!("failed to read listener address: {err}"))?;
    let server = TranslatorServer::from_config(config).map_err(|err| format!("server init failed: {err}"))?;
    let (stop, stopped) = oneshot::channel::<()>();
    let join = tokio::spawn(server.serve_on(listener, async {
        let _ = stopped.await;
    }));
    let handle = ServerHandle {
        base_url: format!("http://{addr}"),
        stop,
        join,
    };
    wait_for_server_ready(&http_client()?, handle.base_url(), timeout()?).await?;
    Ok(handle)
}

/// HTTP client used by the suites.
pub fn http_client() -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .map_err(|err| format!("failed to build http client: {err}"))
}

/// Effective readiness timeout.
pub fn timeout() -> Result<Duration, String> {
    Ok(SystemTestConfig::load()?.effective_timeout(DEFAULT_TIMEOUT))
}
