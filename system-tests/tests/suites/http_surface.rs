// system-tests/tests/suites/http_surface.rs
// ============================================================================
// Module: HTTP Surface Tests
// Description: Health, error envelope, and CORS behavior over real sockets.
// Purpose: Ensure the HTTP contract holds end to end.
// Dependencies: system-tests helpers, reqwest, serde_json
// ============================================================================

//! HTTP surface tests for Librilabs system-tests.

use librilabs_config::EnvOverrides;
use librilabs_config::TranslatorConfig;
use serde_json::Value;

use crate::helpers::harness::base_config;
use crate::helpers::harness::http_client;
use crate::helpers::harness::spawn_server;

const ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Returns a header value as text, if present.
fn header(response: &reqwest::Response, name: &str) -> Option<String> {
    response.headers().get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
}

#[tokio::test(flavor = "multi_thread")]
async fn root_serves_html() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(base_config()).await?;
    let response = http_client()?.get(format!("{}/", server.base_url())).send().await?;
    let content_type = header(&response, "content-type");
    let status = response.status();
    server.shutdown().await?;

    if status != reqwest::StatusCode::OK {
        return Err(format!("unexpected status {status}").into());
    }
    if content_type.as_deref() != Some("text/html; charset=utf-8") {
        return Err(format!("unexpected content type {}", content_type.unwrap_or_default()).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_healthy() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(base_config()).await?;
    let response = http_client()?.get(format!("{}/health", server.base_url())).send().await?;
    let status = response.status();
    let body: Value = serde_json::from_str(&response.text().await?)?;
    server.shutdown().await?;

    if status != reqwest::StatusCode::OK {
        return Err(format!("unexpected status {status}").into());
    }
    if body["status"] != "healthy" {
        return Err(format!("unexpected health body {body}").into());
    }
    if body["timestamp"].as_str().is_none_or(str::is_empty) {
        return Err("health timestamp missing".into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_path_returns_envelope_with_request_id() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(base_config()).await?;
    let response =
        http_client()?.get(format!("{}/nonexistent-endpoint", server.base_url())).send().await?;
    let status = response.status();
    let request_id = header(&response, "x-request-id");
    let text = response.text().await?;
    server.shutdown().await?;

    if status != reqwest::StatusCode::NOT_FOUND {
        return Err(format!("unexpected status {status}").into());
    }
    let body: Value = serde_json::from_str(&text)?;
    let error = &body["error"];
    if error["code"] != "HTTP_404" {
        return Err(format!("unexpected code in {body}").into());
    }
    let Some(request_id) = request_id else {
        return Err("missing x-request-id header".into());
    };
    if error["request_id"] != request_id.as_str() || request_id.is_empty() {
        return Err(format!("request id mismatch: header {request_id}, body {body}").into());
    }
    for needle in ["Traceback", "panicked", ".rs:", "password", "secret"] {
        if text.contains(needle) {
            return Err(format!("envelope leaks {needle}: {text}").into());
        }
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn cors_echoes_only_allowed_origins() -> Result<(), Box<dyn std::error::Error>> {
    let server = spawn_server(base_config()).await?;
    let client = http_client()?;
    let url = format!("{}/health", server.base_url());
    let allowed = client.get(&url).header("origin", ALLOWED_ORIGIN).send().await?;
    let unlisted = client.get(&url).header("origin", "https://evil.example").send().await?;
    let preflight = client
        .request(reqwest::Method::OPTIONS, &url)
        .header("origin", ALLOWED_ORIGIN)
        .header("access-control-request-method", "GET")
        .send()
        .await?;
    server.shutdown().await?;

    if header(&allowed, "access-control-allow-origin").as_deref() != Some(ALLOWED_ORIGIN) {
        return Err("allowed origin not echoed".into());
    }
    if header(&allowed, "access-control-allow-credentials").as_deref() != Some("true") {
        return Err("credentials not allowed for allowed origin".into());
    }
    if header(&unlisted, "access-control-allow-origin").is_some() {
        return Err("unlisted origin was echoed".into());
    }
    if preflight.status() != reqwest::StatusCode::OK {
        return Err(format!("preflight returned {}", preflight.status()).into());
    }
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn allowed_origins_override_replaces_configured_list() -> Result<(), Box<dyn std::error::Error>> {
    let overrides = EnvOverrides {
        allowed_origins: Some("https://app.translator.example, https://admin.translator.example".to_string()),
        ..EnvOverrides::default()
    };
    let mut config = TranslatorConfig::default();
    config.apply_overrides(&overrides)?;
    config.validate()?;
    config.server.request_log.enabled = false;

    let server = spawn_server(config).await?;
    let client = http_client()?;
    let url = format!("{}/health", server.base_url());
    let overridden = client.get(&url).header("origin", "https://admin.translator.example").send().await?;
    let replaced = client.get(&url).header("origin", ALLOWED_ORIGIN).send().await?;
    server.shutdown().await?;

    if header(&overridden, "access-control-allow-origin").as_deref()
        != Some("https://admin.translator.example")
    {
        return Err("override origin not echoed".into());
    }
    if header(&replaced, "access-control-allow-origin").is_some() {
        return Err("default origin still echoed after override".into());
    }
    Ok(())
}
