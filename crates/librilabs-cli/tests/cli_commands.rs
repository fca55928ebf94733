// crates/librilabs-cli/tests/cli_commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Integration tests that run the librilabs binary.
// Purpose: Validate exit codes and output for config, db, and check commands.
// Dependencies: librilabs binary, librilabs-server, tempfile, tokio
// ============================================================================
//! ## Overview
//! Runs the compiled `librilabs` binary in a scratch directory with the
//! configuration environment variables removed, so only the files each test
//! writes are consulted.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use librilabs_config::TranslatorConfig;
use librilabs_server::TranslatorServer;
use tempfile::TempDir;
use tokio::net::TcpListener;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn librilabs_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_librilabs"))
}

fn run_cli(dir: &Path, args: &[&str]) -> Output {
    Command::new(librilabs_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("LIBRILABS_CONFIG")
        .env_remove("ALLOWED_ORIGINS")
        .env_remove("ENVIRONMENT")
        .output()
        .expect("run librilabs")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("librilabs.toml");
    fs::write(&path, content.trim()).expect("write config");
    path.to_string_lossy().into_owned()
}

fn database_config(dir: &TempDir) -> String {
    let db_path = dir.path().join("data").join("librilabs.sqlite");
    write_config(
        dir,
        &format!(
            r#"
[database]
path = "{}"
"#,
            db_path.to_string_lossy().replace('\\', "/")
        ),
    )
}

// ============================================================================
// SECTION: Config
// ============================================================================

#[test]
fn config_validate_accepts_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["config", "validate"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("config valid (built-in defaults)"));
}

#[test]
fn config_validate_rejects_wildcard_origin() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
allowed_origins = ["*"]
"#,
    );
    let output = run_cli(dir.path(), &["config", "validate", "--config", &path]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("config load failed"));
}

#[test]
fn config_validate_prints_production_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
[server]
environment = "production"
allowed_origins = ["http://translator.example"]
"#,
    );
    let output = run_cli(dir.path(), &["config", "validate", "--config", &path]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let warnings = stderr(&output);
    assert!(warnings.contains("warning: production environment configured without a database"));
    assert!(warnings.contains("does not use https"));
}

// ============================================================================
// SECTION: Database
// ============================================================================

#[test]
fn db_commands_require_database_section() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["db", "status"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no [database] section configured"));
}

#[test]
fn db_upgrade_status_and_downgrade() {
    let dir = tempfile::tempdir().unwrap();
    let path = database_config(&dir);

    let status = run_cli(dir.path(), &["db", "status", "--config", &path]);
    assert!(status.status.success(), "stderr: {}", stderr(&status));
    assert!(stdout(&status).contains("schema version 0 of 1"));
    assert!(stdout(&status).contains("pending 1"));

    let upgrade = run_cli(dir.path(), &["db", "upgrade", "--config", &path]);
    assert!(upgrade.status.success(), "stderr: {}", stderr(&upgrade));
    assert!(stdout(&upgrade).contains("applied migration 1"));

    let again = run_cli(dir.path(), &["db", "upgrade", "--config", &path]);
    assert!(stdout(&again).contains("schema already up to date"));

    let status = run_cli(dir.path(), &["db", "status", "--config", &path]);
    assert!(stdout(&status).contains("schema version 1 of 1"));
    assert!(stdout(&status).contains("applied 1 initial_schema"));

    let downgrade = run_cli(dir.path(), &["db", "downgrade", "--to", "0", "--config", &path]);
    assert!(downgrade.status.success(), "stderr: {}", stderr(&downgrade));
    assert!(stdout(&downgrade).contains("reverted migration 1"));
}

#[test]
fn db_upgrade_rejects_unknown_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = database_config(&dir);
    let output = run_cli(dir.path(), &["db", "upgrade", "--to", "99", "--config", &path]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("upgrade failed"));
}

// ============================================================================
// SECTION: Check
// ============================================================================

#[test]
fn check_rejects_non_http_url() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["check", "--url", "ftp://127.0.0.1/"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("check failed"));
}

#[test]
fn check_fails_when_nothing_listens() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_cli(dir.path(), &["check", "--url", "http://127.0.0.1:9", "--timeout-ms", "200"]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("check failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_passes_against_running_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let mut config = TranslatorConfig::default();
    config.server.request_log.enabled = false;
    let server = TranslatorServer::from_config(config).unwrap();
    let (stop, stopped) = tokio::sync::oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve_on(listener, async {
        let _ = stopped.await;
    }));

    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_path_buf();
    let url = format!("http://{addr}");
    let output = tokio::task::spawn_blocking(move || run_cli(&dir_path, &["check", "--url", &url]))
        .await
        .unwrap();

    let _ = stop.send(());
    handle.await.unwrap().unwrap();

    assert!(output.status.success(), "stdout: {} stderr: {}", stdout(&output), stderr(&output));
    let lines = stdout(&output);
    assert!(lines.contains("PASS document_title"));
    assert!(lines.contains("PASS product_heading_visible_once"));
    assert!(lines.contains("PASS welcome_text_visible"));
    assert!(lines.contains("PASS main_landmark_contains_heading"));
    assert!(lines.contains("4 of 4 checks passed"));
}
