//! Config defaults and core validation tests for librilabs-config.
// crates/librilabs-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults and Core Validation Tests
// Description: Validate default behavior and core config invariants.
// Purpose: Ensure minimal config is valid and critical invariants are enforced.
// =============================================================================

use librilabs_config::DEFAULT_ALLOWED_ORIGIN;
use librilabs_config::DatabaseConfig;
use librilabs_config::Environment;
use librilabs_store_sqlite::SqliteStoreMode;
use librilabs_store_sqlite::SqliteSyncMode;

mod common;

use common::TestResult;
use common::assert_invalid;
use common::config_from_toml;

#[test]
fn empty_config_uses_defaults_and_validates() -> TestResult {
    let config = config_from_toml("").map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.server.bind != "127.0.0.1:8000" {
        return Err(format!("unexpected default bind {}", config.server.bind));
    }
    if config.server.allowed_origins != [DEFAULT_ALLOWED_ORIGIN] {
        return Err("default origins should be the local front end".to_string());
    }
    if config.server.environment != Environment::Development {
        return Err("environment should default to development".to_string());
    }
    if !config.server.request_log.enabled || config.server.request_log.path.is_some() {
        return Err("request log should default to enabled on stderr".to_string());
    }
    if config.database.is_some() {
        return Err("database should be absent by default".to_string());
    }
    Ok(())
}

#[test]
fn database_section_fills_defaults() -> TestResult {
    let config = config_from_toml("[database]\npath = \"data/librilabs.sqlite\"\n")
        .map_err(|err| err.to_string())?;
    let database = config.database.ok_or_else(|| "database missing".to_string())?;
    if database.connect_retries != 3 || database.initial_retry_delay_ms != 1_000 {
        return Err("retry defaults should be 3 attempts from 1s".to_string());
    }
    if database.journal_mode != SqliteStoreMode::Wal || database.sync_mode != SqliteSyncMode::Full {
        return Err("pragma defaults should be wal/full".to_string());
    }
    let store = database.store_config();
    if store.busy_timeout_ms != 5_000 {
        return Err("busy timeout should default to 5000".to_string());
    }
    Ok(())
}

#[test]
fn unknown_fields_are_rejected() {
    assert!(config_from_toml("[server]\nport = 8000\n").is_err());
    assert!(config_from_toml("[telemetry]\nenabled = true\n").is_err());
}

#[test]
fn invalid_bind_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    config.server.bind = "localhost".to_string();
    assert_invalid(config.validate(), "server.bind")
}

#[test]
fn wildcard_origin_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    config.server.allowed_origins = vec!["*".to_string()];
    assert_invalid(config.validate(), "wildcard")
}

#[test]
fn malformed_origins_are_rejected() -> TestResult {
    for origin in ["http://localhost:3000/", "https://app.example.com/path?x=1", "ws://example.com"] {
        let mut config = config_from_toml("").map_err(|err| err.to_string())?;
        config.server.allowed_origins = vec![origin.to_string()];
        assert_invalid(config.validate(), "origin")?;
    }
    Ok(())
}

#[test]
fn empty_origin_list_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    config.server.allowed_origins.clear();
    assert_invalid(config.validate(), "at least one origin")
}

#[test]
fn zero_connect_retries_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    let mut database = DatabaseConfig::new("data/db.sqlite");
    database.connect_retries = 0;
    config.database = Some(database);
    assert_invalid(config.validate(), "connect_retries")
}

#[test]
fn excessive_retry_delay_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    let mut database = DatabaseConfig::new("data/db.sqlite");
    database.initial_retry_delay_ms = 60_001;
    config.database = Some(database);
    assert_invalid(config.validate(), "initial_retry_delay_ms")
}

#[test]
fn invalid_store_paths_are_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    config.database = Some(DatabaseConfig::new(""));
    assert_invalid(config.validate(), "database.path must be non-empty")?;
    config.database = Some(DatabaseConfig::new(format!("data/{}.sqlite", "a".repeat(300))));
    assert_invalid(config.validate(), "database.path path component too long")
}

#[test]
fn empty_request_log_path_is_rejected() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    config.server.request_log.path = Some("  ".to_string());
    assert_invalid(config.validate(), "server.request_log.path")
}

#[test]
fn production_warnings_flag_missing_database_and_plain_http() -> TestResult {
    let mut config = config_from_toml("").map_err(|err| err.to_string())?;
    if !config.warnings().is_empty() {
        return Err("development config should not warn".to_string());
    }
    config.server.environment = Environment::Production;
    let warnings = config.warnings();
    if warnings.len() != 2 {
        return Err(format!("expected two warnings, got {}", warnings.len()));
    }
    config.server.allowed_origins = vec!["https://app.example.com".to_string()];
    config.database = Some(DatabaseConfig::new("data/db.sqlite"));
    if !config.warnings().is_empty() {
        return Err("hardened production config should not warn".to_string());
    }
    Ok(())
}
