// crates/librilabs-config/src/config.rs
// ============================================================================
// Module: Librilabs Configuration
// Description: Configuration loading and validation for the translator.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: librilabs-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is resolved from an explicit path, then the
//! `LIBRILABS_CONFIG` environment variable, then `librilabs.toml` in the
//! working directory. Only the implicit default file may be absent, in which
//! case built-in defaults apply. After parsing, `ALLOWED_ORIGINS` and
//! `ENVIRONMENT` override the file, and the merged result is validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use librilabs_store_sqlite::SqliteStoreConfig;
use librilabs_store_sqlite::SqliteStoreMode;
use librilabs_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "librilabs.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LIBRILABS_CONFIG";
/// Environment variable overriding the allowed CORS origins.
pub const ALLOWED_ORIGINS_ENV_VAR: &str = "ALLOWED_ORIGINS";
/// Environment variable overriding the deployment environment.
pub const ENVIRONMENT_ENV_VAR: &str = "ENVIRONMENT";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of allowed origins.
pub(crate) const MAX_ALLOWED_ORIGINS: usize = 64;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8000";
/// Default allowed origin for the browser front end.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
/// Default database busy timeout in milliseconds.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum database busy timeout in milliseconds.
const MAX_BUSY_TIMEOUT_MS: u64 = 60_000;
/// Default number of startup connection attempts.
const DEFAULT_CONNECT_RETRIES: u32 = 3;
/// Maximum number of startup connection attempts.
const MAX_CONNECT_RETRIES: u32 = 10;
/// Default delay before the first connection retry in milliseconds.
const DEFAULT_INITIAL_RETRY_DELAY_MS: u64 = 1_000;
/// Maximum delay before the first connection retry in milliseconds.
const MAX_INITIAL_RETRY_DELAY_MS: u64 = 60_000;

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Translator configuration loaded from `librilabs.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslatorConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Optional database configuration; no store is opened when absent.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// File the configuration was read from, if any (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl TranslatorConfig {
    /// Loads configuration using the default resolution rules and process
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, &EnvOverrides::from_env())
    }

    /// Loads configuration applying the provided overrides instead of the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load_with(path: Option<&Path>, overrides: &EnvOverrides) -> Result<Self, ConfigError> {
        let (resolved, explicit) = resolve_path(path, overrides.config_path.as_deref())?;
        validate_path(&resolved)?;
        let mut config = if !explicit && !resolved.exists() {
            Self::default()
        } else {
            let mut config = Self::from_file(&resolved)?;
            config.source = Some(resolved);
            config
        };
        config.apply_overrides(overrides)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration file without overrides or validation.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses configuration from TOML text without overrides or validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the TOML is malformed.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies environment overrides on top of file values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an override value is malformed.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) -> Result<(), ConfigError> {
        if let Some(origins) = &overrides.allowed_origins {
            self.server.allowed_origins = parse_origin_list(origins);
        }
        if let Some(environment) = &overrides.environment {
            self.server.environment = environment.parse()?;
        }
        Ok(())
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        Ok(())
    }

    /// Returns advisory findings that do not block startup.
    #[must_use]
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.server.environment != Environment::Production {
            return warnings;
        }
        if self.database.is_none() {
            warnings.push("production environment configured without a database".to_string());
        }
        for origin in &self.server.allowed_origins {
            if !origin.starts_with("https://") {
                warnings.push(format!("production origin {origin} does not use https"));
            }
        }
        warnings
    }
}

// ============================================================================
// SECTION: Environment Overrides
// ============================================================================

/// Environment values consulted during loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// Value of `LIBRILABS_CONFIG`.
    pub config_path: Option<String>,
    /// Value of `ALLOWED_ORIGINS`.
    pub allowed_origins: Option<String>,
    /// Value of `ENVIRONMENT`.
    pub environment: Option<String>,
}

impl EnvOverrides {
    /// Reads overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            config_path: env::var(CONFIG_ENV_VAR).ok(),
            allowed_origins: env::var(ALLOWED_ORIGINS_ENV_VAR).ok(),
            environment: env::var(ENVIRONMENT_ENV_VAR).ok(),
        }
    }
}

// ============================================================================
// SECTION: Server Config
// ============================================================================

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production deployment.
    Production,
}

impl Environment {
    /// Returns the canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            other => Err(ConfigError::Invalid(format!("unknown environment: {other}"))),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Browser origins allowed to make credentialed cross-origin requests.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,
    /// Request logging configuration.
    #[serde(default)]
    pub request_log: RequestLogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_origins: default_allowed_origins(),
            environment: Environment::default(),
            request_log: RequestLogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.bind)))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "server.allowed_origins must list at least one origin".to_string(),
            ));
        }
        if self.allowed_origins.len() > MAX_ALLOWED_ORIGINS {
            return Err(ConfigError::Invalid(format!(
                "server.allowed_origins exceeds {MAX_ALLOWED_ORIGINS} entries"
            )));
        }
        for origin in &self.allowed_origins {
            validate_origin(origin)?;
        }
        self.request_log.validate()
    }
}

/// Request logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RequestLogConfig {
    /// Enable structured request logging.
    #[serde(default = "default_request_log_enabled")]
    pub enabled: bool,
    /// Optional log path (JSON lines); stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            enabled: default_request_log_enabled(),
            path: None,
        }
    }
}

impl RequestLogConfig {
    /// Validates request log configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.request_log.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Database Config
// ============================================================================

/// `SQLite` database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Connection attempts made at startup.
    #[serde(default = "default_connect_retries")]
    pub connect_retries: u32,
    /// Delay before the first retry in milliseconds; doubles per attempt.
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
}

impl DatabaseConfig {
    /// Builds a database config for `path` with defaults.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            connect_retries: default_connect_retries(),
            initial_retry_delay_ms: default_initial_retry_delay_ms(),
        }
    }

    /// Returns the store configuration for this database.
    #[must_use]
    pub fn store_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates database configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("database.path", &self.path.to_string_lossy())?;
        if self.busy_timeout_ms > MAX_BUSY_TIMEOUT_MS {
            return Err(ConfigError::Invalid(format!(
                "database.busy_timeout_ms must be at most {MAX_BUSY_TIMEOUT_MS}"
            )));
        }
        if self.connect_retries == 0 || self.connect_retries > MAX_CONNECT_RETRIES {
            return Err(ConfigError::Invalid(format!(
                "database.connect_retries must be between 1 and {MAX_CONNECT_RETRIES}"
            )));
        }
        if self.initial_retry_delay_ms > MAX_INITIAL_RETRY_DELAY_MS {
            return Err(ConfigError::Invalid(format!(
                "database.initial_retry_delay_ms must be at most {MAX_INITIAL_RETRY_DELAY_MS}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default allowed origins.
fn default_allowed_origins() -> Vec<String> {
    vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
}

/// Request logging is on unless disabled.
const fn default_request_log_enabled() -> bool {
    true
}

/// Returns the default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default connection attempt count.
const fn default_connect_retries() -> u32 {
    DEFAULT_CONNECT_RETRIES
}

/// Returns the default initial retry delay.
const fn default_initial_retry_delay_ms() -> u64 {
    DEFAULT_INITIAL_RETRY_DELAY_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults. The flag is
/// true when the path was requested explicitly and therefore must exist.
fn resolve_path(
    path: Option<&Path>,
    env_path: Option<&str>,
) -> Result<(PathBuf, bool), ConfigError> {
    if let Some(path) = path {
        return Ok((path.to_path_buf(), true));
    }
    if let Some(env_path) = env_path {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok((PathBuf::from(env_path), true));
    }
    Ok((PathBuf::from(DEFAULT_CONFIG_NAME), false))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Splits a comma-separated origin list, dropping blank entries.
fn parse_origin_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates a single CORS origin: `http` or `https`, a host, optional port,
/// and nothing else.
fn validate_origin(origin: &str) -> Result<(), ConfigError> {
    if origin == "*" {
        return Err(ConfigError::Invalid(
            "server.allowed_origins must not contain a wildcard".to_string(),
        ));
    }
    let url = Url::parse(origin)
        .map_err(|err| ConfigError::Invalid(format!("invalid origin {origin}: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(format!("origin {origin} must use http or https")));
    }
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid(format!("origin {origin} must include a host")));
    }
    if url.origin().ascii_serialization() != origin {
        return Err(ConfigError::Invalid(format!(
            "origin {origin} must not include a path, query, or trailing slash"
        )));
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
