// crates/librilabs-cli/src/main.rs
// ============================================================================
// Module: Librilabs CLI Entry Point
// Description: Command dispatcher for the translator server and its tooling.
// Purpose: Serve the front page, verify running instances, and manage the store.
// Dependencies: clap, librilabs-config, librilabs-server, librilabs-store-sqlite,
//               librilabs-verify, thiserror, tokio
// ============================================================================

//! ## Overview
//! `librilabs` starts the HTTP server, runs the served-instance checks
//! against a running deployment, validates configuration, and applies or
//! reverts database migrations. Every failure is written to stderr as one
//! line and mapped to a failing exit code.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use librilabs_config::TranslatorConfig;
use librilabs_server::TranslatorServer;
use librilabs_store_sqlite::SqliteTranslationStore;
use librilabs_verify::ServedExpectations;
use librilabs_verify::ServedInstanceProbe;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default wait for a served instance to answer, in milliseconds.
const DEFAULT_CHECK_TIMEOUT_MS: u64 = 10_000;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "librilabs", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the translator HTTP server.
    Serve(ConfigArgs),
    /// Run the served-instance checks against a running server.
    Check(CheckCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Database schema administration.
    Db {
        /// Selected database subcommand.
        #[command(subcommand)]
        command: DbCommand,
    },
}

/// Shared `--config` argument.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// Config file path (defaults to `LIBRILABS_CONFIG` or librilabs.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
struct CheckCommand {
    /// Base URL of the running instance.
    #[arg(long, value_name = "URL")]
    url: String,
    /// How long to wait for the instance to answer.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_CHECK_TIMEOUT_MS)]
    timeout_ms: u64,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate configuration, printing advisory warnings.
    Validate(ConfigArgs),
}

/// Database subcommands.
#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Apply pending migrations.
    Upgrade(DbUpgradeCommand),
    /// Revert migrations down to a target version.
    Downgrade(DbDowngradeCommand),
    /// Show applied and pending migrations.
    Status(ConfigArgs),
}

/// Arguments for `db upgrade`.
#[derive(Args, Debug)]
struct DbUpgradeCommand {
    /// Shared config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Target version (defaults to the latest known version).
    #[arg(long, value_name = "VERSION")]
    to: Option<u32>,
}

/// Arguments for `db downgrade`.
#[derive(Args, Debug)]
struct DbDowngradeCommand {
    /// Shared config selection.
    #[command(flatten)]
    config: ConfigArgs,
    /// Target version; 0 removes the whole schema.
    #[arg(long, value_name = "VERSION")]
    to: u32,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a message for stderr.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the parsed command.
async fn run(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Commands::Serve(args) => command_serve(&args).await,
        Commands::Check(command) => command_check(&command).await,
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(args) => command_config_validate(&args),
        },
        Commands::Db {
            command,
        } => command_db(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let server = TranslatorServer::from_config(config)
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Check Command
// ============================================================================

/// Executes the `check` command, printing one line per check.
async fn command_check(command: &CheckCommand) -> CliResult<ExitCode> {
    let probe = ServedInstanceProbe::new(&command.url, Duration::from_millis(command.timeout_ms))
        .map_err(|err| CliError::new(format!("check failed: {err}")))?;
    let report = probe
        .run(&ServedExpectations::default())
        .await
        .map_err(|err| CliError::new(format!("check failed: {err}")))?;
    for result in report.results() {
        write_stdout(&result.to_string())?;
    }
    let failed = report.failures().count();
    let total = report.results().len();
    write_stdout(&format!("{} of {total} checks passed", total - failed))?;
    Ok(if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

// ============================================================================
// SECTION: Config Command
// ============================================================================

/// Executes `config validate`.
fn command_config_validate(args: &ConfigArgs) -> CliResult<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    for warning in config.warnings() {
        write_stderr(&format!("warning: {warning}"))?;
    }
    let source = config
        .source
        .as_ref()
        .map_or_else(|| "built-in defaults".to_string(), |path| path.display().to_string());
    write_stdout(&format!("config valid ({source})"))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Database Commands
// ============================================================================

/// Dispatches database subcommands.
fn command_db(command: &DbCommand) -> CliResult<ExitCode> {
    match command {
        DbCommand::Upgrade(command) => {
            let store = open_store(&command.config)?;
            let applied =
                store.upgrade(command.to).map_err(|err| CliError::new(format!("upgrade failed: {err}")))?;
            if applied.is_empty() {
                write_stdout("schema already up to date")?;
            }
            for version in applied {
                write_stdout(&format!("applied migration {version}"))?;
            }
        }
        DbCommand::Downgrade(command) => {
            let store = open_store(&command.config)?;
            let reverted = store
                .downgrade(command.to)
                .map_err(|err| CliError::new(format!("downgrade failed: {err}")))?;
            if reverted.is_empty() {
                write_stdout("nothing to revert")?;
            }
            for version in reverted {
                write_stdout(&format!("reverted migration {version}"))?;
            }
        }
        DbCommand::Status(args) => {
            let store = open_store(args)?;
            let status = store.status().map_err(|err| CliError::new(format!("status failed: {err}")))?;
            write_stdout(&format!(
                "schema version {} of {}",
                status.current_version, status.latest_version
            ))?;
            for migration in &status.applied {
                write_stdout(&format!(
                    "applied {} {} at {}",
                    migration.version, migration.name, migration.applied_at
                ))?;
            }
            for version in &status.pending {
                write_stdout(&format!("pending {version}"))?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Opens the store named by the `[database]` section.
fn open_store(args: &ConfigArgs) -> CliResult<SqliteTranslationStore> {
    let config = load_config(args.config.as_deref())?;
    let database = config
        .database
        .as_ref()
        .ok_or_else(|| CliError::new("no [database] section configured".to_string()))?;
    SqliteTranslationStore::open(&database.store_config())
        .map_err(|err| CliError::new(format!("database open failed: {err}")))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads configuration with process environment overrides.
fn load_config(path: Option<&Path>) -> CliResult<TranslatorConfig> {
    TranslatorConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a stdout line, mapping failures into [`CliError`].
fn write_stdout(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(format!("failed to write stdout: {err}")))
}

/// Writes a stderr line, mapping failures into [`CliError`].
fn write_stderr(message: &str) -> CliResult<()> {
    write_stderr_line(message).map_err(|err| CliError::new(format!("failed to write stderr: {err}")))
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
