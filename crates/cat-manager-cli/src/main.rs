// crates/cat-manager-cli/src/main.rs
// ============================================================================
// Module: Cat Manager CLI Entry Point
// Description: Command dispatcher for the Cat Manager server and tooling.
// Purpose: Run the server, validate config, and mint session cookies.
// Dependencies: clap, cat-manager-config, cat-manager-web, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `cat-manager` binary loads `cat-manager.toml` (or the file named by
//! `--config` or `CAT_MANAGER_CONFIG`) and then either serves HTTP, validates
//! the file, or mints a signed session cookie for a user. Minting exists for
//! local testing; there is no login flow.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use cat_manager_config::CatManagerConfig;
use cat_manager_core::UserId;
use cat_manager_core::UserIdentity;
use cat_manager_web::CatManagerServer;
use cat_manager_web::SessionAuthenticator;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "cat-manager", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Cat Manager HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Session cookie utilities.
    Session {
        /// Selected session subcommand.
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to cat-manager.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the configured bind address.
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a config file and exit.
    Validate(ConfigValidateCommand),
}

/// Arguments for config validation.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to cat-manager.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Session subcommands.
#[derive(Subcommand, Debug)]
enum SessionCommand {
    /// Mint a signed session for a user.
    Mint(SessionMintCommand),
}

/// Arguments for session minting.
#[derive(Args, Debug)]
struct SessionMintCommand {
    /// Optional config file path (defaults to cat-manager.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// User identifier.
    #[arg(long, value_name = "ID")]
    user_id: u64,
    /// Login name.
    #[arg(long, default_value = "")]
    username: String,
    /// Given name.
    #[arg(long, default_value = "")]
    first_name: String,
    /// Family name.
    #[arg(long, default_value = "")]
    last_name: String,
    /// Contact email.
    #[arg(long, default_value = "")]
    email: String,
    /// Session lifetime in seconds (no expiry when omitted).
    #[arg(long, value_name = "SECONDS")]
    expires_in: Option<u64>,
    /// Output form.
    #[arg(long, value_enum, default_value_t = MintFormat::Cookie)]
    format: MintFormat,
}

/// Output forms for minted sessions.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MintFormat {
    /// `name=token`, ready for a `Cookie` header.
    Cookie,
    /// Bare signed token.
    Token,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
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
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => match command {
            ConfigCommand::Validate(command) => command_config_validate(&command),
        },
        Commands::Session {
            command,
        } => match command {
            SessionCommand::Mint(command) => command_session_mint(&command),
        },
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = CatManagerConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    if let Some(bind) = command.bind {
        config.server.bind = bind.to_string();
    }
    let server = tokio::task::spawn_blocking(move || CatManagerServer::from_config(&config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("cat-manager: listening on http://{}", server.bind_addr()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = CatManagerConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the session mint command.
fn command_session_mint(command: &SessionMintCommand) -> CliResult<ExitCode> {
    let config = CatManagerConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let output = mint_session(&config, command, now_unix_seconds())?;
    write_stdout_line(&output).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Builds the identity for a mint request and returns the signed output.
fn mint_session(
    config: &CatManagerConfig,
    command: &SessionMintCommand,
    now: u64,
) -> CliResult<String> {
    let mut identity = UserIdentity::new(UserId::new(command.user_id)).with_profile(
        command.username.as_str(),
        command.first_name.as_str(),
        command.last_name.as_str(),
        command.email.as_str(),
    );
    if let Some(lifetime) = command.expires_in {
        let expires_at = now
            .checked_add(lifetime)
            .ok_or_else(|| CliError::new("--expires-in is too large".to_string()))?;
        identity = identity.expiring_at(expires_at);
    }
    let sessions = SessionAuthenticator::from_config(&config.session);
    let minted = match command.format {
        MintFormat::Cookie => sessions.cookie_header(&identity),
        MintFormat::Token => sessions.codec().encode(&identity),
    };
    minted.map_err(|err| CliError::new(format!("session mint failed: {err}")))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Returns the current unix time in seconds.
fn now_unix_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
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

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
