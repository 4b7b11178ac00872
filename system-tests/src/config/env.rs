// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional parent directory for per-test scratch directories.
    RunRoot,
    /// Optional store backend override (`sqlite` or `memory`).
    Store,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "CAT_MANAGER_SYSTEM_TEST_RUN_ROOT",
            Self::Store => "CAT_MANAGER_SYSTEM_TEST_STORE",
            Self::TimeoutSeconds => "CAT_MANAGER_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Store backend used by each test environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemTestStore {
    /// A private `SQLite` file per environment.
    #[default]
    Sqlite,
    /// A private in-memory store per environment.
    Memory,
}

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
    /// Store backend for spawned servers.
    pub store: SystemTestStore,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails validation (for example, an invalid timeout or store name).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let store = read_env_nonempty(SystemTestEnv::Store.as_str())?
            .map(|value| parse_store(SystemTestEnv::Store.as_str(), &value))
            .transpose()?
            .unwrap_or_default();
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        Ok(Self {
            run_root,
            store,
            timeout,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

/// Parses a store backend name.
///
/// # Errors
///
/// Returns an error when the value is not `sqlite` or `memory`.
fn parse_store(name: &str, raw: &str) -> Result<SystemTestStore, String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("sqlite") {
        return Ok(SystemTestStore::Sqlite);
    }
    if trimmed.eq_ignore_ascii_case("memory") {
        return Ok(SystemTestStore::Memory);
    }
    Err(format!("{name} must be sqlite or memory"))
}
