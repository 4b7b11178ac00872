// cat-manager-config/src/config.rs
// ============================================================================
// Module: Cat Manager Configuration
// Description: TOML configuration model, loading, and validation.
// Purpose: Turn `cat-manager.toml` into validated server settings.
// Dependencies: cat-manager-core, cat-manager-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! The config file is resolved from an explicit path, then the
//! [`CONFIG_ENV_VAR`] environment variable, then [`DEFAULT_CONFIG_NAME`] in
//! the working directory. Every struct denies unknown fields, and
//! [`CatManagerConfig::validate`] runs on every load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use cat_manager_core::AccessGrant;
use cat_manager_core::AccessPolicy;
use cat_manager_core::AgencyId;
use cat_manager_core::FlagRule;
use cat_manager_core::StaticFeatureFlags;
use cat_manager_core::UserId;
use cat_manager_store_sqlite::SqliteStoreConfig;
use cat_manager_store_sqlite::SqliteStoreMode;
use cat_manager_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "CAT_MANAGER_CONFIG";
/// Config file name used when no path is given.
pub const DEFAULT_CONFIG_NAME: &str = "cat-manager.toml";
/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;
/// Maximum total config path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a single config path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Minimum session secret length in bytes.
const MIN_SESSION_SECRET_BYTES: usize = 32;
/// Default bind address.
const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Default request body limit.
const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024;
/// Upper bound for the request body limit.
const MAX_BODY_BYTES_LIMIT: usize = 1024 * 1024;
/// Default session cookie name.
const DEFAULT_COOKIE_NAME: &str = "cat_manager_session";
/// Default `SQLite` busy timeout.
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file is not valid TOML for the model.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config values failed validation.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for Cat Manager.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatManagerConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Session cookie settings.
    pub session: SessionConfig,
    /// Kitten store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Static access grants.
    #[serde(default)]
    pub access: AccessConfig,
    /// Feature flag table.
    #[serde(default)]
    pub features: FeaturesConfig,
}

impl CatManagerConfig {
    /// Loads and validates configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, parsed, or
    /// validated.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_path(path)?;
        validate_path(&path)?;
        let metadata = std::fs::metadata(&path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let bytes = std::fs::read(&path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let content = String::from_utf8(bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates all sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first failing constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.session.validate()?;
        self.store.validate()?;
        self.access.validate()?;
        self.features.validate()?;
        Ok(())
    }
}

/// Resolves the config path from argument, environment, or default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(value) => {
            let value = value.into_string().map_err(|_| {
                ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must be valid utf-8"))
            })?;
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{CONFIG_ENV_VAR} must not be empty")));
            }
            Ok(PathBuf::from(value))
        }
        None => Ok(PathBuf::from(DEFAULT_CONFIG_NAME)),
    }
}

/// Validates config path limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to bind.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted request body size.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Request audit logging.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            audit: ServerAuditConfig::default(),
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
        self.bind.parse().map_err(|_| {
            ConfigError::Invalid(format!("invalid server bind address: {}", self.bind))
        })
    }

    /// Validates server settings.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_BODY_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerAuditConfig {
    /// Whether request audit events are emitted.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Optional JSON-lines file; stderr when unset.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

/// Returns the default bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Returns the default body limit.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Serde helper for fields defaulting to true.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Session
// ============================================================================

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// HMAC secret used to sign session tokens.
    pub secret: String,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl SessionConfig {
    /// Creates a session config with the default cookie name.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            cookie_name: default_cookie_name(),
        }
    }

    /// Validates session settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SESSION_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "session.secret must be at least {MIN_SESSION_SECRET_BYTES} bytes"
            )));
        }
        let valid_name = !self.cookie_name.is_empty()
            && self
                .cookie_name
                .bytes()
                .all(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.'));
        if !valid_name {
            return Err(ConfigError::Invalid(
                "session.cookie_name must be non-empty ascii [A-Za-z0-9_.-]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Returns the default cookie name.
fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Kitten store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local in-memory store.
    #[default]
    Memory,
    /// `SQLite` file store.
    Sqlite,
}

/// Kitten store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Backend selector.
    #[serde(rename = "type", default)]
    pub backend: StoreBackend,
    /// `SQLite` database path (sqlite only).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// `SQLite` busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Memory,
            path: None,
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns an `SQLite` store config at the given path.
    #[must_use]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Returns the `SQLite` settings when the sqlite backend is selected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the sqlite backend has no path.
    pub fn sqlite_config(&self) -> Result<Option<SqliteStoreConfig>, ConfigError> {
        match self.backend {
            StoreBackend::Memory => Ok(None),
            StoreBackend::Sqlite => {
                let path = self.path.clone().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires store.path".to_string())
                })?;
                Ok(Some(SqliteStoreConfig {
                    path,
                    busy_timeout_ms: self.busy_timeout_ms,
                    journal_mode: self.journal_mode,
                    sync_mode: self.sync_mode,
                }))
            }
        }
    }

    /// Validates store settings.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StoreBackend::Memory && self.path.is_some() {
            return Err(ConfigError::Invalid("memory store does not accept store.path".to_string()));
        }
        self.sqlite_config().map(|_| ())
    }
}

/// Returns the default busy timeout.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Access
// ============================================================================

/// Static access grants.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessConfig {
    /// Grants, one per user entry.
    #[serde(default)]
    pub grants: Vec<GrantConfig>,
}

/// One access grant entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrantConfig {
    /// Granted user.
    pub user_id: UserId,
    /// Agencies the user may manage.
    pub agencies: Vec<AgencyId>,
}

impl AccessConfig {
    /// Builds the access policy.
    #[must_use]
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::from_grants(
            self.grants
                .iter()
                .map(|grant| AccessGrant::new(grant.user_id, grant.agencies.iter().copied())),
        )
    }

    /// Validates grant entries.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(grant) = self.grants.iter().find(|grant| grant.agencies.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "access grant for user {} lists no agencies",
                grant.user_id
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Features
// ============================================================================

/// Feature flag table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FeaturesConfig {
    /// Flag entries.
    #[serde(default)]
    pub flags: Vec<FlagConfig>,
}

/// One feature flag entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlagConfig {
    /// Flag name.
    pub name: String,
    /// Master switch.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Users the flag is limited to (empty means all).
    #[serde(default)]
    pub users: Vec<UserId>,
    /// Agencies the flag is limited to (empty means all).
    #[serde(default)]
    pub agencies: Vec<AgencyId>,
}

impl FeaturesConfig {
    /// Builds the static evaluator.
    #[must_use]
    pub fn evaluator(&self) -> StaticFeatureFlags {
        self.flags.iter().fold(StaticFeatureFlags::new(), |flags, flag| {
            flags.with_rule(
                flag.name.clone(),
                FlagRule {
                    enabled: flag.enabled,
                    users: flag.users.iter().copied().collect(),
                    agencies: flag.agencies.iter().copied().collect(),
                },
            )
        })
    }

    /// Validates flag names.
    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = BTreeSet::new();
        for flag in &self.flags {
            if flag.name.trim().is_empty() {
                return Err(ConfigError::Invalid("feature flag name must be non-empty".to_string()));
            }
            if !seen.insert(flag.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate feature flag: {}",
                    flag.name
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
