// cat-manager-config/src/lib.rs
// ============================================================================
// Module: Cat Manager Config Library
// Description: Public API surface for Cat Manager configuration.
// Purpose: Expose the config model, loading, and validation.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! `cat-manager-config` owns the `cat-manager.toml` model. Loading is
//! fail-closed: oversized or non-UTF-8 files, unknown fields, and invalid
//! values all produce a [`ConfigError`] before a server is built.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AccessConfig;
pub use config::CONFIG_ENV_VAR;
pub use config::CatManagerConfig;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::FeaturesConfig;
pub use config::FlagConfig;
pub use config::GrantConfig;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::ServerAuditConfig;
pub use config::ServerConfig;
pub use config::SessionConfig;
pub use config::StoreBackend;
pub use config::StoreConfig;
