//! # Configuration Error Types
//!
//! Errors raised while loading settings and weapon catalogs. These only
//! happen at startup; the per-frame render path has no error type.

use thiserror::Error;

/// Errors that can occur while loading configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for the expected schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two catalog entries share an id.
    #[error("duplicate weapon id: {0}")]
    DuplicateWeapon(String),

    /// A catalog entry failed validation.
    #[error("invalid weapon {id}: {reason}")]
    InvalidWeapon {
        /// Offending weapon id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
