//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: String, url: String },

    #[error("Invalid email for {field}: {email}")]
    InvalidEmail { field: String, email: String },

    #[error("Invalid port: {port}")]
    InvalidPort { port: u16 },

    /// Unknown `OPENAPI_TRACING_LEVEL` value
    #[error("Invalid tracing level '{level}', expected one of trace, debug, info, warn, error")]
    InvalidTracingLevel { level: String },

    /// A required setting is blank, or a dependent setting lacks its parent
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    /// A configuration source could not be read
    #[error("Cannot read configuration source: {message}")]
    Unreadable { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
