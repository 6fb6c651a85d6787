//! Error types for lm-core

use thiserror::Error;

/// Core error type for Loam
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Failed to parse configuration file
    #[error("[C002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// C003: Invalid configuration value
    #[error("[C003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C004: Unknown stage name
    #[error("[C004] Unknown stage: {name}")]
    UnknownStage { name: String },

    /// C005: Unknown CSR application type
    #[error("[C005] Unknown CSR type '{name}': expected advertising, labels, or lead")]
    UnknownCsrType { name: String },

    /// C006: IO error
    #[error("[C006] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// C007: Report serialization error
    #[error("[C007] Report JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// C008: YAML parse error
    #[error("[C008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
