//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Bound service metadata is malformed: {0}")]
    BoundServices(#[from] serde_json::Error),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid server host: {0}")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error(
        "Request timeout of {request_secs}s must exceed the {required_secs}s upstream calls can take"
    )]
    RequestTimeoutTooShort { request_secs: u64, required_secs: u64 },

    #[error("Invalid dialog service URL format")]
    InvalidDialogUrl,

    #[error("Invalid telemetry base URL format")]
    InvalidTelemetryUrl,

    #[error("Telemetry credentials are only partially configured")]
    PartialTelemetryCredentials,

    #[error("At least one device list trigger phrase is required")]
    NoTriggerPhrases,

    #[error("Comfort range minimum exceeds maximum")]
    InvalidComfortRange,

    #[error("Invalid log format: {0}")]
    InvalidLogFormat(String),
}
