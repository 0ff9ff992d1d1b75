use thiserror::Error;

use crate::gateway::GatewayError;

/// Main error type for clinicdesk
#[derive(Error, Debug)]
pub enum ClinicError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl ClinicError {
    /// Message suitable for an `Error` UI state
    pub fn user_message(&self) -> String {
        match self {
            ClinicError::ValidationError(msg) => msg.clone(),
            ClinicError::Gateway(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

pub type ClinicResult<T> = Result<T, ClinicError>;
