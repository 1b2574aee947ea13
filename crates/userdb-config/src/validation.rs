//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Invalid socket path '{path}': {message}")]
    InvalidSocketPath { path: String, message: String },
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(path) = &config.service.socket_path {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::InvalidSocketPath {
                path: String::new(),
                message: "socket_path cannot be empty".into(),
            });
        } else if !path.is_absolute() {
            errors.push(ValidationError::InvalidSocketPath {
                path: path.display().to_string(),
                message: "socket_path must be absolute".into(),
            });
        }
    }

    errors
}
