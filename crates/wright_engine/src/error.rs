//! Error types for the engine module.

use thiserror::Error;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while declaring resources.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid resource name: {0}")]
    InvalidName(String),

    #[error("Duplicate resource name: {0}")]
    DuplicateResource(String),

    #[error("Unknown resource reference in {resource}: {reference}")]
    UnknownReference { resource: String, reference: String },

    #[error("Resource {0} is not a provider")]
    InvalidProvider(String),

    #[error("Invalid arguments for resource {name}: {message}")]
    InvalidArguments { name: String, message: String },

    #[error("Resource registration failed: {name} - {message}")]
    RegistrationFailed { name: String, message: String },

    #[error("Output registration failed: {0}")]
    OutputsFailed(String),

    #[error("Missing required configuration value: {0}")]
    ConfigMissing(String),

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalid { key: String, message: String },

    #[error("Configuration value {0} is a secret and cannot be read locally")]
    SecretValue(String),

    #[error("Invalid configuration override: {0}")]
    InvalidOverride(String),

    #[error("Cannot load stack configuration {path}: {message}")]
    ConfigFile { path: String, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the error comes from configuration lookup rather than a declaration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigMissing(_)
                | EngineError::ConfigInvalid { .. }
                | EngineError::SecretValue(_)
                | EngineError::InvalidOverride(_)
                | EngineError::ConfigFile { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_wrapped_errors_print_once() {
        let err = EngineError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.to_string(), "gone");
        assert!(err.source().is_none());
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_file_is_config_error() {
        let err = EngineError::ConfigFile {
            path: "Pulumi.dev.yaml".to_string(),
            message: "bad".to_string(),
        };
        assert!(err.is_config_error());
        assert_eq!(err.to_string(), "Cannot load stack configuration Pulumi.dev.yaml: bad");
    }
}
