//! Error Handling Module
//!
//! Defines the error type shared by the classification pipeline.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Main error type for OncoData operations
#[derive(Error, Debug)]
pub enum OncoDataError {
    /// Malformed or inconsistent class-index mapping or application config
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Model artifact missing, unreadable or incompatible with the runtime
    #[error("Model load error: {0}")]
    ModelLoad(String),

    /// Uploaded bytes could not be decoded as an image
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// Forward pass or output extraction failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OncoDataError {
    /// Whether the error belongs to startup and should stop the process
    /// from entering a serving state.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OncoDataError::Configuration(_) | OncoDataError::ModelLoad(_)
        )
    }
}

impl From<serde_json::Error> for OncoDataError {
    fn from(err: serde_json::Error) -> Self {
        OncoDataError::Serialization(err.to_string())
    }
}

/// Convenience Result type for OncoData operations
pub type Result<T> = std::result::Result<T, OncoDataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OncoDataError::Configuration("index 1 missing".to_string());
        assert_eq!(format!("{}", err), "Configuration error: index 1 missing");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(OncoDataError::Configuration("x".into()).is_fatal());
        assert!(OncoDataError::ModelLoad("x".into()).is_fatal());
        assert!(!OncoDataError::InvalidImage("x".into()).is_fatal());
        assert!(!OncoDataError::Inference("x".into()).is_fatal());
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: OncoDataError = parse.unwrap_err().into();
        assert!(matches!(err, OncoDataError::Serialization(_)));
    }
}
