//! Application Configuration
//!
//! Paths to the persisted model and class mapping plus serving options.
//! Stored as JSON; every field has a default so partial files work.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils::error::{OncoDataError, Result};

/// Runtime configuration for the classifier and its upload server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Model artifact directory (`config.json` + `model.mpk`)
    pub model_dir: PathBuf,

    /// JSON file mapping class keys to model output indices
    pub class_index_path: PathBuf,

    /// Host to bind the upload server to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("runs/cancer_classifier_model"),
            class_index_path: PathBuf::from("runs/label_encoder.json"),
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            OncoDataError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| {
            OncoDataError::Configuration(format!("malformed {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model_dir.as_os_str().is_empty() {
            return Err(OncoDataError::Configuration(
                "model_dir must not be empty".to_string(),
            ));
        }
        if self.class_index_path.as_os_str().is_empty() {
            return Err(OncoDataError::Configuration(
                "class_index_path must not be empty".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(OncoDataError::Configuration(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model_dir, PathBuf::from("runs/cancer_classifier_model"));
        assert_eq!(config.max_upload_bytes, 200 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_partial() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("oncodata.json");
        std::fs::write(&path, r#"{"port": 9000}"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");

        let full = dir.path().join("full.json");
        config.save(&full).unwrap();
        assert_eq!(AppConfig::load(&full).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"max_upload_bytes": 0}"#).unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, OncoDataError::Configuration(_)));
    }
}
