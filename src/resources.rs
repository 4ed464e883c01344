//! Load-once resources
//!
//! The model and the class mapping are read from disk the first time they
//! are needed and shared read-only afterwards. Each accessor holds an init
//! lock while loading, so concurrent first callers trigger a single load.
//! Failed loads are not cached.

use std::sync::{Arc, Mutex, OnceLock};

use crate::backend::{default_device, InferenceBackend};
use crate::config::AppConfig;
use crate::inference::{BurnEngine, InferenceEngine, Predictor};
use crate::labels::{ClassIndex, LabelRegistry};
use crate::utils::error::{OncoDataError, Result};

/// Initialize-once cell with fallible initialization
struct LoadOnce<T> {
    cell: OnceLock<T>,
    init_lock: Mutex<()>,
}

impl<T: Clone> LoadOnce<T> {
    fn new() -> Self {
        Self {
            cell: OnceLock::new(),
            init_lock: Mutex::new(()),
        }
    }

    fn get_or_try_init<F>(&self, init: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.cell.get() {
            return Ok(value.clone());
        }

        let _guard = self
            .init_lock
            .lock()
            .map_err(|_| OncoDataError::Configuration("resource init lock poisoned".to_string()))?;

        // Another caller may have finished loading while we waited
        if let Some(value) = self.cell.get() {
            return Ok(value.clone());
        }

        let value = init()?;
        let _ = self.cell.set(value.clone());
        Ok(value)
    }

    fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Shared, lazily loaded serving resources
pub struct Resources {
    config: AppConfig,
    class_index: LoadOnce<Arc<ClassIndex>>,
    engine: LoadOnce<Arc<dyn InferenceEngine>>,
    predictor: LoadOnce<Arc<Predictor>>,
}

impl Resources {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            class_index: LoadOnce::new(),
            engine: LoadOnce::new(),
            predictor: LoadOnce::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Class mapping, loaded on first use
    pub fn class_index(&self) -> Result<Arc<ClassIndex>> {
        self.class_index.get_or_try_init(|| {
            tracing::info!(
                "Loading class index from {}",
                self.config.class_index_path.display()
            );
            ClassIndex::load(&self.config.class_index_path).map(Arc::new)
        })
    }

    /// Inference engine, loaded on first use
    pub fn engine(&self) -> Result<Arc<dyn InferenceEngine>> {
        self.engine.get_or_try_init(|| {
            let engine =
                BurnEngine::<InferenceBackend>::load(&self.config.model_dir, &default_device())?;
            Ok(Arc::new(engine) as Arc<dyn InferenceEngine>)
        })
    }

    /// Predictor over the cached engine and class mapping
    pub fn predictor(&self) -> Result<Arc<Predictor>> {
        self.predictor.get_or_try_init(|| {
            let predictor =
                Predictor::new(self.engine()?, self.class_index()?, LabelRegistry::reference())?;
            Ok(Arc::new(predictor))
        })
    }

    /// Install a pre-built engine instead of loading one from `model_dir`.
    /// Fails once an engine has already been loaded or installed.
    pub fn with_engine(self, engine: Arc<dyn InferenceEngine>) -> Result<Self> {
        if self.engine.cell.set(engine).is_err() {
            return Err(OncoDataError::Configuration(
                "inference engine already loaded".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn is_loaded(&self) -> bool {
        self.predictor.is_loaded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DefaultBackend;
    use crate::inference::engine::test_support::FixedEngine;
    use crate::inference::save_artifact;
    use crate::model::CancerClassifierConfig;
    use tempfile::TempDir;

    fn config_in(dir: &std::path::Path) -> AppConfig {
        AppConfig {
            model_dir: dir.join("model"),
            class_index_path: dir.join("label_encoder.json"),
            ..AppConfig::default()
        }
    }

    fn write_model(dir: &std::path::Path, num_classes: usize) {
        let device = Default::default();
        let config = CancerClassifierConfig::new()
            .with_num_classes(num_classes)
            .with_base_filters(4)
            .with_hidden_units(8);
        let model = config.init::<DefaultBackend>(&device);
        save_artifact(model, &config, &dir.join("model")).unwrap();
    }

    #[test]
    fn test_injected_engine_skips_model_dir() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        ClassIndex::from_ordered(["lung_aca", "lung_bnt", "lung_scc"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();

        let resources = Resources::new(config)
            .with_engine(Arc::new(FixedEngine::new(vec![0.1, 0.7, 0.2])))
            .unwrap();
        let predictor = resources.predictor().unwrap();
        assert!(resources.is_loaded());

        let result = predictor.interpret(&[0.1, 0.7, 0.2]).unwrap();
        assert_eq!(result.class_key, "lung_bnt");
    }

    #[test]
    fn test_engine_cannot_be_replaced() {
        let resources = Resources::new(AppConfig::default())
            .with_engine(Arc::new(FixedEngine::new(vec![1.0])))
            .unwrap();

        let err = resources
            .with_engine(Arc::new(FixedEngine::new(vec![0.5, 0.5])))
            .err()
            .unwrap();
        assert!(matches!(err, OncoDataError::Configuration(_)));
    }

    #[test]
    fn test_class_index_cached() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        ClassIndex::from_ordered(["a", "b"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();

        let resources = Resources::new(config.clone());
        let first = resources.class_index().unwrap();

        // Later file changes are not observed
        std::fs::remove_file(&config.class_index_path).unwrap();
        let second = resources.class_index().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_failed_load_not_cached() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        let resources = Resources::new(config.clone());

        assert!(resources.class_index().is_err());

        ClassIndex::from_ordered(["a"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();
        assert_eq!(resources.class_index().unwrap().len(), 1);
    }

    #[test]
    fn test_predictor_end_to_end() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        write_model(dir.path(), 3);
        ClassIndex::from_ordered(["lung_aca", "lung_bnt", "lung_scc"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();

        let resources = Resources::new(config);
        assert!(!resources.is_loaded());
        let predictor = resources.predictor().unwrap();
        assert!(resources.is_loaded());
        assert!(Arc::ptr_eq(&predictor, &resources.predictor().unwrap()));
        assert_eq!(predictor.classes().len(), 3);
    }

    #[test]
    fn test_mismatched_model_and_mapping_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        write_model(dir.path(), 4);
        ClassIndex::from_ordered(["a", "b"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();

        let err = Resources::new(config).predictor().unwrap_err();
        assert!(matches!(err, OncoDataError::Configuration(_)));
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        ClassIndex::from_ordered(["a"])
            .unwrap()
            .save(&config.class_index_path)
            .unwrap();

        let err = Resources::new(config).predictor().unwrap_err();
        assert!(matches!(err, OncoDataError::ModelLoad(_)));
        assert!(err.is_fatal());
    }
}
