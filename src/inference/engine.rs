//! Inference Engine
//!
//! Wraps a pre-trained classifier loaded once from an artifact directory:
//!
//! ```text
//! <artifact_dir>/
//! ├── config.json   CancerClassifierConfig
//! └── model.mpk     Burn CompactRecorder record
//! ```
//!
//! The engine only runs forward passes on single-image batches.

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use burn::{
    config::Config,
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor, TensorData},
};

use crate::inference::preprocess::ImageTensor;
use crate::model::{CancerClassifier, CancerClassifierConfig, CONFIG_FILE, WEIGHTS_FILE};
use crate::utils::error::{OncoDataError, Result};
use crate::IMAGE_SIZE;

/// Forward-pass seam between the predictor and a concrete model runtime
pub trait InferenceEngine: Send + Sync {
    /// Length of the probability vector returned by [`predict`](Self::predict)
    fn num_classes(&self) -> usize;

    /// Square input edge the engine expects
    fn input_size(&self) -> usize;

    /// Run one forward pass, returning softmax probabilities
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;
}

/// Engine backed by a Burn [`CancerClassifier`]
pub struct BurnEngine<B: Backend> {
    // Burn modules are Send but not guaranteed Sync; forward passes are serialized.
    model: Mutex<CancerClassifier<B>>,
    config: CancerClassifierConfig,
    device: B::Device,
}

impl<B: Backend> BurnEngine<B> {
    /// Wrap an already-built model
    pub fn from_model(
        model: CancerClassifier<B>,
        config: CancerClassifierConfig,
        device: B::Device,
    ) -> Self {
        Self {
            model: Mutex::new(model),
            config,
            device,
        }
    }

    /// Load config and weights from an artifact directory
    pub fn load(artifact_dir: &Path, device: &B::Device) -> Result<Self> {
        if !artifact_dir.is_dir() {
            return Err(OncoDataError::ModelLoad(format!(
                "model directory not found: {}",
                artifact_dir.display()
            )));
        }

        let config_path = artifact_dir.join(CONFIG_FILE);
        let config = CancerClassifierConfig::load(&config_path).map_err(|e| {
            OncoDataError::ModelLoad(format!(
                "cannot read model config {}: {}",
                config_path.display(),
                e
            ))
        })?;
        config
            .validate()
            .map_err(|e| OncoDataError::ModelLoad(format!("incompatible model config: {}", e)))?;
        if config.input_size != IMAGE_SIZE {
            return Err(OncoDataError::ModelLoad(format!(
                "model expects {size}x{size} input, images are resized to {target}x{target}",
                size = config.input_size,
                target = IMAGE_SIZE
            )));
        }

        let weights_path = artifact_dir.join(WEIGHTS_FILE);
        let started = Instant::now();
        let model = config
            .init::<B>(device)
            .load_file(weights_path.clone(), &CompactRecorder::new(), device)
            .map_err(|e| {
                OncoDataError::ModelLoad(format!(
                    "cannot load weights {}: {:?}",
                    weights_path.display(),
                    e
                ))
            })?;

        tracing::info!(
            "Loaded model from {} ({} classes, {}x{} input) in {:.1} ms",
            artifact_dir.display(),
            config.num_classes,
            config.input_size,
            config.input_size,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self::from_model(model, config, device.clone()))
    }

    pub fn config(&self) -> &CancerClassifierConfig {
        &self.config
    }
}

impl<B: Backend> InferenceEngine for BurnEngine<B> {
    fn num_classes(&self) -> usize {
        self.config.num_classes
    }

    fn input_size(&self) -> usize {
        self.config.input_size
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
        let [batch, height, width, channels] = input.shape();
        let size = self.config.input_size;
        if batch != 1 || height != size || width != size || channels != self.config.in_channels {
            return Err(OncoDataError::Inference(format!(
                "expected input [1, {size}, {size}, {}], got {:?}",
                self.config.in_channels,
                input.shape()
            )));
        }

        // NHWC from the preprocessor -> NCHW for Conv2d
        let data = TensorData::new(input.as_slice().to_vec(), input.shape());
        let tensor = Tensor::<B, 4>::from_data(data, &self.device).permute([0, 3, 1, 2]);

        let model = self
            .model
            .lock()
            .map_err(|_| OncoDataError::Inference("model lock poisoned".to_string()))?;
        let output = model.forward_softmax(tensor);
        drop(model);

        let probs: Vec<f32> = output
            .into_data()
            .to_vec()
            .map_err(|e| OncoDataError::Inference(format!("cannot read probabilities: {:?}", e)))?;

        Ok(probs)
    }
}

/// Write a model into the artifact layout read by [`BurnEngine::load`]
pub fn save_artifact<B: Backend>(
    model: CancerClassifier<B>,
    config: &CancerClassifierConfig,
    artifact_dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(artifact_dir)?;
    config.save(artifact_dir.join(CONFIG_FILE))?;
    model
        .save_file(artifact_dir.join(WEIGHTS_FILE), &CompactRecorder::new())
        .map_err(|e| OncoDataError::Serialization(format!("cannot save weights: {:?}", e)))?;
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Engine returning a fixed probability vector for any correctly sized input
    pub struct FixedEngine {
        probs: Vec<f32>,
        input_size: usize,
    }

    impl FixedEngine {
        pub fn new(probs: Vec<f32>) -> Self {
            Self {
                probs,
                input_size: IMAGE_SIZE,
            }
        }

        pub fn with_input_size(mut self, input_size: usize) -> Self {
            self.input_size = input_size;
            self
        }
    }

    impl InferenceEngine for FixedEngine {
        fn num_classes(&self) -> usize {
            self.probs.len()
        }

        fn input_size(&self) -> usize {
            self.input_size
        }

        fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
            let size = self.input_size;
            assert_eq!(input.shape(), [1, size, size, 3]);
            Ok(self.probs.clone())
        }
    }
}
