//! Inference Predictor Module
//!
//! Composes preprocessing, the forward pass, argmax and label lookup into
//! a single `classify` call.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::inference::engine::InferenceEngine;
use crate::inference::preprocess::Preprocessor;
use crate::labels::{ClassIndex, LabelRegistry};
use crate::utils::error::{OncoDataError, Result};
use crate::utils::{format_confidence, format_progress_bar};

/// Number of ranked classes kept in a result
pub const TOP_K: usize = 5;

/// Index of the first maximum, ignoring NaN entries
///
/// NaN scores are skipped rather than winning, unlike numpy's `argmax`, which
/// returns the first NaN index. Only a degenerate model produces NaN here.
pub fn argmax(probs: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &p) in probs.iter().enumerate() {
        if p.is_nan() {
            continue;
        }
        match best {
            Some((_, best_p)) if p <= best_p => {}
            _ => best = Some((i, p)),
        }
    }
    best.map(|(i, _)| i)
}

/// One ranked class in a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassScore {
    pub class_index: usize,
    pub class_key: String,
    pub display_name: String,
    pub probability: f32,
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted class key, e.g. `"lung_bnt"`
    pub class_key: String,

    /// Position of the class in the model output
    pub class_index: usize,

    /// Registry display name, or the title-cased key
    pub display_name: String,

    /// Registry description, or the placeholder text
    pub description: String,

    /// Probability of the predicted class
    pub confidence: f32,

    /// Highest-probability classes, best first
    pub top_k: Vec<ClassScore>,
}

impl PredictionResult {
    /// Confidence as a percentage string, e.g. `"70.00%"`
    pub fn confidence_percent(&self) -> String {
        format_confidence(self.confidence)
    }

    /// Pretty print the prediction result
    pub fn display(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Label: {} ({})\n",
            self.display_name, self.class_key
        ));
        output.push_str(&format!("Confidence: {}\n", self.confidence_percent()));
        output.push_str(&format!(
            "{}\n",
            format_progress_bar(self.confidence as f64, 30)
        ));
        output.push_str(&format!("{}\n", self.description));

        if self.top_k.len() > 1 {
            output.push_str(&format!("\nTop-{} predictions:\n", self.top_k.len()));
            for (i, score) in self.top_k.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. {} ({}) - {}\n",
                    i + 1,
                    score.display_name,
                    score.class_key,
                    format_confidence(score.probability)
                ));
            }
        }

        output
    }
}

/// Classifies raw image bytes with a loaded model
pub struct Predictor {
    preprocessor: Preprocessor,
    engine: Arc<dyn InferenceEngine>,
    classes: Arc<ClassIndex>,
    registry: LabelRegistry,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("preprocessor", &self.preprocessor)
            .field("num_classes", &self.classes.len())
            .field("registry_entries", &self.registry.len())
            .finish()
    }
}

impl Predictor {
    /// Build a predictor. Fails when the engine's output size and the class
    /// mapping disagree, or when the engine does not take the preprocessor's
    /// fixed input size.
    pub fn new(
        engine: Arc<dyn InferenceEngine>,
        classes: Arc<ClassIndex>,
        registry: LabelRegistry,
    ) -> Result<Self> {
        if engine.num_classes() != classes.len() {
            return Err(OncoDataError::Configuration(format!(
                "model emits {} classes but the class index lists {}",
                engine.num_classes(),
                classes.len()
            )));
        }

        let preprocessor = Preprocessor::new();
        if engine.input_size() != preprocessor.image_size as usize {
            return Err(OncoDataError::Configuration(format!(
                "model expects {}x{} input, preprocessor produces {}x{}",
                engine.input_size(),
                engine.input_size(),
                preprocessor.image_size,
                preprocessor.image_size
            )));
        }

        let unlabeled = classes
            .classes()
            .iter()
            .filter(|k| registry.lookup(k).is_none())
            .count();
        if unlabeled > 0 {
            tracing::warn!(
                "{} of {} classes have no label metadata, using fallback names",
                unlabeled,
                classes.len()
            );
        }

        Ok(Self {
            preprocessor,
            engine,
            classes,
            registry,
        })
    }

    pub fn classes(&self) -> &ClassIndex {
        &self.classes
    }

    pub fn registry(&self) -> &LabelRegistry {
        &self.registry
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    /// Classify raw image bytes
    pub fn classify(&self, bytes: &[u8]) -> Result<PredictionResult> {
        let start = Instant::now();

        let tensor = self.preprocessor.preprocess(bytes)?;
        let probs = self.engine.predict(&tensor)?;

        let result = self.interpret(&probs)?;

        tracing::info!(
            "Classified {} bytes as {} ({}) in {:.1} ms",
            bytes.len(),
            result.class_key,
            result.confidence_percent(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(result)
    }

    /// Read an image file and classify it
    pub fn classify_file(&self, path: &Path) -> Result<PredictionResult> {
        let bytes = std::fs::read(path)?;
        self.classify(&bytes)
    }

    /// Turn a probability vector into a labeled result
    pub fn interpret(&self, probs: &[f32]) -> Result<PredictionResult> {
        if probs.len() != self.classes.len() {
            return Err(OncoDataError::Inference(format!(
                "model returned {} probabilities for {} classes",
                probs.len(),
                self.classes.len()
            )));
        }

        let idx = argmax(probs).ok_or_else(|| {
            OncoDataError::Inference("probability vector has no finite entries".to_string())
        })?;
        let key = self.key_at(idx)?;

        Ok(PredictionResult {
            class_key: key.to_string(),
            class_index: idx,
            display_name: self.registry.display_name(key),
            description: self.registry.description(key).to_string(),
            confidence: probs[idx],
            top_k: self.top_k(probs, TOP_K)?,
        })
    }

    fn key_at(&self, idx: usize) -> Result<&str> {
        self.classes.key(idx).ok_or_else(|| {
            OncoDataError::Inference(format!("class index {} out of range", idx))
        })
    }

    fn top_k(&self, probs: &[f32], k: usize) -> Result<Vec<ClassScore>> {
        let mut indexed: Vec<(usize, f32)> = probs
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, p)| !p.is_nan())
            .collect();
        // Stable sort keeps the lower index first on ties, matching argmax
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

        indexed
            .into_iter()
            .take(k)
            .map(|(idx, probability)| {
                let key = self.key_at(idx)?;
                Ok(ClassScore {
                    class_index: idx,
                    class_key: key.to_string(),
                    display_name: self.registry.display_name(key),
                    probability,
                })
            })
            .collect()
    }
}
