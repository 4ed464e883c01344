//! Inference module for single-image classification
//!
//! This module provides:
//! - Deterministic preprocessing from upload bytes to the model tensor
//! - The inference engine seam and its Burn implementation
//! - The predictor tying preprocessing, forward pass and labels together
//!
//! ## Pipeline
//!
//! ```text
//! bytes -> Preprocessor -> ImageTensor [1,128,128,3]
//!       -> InferenceEngine::predict -> probabilities [N]
//!       -> argmax -> ClassIndex -> LabelRegistry -> PredictionResult
//! ```

pub mod engine;
pub mod predictor;
pub mod preprocess;

// Re-export main types for convenience
pub use engine::{save_artifact, BurnEngine, InferenceEngine};
pub use predictor::{argmax, ClassScore, PredictionResult, Predictor, TOP_K};
pub use preprocess::{ImageTensor, Preprocessor};
