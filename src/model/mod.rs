//! Model module for the CNN architecture using the Burn framework
//!
//! This module provides:
//! - The classifier architecture that stored weights load into
//! - Its Burn `Config`, persisted as `config.json` next to the record

pub mod cnn;

// Re-export main types for convenience
pub use cnn::{CancerClassifier, CancerClassifierConfig};

/// File name of the architecture config inside a model artifact directory
pub const CONFIG_FILE: &str = "config.json";

/// File stem of the weight record inside a model artifact directory
pub const WEIGHTS_FILE: &str = "model";
