//! # OncoData
//!
//! Cancer-type classification of medical images using the Burn framework.
//!
//! ## Features
//!
//! - **Deterministic preprocessing**: decode, RGB, 128x128 stretch resize, [0, 1] scaling
//! - **Pre-trained CNN** loaded once from a Burn record and shared read-only
//! - **Label registry** with display names and descriptions for 26 tissue classes
//! - **Upload server** and CLI around a single `classify` operation
//!
//! ## Modules
//!
//! - `labels`: Label registry and class index resolver
//! - `model`: CNN architecture the stored weights load into
//! - `inference`: Preprocessing, inference engine and predictor
//! - `resources`: Load-once access to the model and class mapping
//! - `session`: Page navigation state
//! - `server`: HTTP upload API
//! - `utils`: Logging, errors and formatting helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use oncodata::{AppConfig, Resources};
//!
//! let resources = Resources::new(AppConfig::default());
//! let predictor = resources.predictor()?;
//! let result = predictor.classify(&std::fs::read("scan.png")?)?;
//! println!("{}", result.display());
//! ```

pub mod backend;
pub mod config;
pub mod inference;
pub mod labels;
pub mod model;
pub mod resources;
pub mod server;
pub mod session;
pub mod utils;

// Re-export commonly used items for convenience
pub use config::AppConfig;
pub use inference::{
    BurnEngine, ClassScore, ImageTensor, InferenceEngine, PredictionResult, Predictor,
    Preprocessor,
};
pub use labels::{ClassIndex, LabelEntry, LabelRegistry};
pub use model::{CancerClassifier, CancerClassifierConfig};
pub use resources::Resources;
pub use session::{Page, Session};
pub use utils::error::{OncoDataError, Result};

/// Model input edge in pixels (images are stretched to IMAGE_SIZE x IMAGE_SIZE)
pub const IMAGE_SIZE: usize = 128;

/// File extensions accepted for upload
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Whether a path has one of the [`SUPPORTED_EXTENSIONS`] (case-insensitive)
pub fn is_supported_image(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("scan.PNG")));
        assert!(is_supported_image(Path::new("a/b/slide.tiff")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }
}
