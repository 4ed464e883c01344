//! Label module for class keys and their display metadata
//!
//! This module provides:
//! - The static label registry (display names and descriptions)
//! - The class index resolver mapping model outputs to class keys

pub mod class_index;
pub mod registry;

// Re-export main types for convenience
pub use class_index::ClassIndex;
pub use registry::{title_case_key, LabelEntry, LabelRegistry, NO_DESCRIPTION, REFERENCE_LABELS};
