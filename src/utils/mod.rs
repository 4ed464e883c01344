//! Utilities module for logging, error types and formatting helpers
//!
//! This module provides:
//! - Structured logging with tracing
//! - The crate error type
//! - Small formatting helpers shared by the CLI and result cards

pub mod error;
pub mod logging;

// Re-export main types for convenience
pub use error::{OncoDataError, Result};
pub use logging::init_logging;

/// Format a probability in [0, 1] as a percentage with two decimals
pub fn format_confidence(probability: f32) -> String {
    format!("{:.2}%", probability * 100.0)
}

/// Format a percentage with a progress bar
pub fn format_progress_bar(progress: f64, width: usize) -> String {
    let progress = progress.clamp(0.0, 1.0);
    let filled = (progress * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    format!(
        "[{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        progress * 100.0
    )
}
