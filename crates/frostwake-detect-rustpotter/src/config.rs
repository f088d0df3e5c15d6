use serde::{Deserialize, Serialize};

/// Knobs that have no counterpart in the shared detector configuration.
/// The score threshold itself comes from the configured sensitivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RustpotterEngineConfig {
    /// Averaged-score pre-filter; 0.0 disables it
    pub avg_threshold: f32,
    /// Band-pass pre-filter inside rustpotter
    pub band_pass: bool,
}

impl Default for RustpotterEngineConfig {
    fn default() -> Self {
        Self {
            avg_threshold: 0.0,
            band_pass: false,
        }
    }
}
