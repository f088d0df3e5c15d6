use serde::{Deserialize, Serialize};

/// Fallback per-model sensitivity when the configured string has no entry
/// for a model or the entry does not parse.
pub const DEFAULT_SENSITIVITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineKind {
    /// Deterministic energy-threshold reference engine
    Energy,
    /// Wakeword models via the rustpotter crate (feature-gated)
    Rustpotter,
}

impl Default for EngineKind {
    fn default() -> Self {
        Self::Energy
    }
}

/// Construction-time detector configuration.
///
/// Changing `resource` or `models` after an engine has been built does not
/// reconfigure the live engine; the new paths take effect on the next
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Shared acoustic-resource file required regardless of models
    pub resource: String,
    /// Comma-separated hotword model file path(s)
    pub models: String,
    /// Comma-separated floating point value per model
    pub sensitivity: String,
    /// Input gain at the detector, [0.0, 1.0]
    pub audio_gain: f32,
    /// Optional front-end preprocessing inside the engine
    pub apply_frontend: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            resource: "resources/common.res".to_string(),
            models: "resources/models/default.fwm".to_string(),
            sensitivity: "0.5".to_string(),
            audio_gain: 1.0,
            apply_frontend: false,
        }
    }
}

impl DetectorConfig {
    pub fn model_paths(&self) -> Vec<String> {
        self.models
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// One sensitivity per model, padded with the default where the
    /// configured string is short or an entry fails to parse.
    pub fn sensitivities(&self, num_models: usize) -> Vec<f32> {
        parse_sensitivities(&self.sensitivity, num_models)
    }
}

/// Parse a comma-joined sensitivity string into one value per model,
/// falling back to [`DEFAULT_SENSITIVITY`] for missing or bad entries.
pub fn parse_sensitivities(sensitivity: &str, num_models: usize) -> Vec<f32> {
    let parsed: Vec<Option<f32>> = sensitivity
        .split(',')
        .map(|s| s.trim().parse::<f32>().ok())
        .collect();

    (0..num_models)
        .map(|i| {
            parsed
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(DEFAULT_SENSITIVITY)
        })
        .collect()
}

/// Tuning for the energy reference engine.
///
/// A model's sensitivity s in [0,1] maps onto a trigger threshold of
/// `trigger_ceiling_dbfs - s * trigger_range_db`, so higher sensitivity
/// means a lower (more permissive) threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Frames at or below this level classify as silence
    pub silence_floor_dbfs: f32,
    /// Trigger threshold at sensitivity 0.0
    pub trigger_ceiling_dbfs: f32,
    /// Threshold span covered by the sensitivity range
    pub trigger_range_db: f32,
    /// Consecutive frames above a model threshold before firing
    pub hold_frames: u32,
    /// Frames suppressed after a detection so one burst fires once
    pub refractory_frames: u32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            silence_floor_dbfs: -60.0,
            trigger_ceiling_dbfs: -10.0,
            trigger_range_db: 40.0,
            hold_frames: 2,
            refractory_frames: 8,
        }
    }
}

impl EnergyConfig {
    pub fn threshold_for_sensitivity(&self, sensitivity: f32) -> f32 {
        let s = sensitivity.clamp(0.0, 1.0);
        self.trigger_ceiling_dbfs - s * self.trigger_range_db
    }
}
