use crate::types::Detection;

/// A trait for hotword detection engines.
///
/// This is the construct/configure/push-frames contract shared by embedded
/// detectors: build from resource and model files, tune sensitivity and
/// gain, then feed 16-bit mono PCM frames and read back a classification
/// code per frame. Adapters own exactly one engine and never call it from
/// two threads at once.
pub trait HotwordEngine: Send {
    /// Classify one frame of samples. Synchronous, no blocking beyond the
    /// computation itself.
    fn run_detection(&mut self, frame: &[i16]) -> Detection;

    /// Comma-joined per-model thresholds, one float per loaded model.
    /// Unparseable entries fall back to the engine default.
    fn set_sensitivity(&mut self, sensitivity: &str);

    /// Multiplier applied to input samples before scoring.
    fn set_audio_gain(&mut self, gain: f32);

    /// Toggle the engine's optional front-end preprocessing.
    fn apply_frontend(&mut self, enabled: bool);

    /// Return the engine to its initial state.
    fn reset(&mut self);

    fn sample_rate(&self) -> u32;
    fn num_channels(&self) -> u16;
    fn bits_per_sample(&self) -> u16;

    /// Number of loaded hotword models.
    fn num_hotwords(&self) -> usize;
}

impl std::fmt::Debug for dyn HotwordEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotwordEngine")
            .field("num_hotwords", &self.num_hotwords())
            .finish()
    }
}
