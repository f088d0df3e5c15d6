use crate::config::RustpotterEngineConfig;
use frostwake_detect::{
    parse_sensitivities, Detection, DetectorConfig, HotwordEngine, BITS_PER_SAMPLE,
    CHANNELS_MONO, SAMPLE_RATE_HZ,
};
use rustpotter::{Rustpotter, RustpotterConfig, SampleFormat};

/// Adapts rustpotter's wakeword scoring to the [`HotwordEngine`] contract.
///
/// Rustpotter consumes fixed-size frames of its own choosing; incoming
/// samples are accumulated and drained per internal frame, so callers may
/// push buffers of any length. The detection key is the zero-based model
/// index, turned back into the 1-based hotword code.
pub struct RustpotterEngine {
    detector: Rustpotter,
    num_models: usize,
    accumulator: Vec<i16>,
    gain: f32,
}

impl RustpotterEngine {
    pub fn new(config: &DetectorConfig) -> Result<Self, String> {
        Self::with_engine_config(config, RustpotterEngineConfig::default())
    }

    pub fn with_engine_config(
        config: &DetectorConfig,
        engine_cfg: RustpotterEngineConfig,
    ) -> Result<Self, String> {
        let models = config.model_paths();
        if models.is_empty() {
            return Err("no model files configured".to_string());
        }

        // Rustpotter has a single detector-wide threshold; the first
        // configured sensitivity drives it and extra entries are ignored.
        let sensitivities = parse_sensitivities(&config.sensitivity, models.len());
        let threshold = 1.0 - sensitivities[0].clamp(0.0, 1.0);

        let mut rp_config = RustpotterConfig::default();
        rp_config.fmt.sample_rate = SAMPLE_RATE_HZ as usize;
        rp_config.fmt.channels = CHANNELS_MONO.into();
        rp_config.fmt.sample_format = SampleFormat::I16;
        rp_config.detector.threshold = threshold;
        rp_config.detector.avg_threshold = engine_cfg.avg_threshold;
        rp_config.filters.band_pass.enabled = engine_cfg.band_pass;
        // Audio gain is applied to the samples before they reach the
        // detector, so rustpotter's own normalizer stays off.
        rp_config.filters.gain_normalizer.enabled = false;

        let mut detector = Rustpotter::new(&rp_config)
            .map_err(|e| format!("failed to create rustpotter detector: {}", e))?;

        for (index, path) in models.iter().enumerate() {
            detector
                .add_wakeword_from_file(&index.to_string(), path)
                .map_err(|e| format!("failed to load wakeword model {}: {}", path, e))?;
        }

        if sensitivities.len() > 1 {
            tracing::warn!(
                "rustpotter applies a single threshold; sensitivities beyond the first are ignored"
            );
        }
        tracing::debug!(
            models = models.len(),
            threshold,
            samples_per_frame = detector.get_samples_per_frame(),
            "rustpotter engine ready"
        );

        Ok(Self {
            detector,
            num_models: models.len(),
            accumulator: Vec::new(),
            gain: config.audio_gain.clamp(0.0, 1.0),
        })
    }

    fn detection_to_code(&self, name: &str) -> Detection {
        match name.parse::<usize>() {
            Ok(index) if index < self.num_models => Detection::Hotword(index as u32 + 1),
            _ => {
                tracing::warn!(name, "detection for unknown wakeword key");
                Detection::Error
            }
        }
    }
}

impl HotwordEngine for RustpotterEngine {
    fn run_detection(&mut self, frame: &[i16]) -> Detection {
        if frame.is_empty() {
            return Detection::Error;
        }

        if self.gain == 1.0 {
            self.accumulator.extend_from_slice(frame);
        } else {
            self.accumulator.extend(frame.iter().map(|&s| {
                (s as f32 * self.gain).clamp(i16::MIN as f32, i16::MAX as f32) as i16
            }));
        }

        let frame_size = self.detector.get_samples_per_frame();
        let mut result = Detection::Noise;
        while self.accumulator.len() >= frame_size {
            let chunk: Vec<i16> = self.accumulator.drain(..frame_size).collect();
            if let Some(detection) = self.detector.process_samples(chunk) {
                result = self.detection_to_code(&detection.name);
            }
        }
        result
    }

    fn set_sensitivity(&mut self, _sensitivity: &str) {
        // Rustpotter fixes its threshold at construction; a sensitivity
        // change requires rebuilding the engine.
        tracing::debug!("sensitivity change ignored by live rustpotter engine");
    }

    fn set_audio_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn apply_frontend(&mut self, _enabled: bool) {
        // Front-end filtering is fixed at construction via FiltersConfig
    }

    fn reset(&mut self) {
        self.accumulator.clear();
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE_HZ
    }

    fn num_channels(&self) -> u16 {
        CHANNELS_MONO
    }

    fn bits_per_sample(&self) -> u16 {
        BITS_PER_SAMPLE
    }

    fn num_hotwords(&self) -> usize {
        self.num_models
    }
}
