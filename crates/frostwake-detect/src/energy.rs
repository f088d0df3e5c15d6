//! Deterministic energy-threshold reference engine.
//!
//! Stands in for a trained detector wherever one is not available: model
//! files are presence-checked at construction, sensitivity maps onto a dBFS
//! trigger threshold per model, and a short debounce plus refractory window
//! turns a sustained loud burst into exactly one detection. Useful for
//! exercising the adapters and for tests that need scripted-free but
//! predictable classifications.

use std::path::Path;

use crate::config::{parse_sensitivities, DetectorConfig, EnergyConfig};
use crate::constants::{BITS_PER_SAMPLE, CHANNELS_MONO, SAMPLE_RATE_HZ};
use crate::engine::HotwordEngine;
use crate::types::Detection;

#[derive(Debug)]
pub struct EnergyEngine {
    cfg: EnergyConfig,
    thresholds_dbfs: Vec<f32>,
    gain: f32,
    frontend: bool,
    hold: u32,
    refractory: u32,
}

impl EnergyEngine {
    pub fn new(config: &DetectorConfig) -> Result<Self, String> {
        Self::with_energy_config(config, EnergyConfig::default())
    }

    pub fn with_energy_config(
        config: &DetectorConfig,
        cfg: EnergyConfig,
    ) -> Result<Self, String> {
        if !Path::new(&config.resource).is_file() {
            return Err(format!("resource file not found: {}", config.resource));
        }

        let models = config.model_paths();
        if models.is_empty() {
            return Err("no model files configured".to_string());
        }
        for model in &models {
            if !Path::new(model).is_file() {
                return Err(format!("model file not found: {}", model));
            }
        }

        let mut engine = Self {
            cfg,
            thresholds_dbfs: vec![0.0; models.len()],
            gain: 1.0,
            frontend: false,
            hold: 0,
            refractory: 0,
        };
        engine.set_sensitivity(&config.sensitivity);
        engine.set_audio_gain(config.audio_gain);
        engine.apply_frontend(config.apply_frontend);

        tracing::debug!(
            models = models.len(),
            resource = %config.resource,
            "energy engine ready"
        );
        Ok(engine)
    }

    /// Best-matching model for a frame level: the highest threshold still
    /// exceeded, ties resolving to the lowest index.
    fn best_match(&self, dbfs: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &threshold) in self.thresholds_dbfs.iter().enumerate() {
            if dbfs >= threshold && best.map_or(true, |(_, t)| threshold > t) {
                best = Some((i, threshold));
            }
        }
        best.map(|(i, _)| i)
    }

    fn frame_dbfs(&self, frame: &[i16]) -> f32 {
        // Front-end preprocessing here is plain DC removal
        let dc = if self.frontend {
            frame.iter().map(|&s| s as f64).sum::<f64>() / frame.len() as f64
        } else {
            0.0
        };

        let sum_squares: f64 = frame
            .iter()
            .map(|&s| {
                let v = (s as f64 - dc) * self.gain as f64;
                v * v
            })
            .sum();

        let rms = (sum_squares / frame.len() as f64).sqrt() / 32768.0;
        if rms <= 1e-10 {
            return -100.0;
        }
        20.0 * (rms.log10() as f32)
    }
}

impl HotwordEngine for EnergyEngine {
    fn run_detection(&mut self, frame: &[i16]) -> Detection {
        if frame.is_empty() {
            return Detection::Error;
        }

        let dbfs = self.frame_dbfs(frame);

        if self.refractory > 0 {
            self.refractory -= 1;
            self.hold = 0;
            return if dbfs <= self.cfg.silence_floor_dbfs {
                Detection::Silence
            } else {
                Detection::Noise
            };
        }

        if dbfs <= self.cfg.silence_floor_dbfs {
            self.hold = 0;
            return Detection::Silence;
        }

        match self.best_match(dbfs) {
            Some(index) => {
                self.hold += 1;
                if self.hold >= self.cfg.hold_frames {
                    self.hold = 0;
                    self.refractory = self.cfg.refractory_frames;
                    Detection::Hotword(index as u32 + 1)
                } else {
                    Detection::Noise
                }
            }
            None => {
                self.hold = 0;
                Detection::Noise
            }
        }
    }

    fn set_sensitivity(&mut self, sensitivity: &str) {
        let sensitivities = parse_sensitivities(sensitivity, self.thresholds_dbfs.len());
        for (threshold, s) in self.thresholds_dbfs.iter_mut().zip(sensitivities) {
            *threshold = self.cfg.threshold_for_sensitivity(s);
        }
    }

    fn set_audio_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn apply_frontend(&mut self, enabled: bool) {
        self.frontend = enabled;
    }

    fn reset(&mut self) {
        self.hold = 0;
        self.refractory = 0;
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
        self.thresholds_dbfs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn fixture(models: usize) -> (TempDir, DetectorConfig) {
        let dir = TempDir::new().unwrap();
        let resource = dir.path().join("common.res");
        fs::write(&resource, b"res").unwrap();

        let mut paths = Vec::new();
        for i in 0..models {
            let model = dir.path().join(format!("model{}.fwm", i));
            fs::write(&model, b"model").unwrap();
            paths.push(model.to_string_lossy().to_string());
        }

        let config = DetectorConfig {
            resource: resource.to_string_lossy().to_string(),
            models: paths.join(","),
            ..Default::default()
        };
        (dir, config)
    }

    fn frame(amplitude: i16) -> Vec<i16> {
        vec![amplitude; 2000]
    }

    #[test]
    fn missing_resource_fails_construction() {
        let (_dir, mut config) = fixture(1);
        config.resource = "/nonexistent/common.res".to_string();
        let err = EnergyEngine::new(&config).unwrap_err();
        assert!(err.contains("resource file not found"), "{err}");
    }

    #[test]
    fn missing_model_fails_construction() {
        let (_dir, mut config) = fixture(1);
        config.models = "/nonexistent/model.fwm".to_string();
        let err = EnergyEngine::new(&config).unwrap_err();
        assert!(err.contains("model file not found"), "{err}");
    }

    #[test]
    fn empty_model_list_fails_construction() {
        let (_dir, mut config) = fixture(1);
        config.models = " , ".to_string();
        assert!(EnergyEngine::new(&config).is_err());
    }

    #[test]
    fn silence_classifies_as_silence() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.run_detection(&frame(0)), Detection::Silence);
        }
    }

    #[test]
    fn moderate_level_classifies_as_noise() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();
        // ~-38 dBFS: above the silence floor, below the default -30 threshold
        for _ in 0..10 {
            assert_eq!(engine.run_detection(&frame(400)), Detection::Noise);
        }
    }

    #[test]
    fn empty_frame_classifies_as_error() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();
        assert_eq!(engine.run_detection(&[]), Detection::Error);
    }

    #[test]
    fn sustained_loud_burst_fires_once() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();

        // Default hold is 2 frames: first loud frame is still noise
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Noise);
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Hotword(1));

        // Refractory window keeps the same burst from re-firing
        for _ in 0..EnergyConfig::default().refractory_frames {
            assert_eq!(engine.run_detection(&frame(8000)), Detection::Noise);
        }
    }

    #[test]
    fn burst_refires_after_refractory() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();

        engine.run_detection(&frame(8000));
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Hotword(1));
        for _ in 0..EnergyConfig::default().refractory_frames {
            engine.run_detection(&frame(8000));
        }
        engine.run_detection(&frame(8000));
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Hotword(1));
    }

    #[test]
    fn most_permissive_model_wins_at_low_level() {
        let (_dir, mut config) = fixture(2);
        // Model 1 strict (threshold -14 dBFS), model 2 permissive (-46 dBFS)
        config.sensitivity = "0.1,0.9".to_string();
        let mut engine = EnergyEngine::new(&config).unwrap();

        // ~-20 dBFS exceeds only model 2's threshold
        engine.run_detection(&frame(3200));
        assert_eq!(engine.run_detection(&frame(3200)), Detection::Hotword(2));
    }

    #[test]
    fn strictest_exceeded_model_wins_at_high_level() {
        let (_dir, mut config) = fixture(2);
        config.sensitivity = "0.1,0.9".to_string();
        let mut engine = EnergyEngine::new(&config).unwrap();

        // ~-12 dBFS exceeds both thresholds; the higher one is the match
        engine.run_detection(&frame(8000));
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Hotword(1));
    }

    #[test]
    fn zero_gain_mutes_input() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();
        engine.set_audio_gain(0.0);
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Silence);
    }

    #[test]
    fn frontend_removes_dc_offset() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();

        engine.apply_frontend(true);
        // Pure DC: nothing left after the front end
        assert_eq!(engine.run_detection(&frame(5000)), Detection::Silence);

        engine.apply_frontend(false);
        engine.reset();
        assert_ne!(engine.run_detection(&frame(5000)), Detection::Silence);
    }

    #[test]
    fn reset_clears_debounce_state() {
        let (_dir, config) = fixture(1);
        let mut engine = EnergyEngine::new(&config).unwrap();

        engine.run_detection(&frame(8000));
        engine.reset();
        // Hold starts over after reset
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Noise);
        assert_eq!(engine.run_detection(&frame(8000)), Detection::Hotword(1));
    }

    #[test]
    fn reports_fixed_format() {
        let (_dir, config) = fixture(3);
        let engine = EnergyEngine::new(&config).unwrap();
        assert_eq!(engine.sample_rate(), 16_000);
        assert_eq!(engine.num_channels(), 1);
        assert_eq!(engine.bits_per_sample(), 16);
        assert_eq!(engine.num_hotwords(), 3);
    }
}
