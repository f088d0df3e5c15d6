//! Engine-level behavior tests
//!
//! Tests cover:
//! - Detection code convention (-2/-1/0/n) and label mapping
//! - Energy engine classification across silence/noise/hotword levels
//! - Multi-model sensitivity resolution
//! - Construction failure on missing resource/model files

use std::fs;

use frostwake_detect::constants::FRAME_SIZE_SAMPLES;
use frostwake_detect::{Detection, DetectorConfig, EnergyEngine, HotwordEngine};
use rand::Rng;
use tempfile::TempDir;

fn fixture_config(dir: &TempDir, num_models: usize) -> DetectorConfig {
    let resource = dir.path().join("common.res");
    fs::write(&resource, b"resource").unwrap();

    let mut models = Vec::new();
    for i in 0..num_models {
        let path = dir.path().join(format!("word{}.fwm", i));
        fs::write(&path, b"model").unwrap();
        models.push(path.to_string_lossy().to_string());
    }

    DetectorConfig {
        resource: resource.to_string_lossy().to_string(),
        models: models.join(","),
        ..Default::default()
    }
}

fn constant_frame(amplitude: i16) -> Vec<i16> {
    vec![amplitude; FRAME_SIZE_SAMPLES]
}

#[test]
fn code_mapping_covers_all_states() {
    assert_eq!(Detection::from_code(-2).label(), "silence");
    assert_eq!(Detection::from_code(-1).label(), "error");
    assert_eq!(Detection::from_code(0).label(), "noise");
    for code in 1..=8 {
        assert_eq!(Detection::from_code(code).label(), "hotword");
        assert_eq!(Detection::from_code(code).model_index(), Some(code as u32 - 1));
    }
}

#[test]
fn engine_walks_silence_noise_hotword_ladder() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, 1);
    let mut engine = EnergyEngine::new(&config).unwrap();

    assert_eq!(engine.run_detection(&constant_frame(0)), Detection::Silence);
    assert_eq!(engine.run_detection(&constant_frame(400)), Detection::Noise);

    // Loud frames must persist through the debounce before firing
    let mut saw_hotword = false;
    for _ in 0..4 {
        if engine.run_detection(&constant_frame(8000)) == Detection::Hotword(1) {
            saw_hotword = true;
            break;
        }
    }
    assert!(saw_hotword, "sustained loud input should fire model 1");
}

#[test]
fn random_noise_floor_never_fires() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, 1);
    let mut engine = EnergyEngine::new(&config).unwrap();

    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let frame: Vec<i16> = (0..FRAME_SIZE_SAMPLES)
            .map(|_| rng.gen_range(-200..=200))
            .collect();
        let detection = engine.run_detection(&frame);
        assert!(
            matches!(detection, Detection::Silence | Detection::Noise),
            "low-level noise must not fire: {:?}",
            detection
        );
    }
}

#[test]
fn per_model_sensitivities_select_the_right_index() {
    let dir = TempDir::new().unwrap();
    let mut config = fixture_config(&dir, 3);
    config.sensitivity = "0.1,0.5,0.9".to_string();
    let mut engine = EnergyEngine::new(&config).unwrap();
    assert_eq!(engine.num_hotwords(), 3);

    // ~-20 dBFS: only the 0.9-sensitivity model (threshold -46) is exceeded
    engine.run_detection(&constant_frame(3200));
    assert_eq!(engine.run_detection(&constant_frame(3200)), Detection::Hotword(3));
}

#[test]
fn construction_fails_fast_on_bad_paths() {
    let dir = TempDir::new().unwrap();
    let mut config = fixture_config(&dir, 1);
    config.models = format!("{},{}", config.models, "/missing/extra.fwm");
    assert!(EnergyEngine::new(&config).is_err());

    let mut config = fixture_config(&dir, 1);
    config.resource = "/missing/common.res".to_string();
    assert!(EnergyEngine::new(&config).is_err());
}

#[test]
fn sensitivity_reconfiguration_applies_to_live_engine() {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, 1);
    let mut engine = EnergyEngine::new(&config).unwrap();

    // ~-38 dBFS is below the default 0.5 threshold...
    assert_eq!(engine.run_detection(&constant_frame(400)), Detection::Noise);
    assert_eq!(engine.run_detection(&constant_frame(400)), Detection::Noise);

    // ...but above the 0.9 threshold once reconfigured
    engine.set_sensitivity("0.9");
    engine.reset();
    engine.run_detection(&constant_frame(400));
    assert_eq!(engine.run_detection(&constant_frame(400)), Detection::Hotword(1));
}
