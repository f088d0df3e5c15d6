pub mod config;
pub mod constants;
pub mod energy;
pub mod engine;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use config::{parse_sensitivities, DetectorConfig, EnergyConfig, EngineKind};
pub use constants::{
    BITS_PER_SAMPLE, CHANNELS_MONO, FRAME_DURATION_MS, FRAME_SIZE_SAMPLES, SAMPLE_RATE_HZ,
};
pub use energy::EnergyEngine;
pub use engine::HotwordEngine;
pub use types::{Detection, HotwordEvent};
