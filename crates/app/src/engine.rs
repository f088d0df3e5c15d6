use frostwake_detect::{DetectorConfig, EnergyEngine, EngineKind, HotwordEngine};
use frostwake_filter::EngineFactory;

/// Map the selected engine kind onto a boxed engine for the adapters.
pub fn build_engine(
    kind: EngineKind,
    config: &DetectorConfig,
) -> Result<Box<dyn HotwordEngine>, String> {
    match kind {
        EngineKind::Energy => Ok(Box::new(EnergyEngine::new(config)?)),
        #[cfg(feature = "rustpotter")]
        EngineKind::Rustpotter => Ok(Box::new(
            frostwake_detect_rustpotter::RustpotterEngine::new(config)?,
        )),
        #[cfg(not(feature = "rustpotter"))]
        EngineKind::Rustpotter => Err(
            "rustpotter engine not compiled in; rebuild with the `rustpotter` feature".to_string(),
        ),
    }
}

/// Factory handed to the filter so setup can rebuild from fresh properties.
pub fn engine_factory(kind: EngineKind) -> EngineFactory {
    Box::new(move |config| build_engine(kind, config))
}

/// CLI surface for engine selection.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum EngineArg {
    Energy,
    Rustpotter,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Energy => EngineKind::Energy,
            EngineArg::Rustpotter => EngineKind::Rustpotter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn energy_engine_builds_from_fixture_paths() {
        let dir = TempDir::new().unwrap();
        let resource = dir.path().join("common.res");
        let model = dir.path().join("word.fwm");
        fs::write(&resource, b"r").unwrap();
        fs::write(&model, b"m").unwrap();

        let config = DetectorConfig {
            resource: resource.to_string_lossy().to_string(),
            models: model.to_string_lossy().to_string(),
            ..Default::default()
        };
        let engine = build_engine(EngineKind::Energy, &config).unwrap();
        assert_eq!(engine.num_hotwords(), 1);
    }

    #[test]
    fn energy_engine_construction_propagates_bad_paths() {
        let config = DetectorConfig {
            resource: "/missing/common.res".to_string(),
            ..Default::default()
        };
        assert!(build_engine(EngineKind::Energy, &config).is_err());
    }

    #[cfg(not(feature = "rustpotter"))]
    #[test]
    fn rustpotter_arm_errors_when_not_compiled_in() {
        let err = build_engine(EngineKind::Rustpotter, &DetectorConfig::default()).unwrap_err();
        assert!(err.contains("rustpotter"), "{err}");
    }
}
