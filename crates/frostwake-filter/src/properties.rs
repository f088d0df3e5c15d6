use frostwake_detect::DetectorConfig;
use parking_lot::Mutex;

/// Mutable filter configuration behind a single lock.
///
/// Hosts may get and set properties from a different thread than the one
/// processing buffers, so every accessor takes the lock for its own
/// duration only. Changing `resource` or `models` while an engine is live
/// does not rebuild it; the new paths apply on the next setup.
pub struct PropertyBlock {
    inner: Mutex<Properties>,
}

struct Properties {
    resource: String,
    models: String,
    sensitivity: String,
    gain: f32,
    listen: bool,
}

impl Default for PropertyBlock {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl PropertyBlock {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            inner: Mutex::new(Properties {
                resource: config.resource,
                models: config.models,
                sensitivity: config.sensitivity,
                gain: config.audio_gain.clamp(0.0, 1.0),
                listen: true,
            }),
        }
    }

    pub fn resource(&self) -> String {
        self.inner.lock().resource.clone()
    }

    /// Empty or absent values are rejected and the previous path kept.
    pub fn set_resource(&self, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => {
                let mut props = self.inner.lock();
                props.resource = v.to_string();
                tracing::debug!(resource = v, "resource path set; applies on next setup");
            }
            _ => tracing::warn!("resource property cannot be empty"),
        }
    }

    pub fn models(&self) -> String {
        self.inner.lock().models.clone()
    }

    /// Empty or absent values are rejected and the previous list kept.
    pub fn set_models(&self, value: Option<&str>) {
        match value {
            Some(v) if !v.is_empty() => {
                let mut props = self.inner.lock();
                props.models = v.to_string();
                tracing::debug!(models = v, "model list set; applies on next setup");
            }
            _ => tracing::warn!("models property cannot be empty"),
        }
    }

    pub fn sensitivity(&self) -> String {
        self.inner.lock().sensitivity.clone()
    }

    pub fn set_sensitivity(&self, value: &str) {
        self.inner.lock().sensitivity = value.to_string();
    }

    pub fn gain(&self) -> f32 {
        self.inner.lock().gain
    }

    pub fn set_gain(&self, value: f32) {
        self.inner.lock().gain = value.clamp(0.0, 1.0);
    }

    pub fn listen(&self) -> bool {
        self.inner.lock().listen
    }

    pub fn set_listen(&self, value: bool) {
        self.inner.lock().listen = value;
    }

    /// Snapshot for engine construction at setup time.
    pub fn detector_config(&self) -> DetectorConfig {
        let props = self.inner.lock();
        DetectorConfig {
            resource: props.resource.clone(),
            models: props.models.clone(),
            sensitivity: props.sensitivity.clone(),
            audio_gain: props.gain,
            apply_frontend: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_detector_config() {
        let props = PropertyBlock::default();
        let defaults = DetectorConfig::default();
        assert_eq!(props.resource(), defaults.resource);
        assert_eq!(props.models(), defaults.models);
        assert_eq!(props.sensitivity(), defaults.sensitivity);
        assert_eq!(props.gain(), 1.0);
        assert!(props.listen());
    }

    #[test]
    fn empty_resource_is_rejected_and_previous_kept() {
        let props = PropertyBlock::default();
        let before = props.resource();
        props.set_resource(None);
        assert_eq!(props.resource(), before);
        props.set_resource(Some(""));
        assert_eq!(props.resource(), before);
        props.set_resource(Some("elsewhere.res"));
        assert_eq!(props.resource(), "elsewhere.res");
    }

    #[test]
    fn empty_models_is_rejected_and_previous_kept() {
        let props = PropertyBlock::default();
        let before = props.models();
        props.set_models(Some(""));
        assert_eq!(props.models(), before);
        props.set_models(None);
        assert_eq!(props.models(), before);
    }

    #[test]
    fn gain_is_clamped_to_unit_range() {
        let props = PropertyBlock::default();
        props.set_gain(2.5);
        assert_eq!(props.gain(), 1.0);
        props.set_gain(-0.5);
        assert_eq!(props.gain(), 0.0);
        props.set_gain(0.25);
        assert_eq!(props.gain(), 0.25);
    }

    #[test]
    fn sensitivity_is_stored_unvalidated() {
        let props = PropertyBlock::default();
        props.set_sensitivity("not,floats,at,all");
        assert_eq!(props.sensitivity(), "not,floats,at,all");
    }
}
