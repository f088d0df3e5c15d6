use std::sync::Arc;

use crossbeam_channel::{Sender, TrySendError};
use frostwake_detect::{
    Detection, DetectorConfig, HotwordEngine, HotwordEvent, BITS_PER_SAMPLE, CHANNELS_MONO,
    SAMPLE_RATE_HZ,
};

use crate::error::FilterError;
use crate::metrics::FilterMetrics;
use crate::properties::PropertyBlock;

/// Builds an engine from the property snapshot taken at setup time.
pub type EngineFactory =
    Box<dyn Fn(&DetectorConfig) -> Result<Box<dyn HotwordEngine>, String> + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

impl AudioFormat {
    /// The only capability the filter negotiates
    pub fn pcm_16k_mono() -> Self {
        Self {
            sample_rate_hz: SAMPLE_RATE_HZ,
            channels: CHANNELS_MONO,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }
}

/// Pass-through hotword detection filter.
///
/// One input buffer in, the same bytes out, and - while `listen` is set -
/// the samples also go through the detector. Positive detections are
/// published as [`HotwordEvent`]s on a bounded channel; publication never
/// blocks buffer processing, and a full channel drops the event rather
/// than stalling the data path.
pub struct HotwordFilter {
    props: Arc<PropertyBlock>,
    factory: EngineFactory,
    engine: Option<Box<dyn HotwordEngine>>,
    event_tx: Sender<HotwordEvent>,
    metrics: Arc<FilterMetrics>,
    samples_processed: u64,
}

impl HotwordFilter {
    pub fn new(
        props: Arc<PropertyBlock>,
        factory: EngineFactory,
        event_tx: Sender<HotwordEvent>,
    ) -> Self {
        Self {
            props,
            factory,
            engine: None,
            event_tx,
            metrics: Arc::new(FilterMetrics::default()),
            samples_processed: 0,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<FilterMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> Arc<FilterMetrics> {
        self.metrics.clone()
    }

    pub fn properties(&self) -> Arc<PropertyBlock> {
        self.props.clone()
    }

    pub fn is_configured(&self) -> bool {
        self.engine.is_some()
    }

    /// Invoked once the negotiated format is confirmed. Builds the engine
    /// from the current property snapshot and applies its configuration.
    pub fn setup(&mut self, format: AudioFormat) -> Result<(), FilterError> {
        if format != AudioFormat::pcm_16k_mono() {
            return Err(FilterError::FormatNotSupported {
                format: format!(
                    "{} Hz, {} ch, {} bit",
                    format.sample_rate_hz, format.channels, format.bits_per_sample
                ),
            });
        }

        tracing::info!(
            rate = format.sample_rate_hz,
            channels = format.channels,
            width = format.bits_per_sample,
            "input format negotiated"
        );

        let config = self.props.detector_config();
        let mut engine = (self.factory)(&config).map_err(FilterError::EngineInit)?;
        engine.set_sensitivity(&config.sensitivity);
        engine.set_audio_gain(config.audio_gain);
        engine.apply_frontend(false);

        tracing::info!(
            rate = engine.sample_rate(),
            channels = engine.num_channels(),
            width = engine.bits_per_sample(),
            models = engine.num_hotwords(),
            "detector ready"
        );

        self.engine = Some(engine);
        self.samples_processed = 0;
        Ok(())
    }

    /// Process one buffer: copy input to output, then run detection on the
    /// side when listening. Always succeeds for well-formed hosts;
    /// detections never surface through the return value.
    pub fn process(&mut self, input: &[u8], output: &mut [u8]) -> Result<(), FilterError> {
        // Unequal sizes mean the host broke the pass-through contract
        assert_eq!(
            input.len(),
            output.len(),
            "pass-through buffers must be the same size"
        );
        output.copy_from_slice(input);

        let engine = self.engine.as_mut().ok_or(FilterError::NotConfigured)?;

        let samples = pcm_bytes_to_samples(input);
        let timestamp_ms = self.samples_processed * 1000 / SAMPLE_RATE_HZ as u64;
        self.samples_processed += samples.len() as u64;
        self.metrics.record_buffer(samples.len());
        self.metrics.update_audio_level(&samples);

        if self.props.listen() {
            if let Detection::Hotword(code) = engine.run_detection(&samples) {
                let event = HotwordEvent {
                    model_index: code - 1,
                    timestamp_ms,
                };
                tracing::info!(model_index = event.model_index, timestamp_ms, "hotword detected");
                match self.event_tx.try_send(event) {
                    Ok(()) => self.metrics.increment_detections(),
                    Err(TrySendError::Full(_)) => {
                        self.metrics.increment_events_dropped();
                        tracing::warn!("detection event dropped: channel full");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        self.metrics.increment_events_dropped();
                        tracing::trace!("no listener for detection events");
                    }
                }
            }
        }

        Ok(())
    }
}

/// Reinterpret raw PCM bytes as native-endian 16-bit samples. A trailing
/// odd byte is ignored.
pub fn pcm_bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_ne_bytes([pair[0], pair[1]]))
        .collect()
}
