use std::sync::atomic::{AtomicI16, AtomicU64, Ordering};

/// Shared counters for cross-thread filter monitoring
#[derive(Debug, Default)]
pub struct FilterMetrics {
    pub buffers_processed: AtomicU64,
    pub samples_processed: AtomicU64,
    pub detections_emitted: AtomicU64,
    pub events_dropped: AtomicU64,
    /// Current level in dB * 10
    pub audio_level_db: AtomicI16,
}

impl FilterMetrics {
    pub fn update_audio_level(&self, samples: &[i16]) {
        if samples.is_empty() {
            return;
        }

        let peak = samples.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0);
        let db = if peak > 0 {
            (20.0 * (peak as f64 / 32768.0).log10() * 10.0) as i16
        } else {
            -900
        };
        self.audio_level_db.store(db, Ordering::Relaxed);
    }

    pub fn record_buffer(&self, samples: usize) {
        self.buffers_processed.fetch_add(1, Ordering::Relaxed);
        self.samples_processed
            .fetch_add(samples as u64, Ordering::Relaxed);
    }

    pub fn increment_detections(&self) {
        self.detections_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_events_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn audio_level_dbfs(&self) -> f32 {
        self.audio_level_db.load(Ordering::Relaxed) as f32 / 10.0
    }
}
