use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;

use anyhow::anyhow;
use clap::Parser;
use frostwake_app::engine::{engine_factory, EngineArg};
use frostwake_detect::DetectorConfig;
use frostwake_filter::{FilterPipeline, HotwordFilter, PipelineConfig, PropertyBlock};

/// Pass-through hotword detection: raw 16 kHz mono s16 PCM flows from stdin
/// to stdout unchanged while detections are logged on stderr.
#[derive(Parser, Debug)]
#[command(name = "frostwake", version, about)]
struct Args {
    /// Shared acoustic resource file
    #[arg(long, env = "FROSTWAKE_RESOURCE", default_value = "resources/common.res")]
    resource: String,

    /// Comma-separated hotword model file(s)
    #[arg(long, env = "FROSTWAKE_MODELS", default_value = "resources/models/default.fwm")]
    models: String,

    /// Comma-separated sensitivity per model
    #[arg(long, default_value = "0.5")]
    sensitivity: String,

    /// Input gain at the detector, 0.0-1.0
    #[arg(long, default_value_t = 1.0)]
    gain: f32,

    /// Detection engine
    #[arg(long, value_enum, default_value = "energy")]
    engine: EngineArg,

    /// Pass audio through without feeding the detector
    #[arg(long)]
    no_listen: bool,

    /// Bytes per processed buffer
    #[arg(long, default_value_t = 4000)]
    buffer_bytes: usize,
}

fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_level)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();
    tracing::info!("starting frostwake pipeline");

    let config = DetectorConfig {
        resource: args.resource,
        models: args.models,
        sensitivity: args.sensitivity,
        audio_gain: args.gain,
        apply_frontend: false,
    };
    let props = Arc::new(PropertyBlock::new(config));
    props.set_listen(!args.no_listen);

    let (event_tx, event_rx) = crossbeam_channel::bounded(64);
    let filter = HotwordFilter::new(props, engine_factory(args.engine.into()), event_tx);
    let metrics = filter.metrics();

    // Detections surface here, decoupled from the data path
    let events = thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            tracing::info!(
                model_index = event.model_index,
                timestamp_ms = event.timestamp_ms,
                "hotword detected"
            );
        }
    });

    let pipeline = FilterPipeline::spawn(
        filter,
        std::io::stdin(),
        std::io::stdout(),
        PipelineConfig {
            buffer_bytes: args.buffer_bytes,
        },
    )
    .map_err(|e| anyhow!("failed to start pipeline: {e}"))?;

    pipeline.wait();
    let _ = events.join();

    tracing::info!(
        buffers = metrics.buffers_processed.load(Ordering::Relaxed),
        detections = metrics.detections_emitted.load(Ordering::Relaxed),
        dropped = metrics.events_dropped.load(Ordering::Relaxed),
        "pipeline finished"
    );
    Ok(())
}
