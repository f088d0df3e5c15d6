use std::io::Cursor;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use frostwake_app::engine::{build_engine, EngineArg};
use frostwake_app::listener::{read_wav_pcm, BatchListener};
use frostwake_detect::DetectorConfig;

/// Batch hotword listener: reads raw 16 kHz mono s16 PCM from stdin (or a
/// WAV file) and prints the detector state each time it changes.
#[derive(Parser, Debug)]
#[command(name = "listen", version, about)]
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

    /// Read frames from a 16 kHz mono 16-bit WAV file instead of stdin
    #[arg(long)]
    wav: Option<PathBuf>,
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

    let config = DetectorConfig {
        resource: args.resource,
        models: args.models,
        sensitivity: args.sensitivity,
        audio_gain: args.gain,
        apply_frontend: false,
    };

    // A bad resource or model path is fatal here, before any audio is read
    let engine = build_engine(args.engine.into(), &config)
        .map_err(|e| anyhow!("failed to initialise detector: {e}"))?;

    let frames = match args.wav {
        Some(path) => {
            let bytes = read_wav_pcm(&path)?;
            BatchListener::new(engine, Cursor::new(bytes), std::io::stdout()).run()?
        }
        None => BatchListener::new(engine, std::io::stdin(), std::io::stdout()).run()?,
    };

    tracing::info!(frames, "listener finished");
    Ok(())
}
