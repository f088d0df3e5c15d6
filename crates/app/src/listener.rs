use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};
use frostwake_detect::{HotwordEngine, CHANNELS_MONO, FRAME_SIZE_SAMPLES, SAMPLE_RATE_HZ};
use frostwake_filter::pcm_bytes_to_samples;

/// Batch listener: one blocking frame-sized read per iteration, printing a
/// state label whenever the detector's code changes.
///
/// The baseline starts at code 0 (noise), so the first printed label is the
/// first departure from that state. The loop ends when the input stream
/// does; a truncated final frame is not analysed.
pub struct BatchListener<R, W> {
    engine: Box<dyn HotwordEngine>,
    input: R,
    output: W,
    last_code: i32,
}

impl<R: Read, W: Write> BatchListener<R, W> {
    pub fn new(engine: Box<dyn HotwordEngine>, input: R, output: W) -> Self {
        Self {
            engine,
            input,
            output,
            last_code: 0,
        }
    }

    /// Run until end of stream. Returns the number of whole frames fed to
    /// the detector.
    pub fn run(&mut self) -> anyhow::Result<u64> {
        let mut buf = vec![0u8; FRAME_SIZE_SAMPLES * 2];
        let mut frames = 0u64;

        loop {
            if let Err(e) = self.input.read_exact(&mut buf) {
                if e.kind() == ErrorKind::UnexpectedEof {
                    tracing::info!(frames, "input stream ended");
                    break;
                }
                return Err(e).context("reading input stream");
            }

            let samples = pcm_bytes_to_samples(&buf);
            let detection = self.engine.run_detection(&samples);
            let code = detection.code();
            if code != self.last_code {
                writeln!(self.output, "{}", detection.label()).context("writing state label")?;
                self.output.flush().context("flushing state label")?;
                self.last_code = code;
            }
            frames += 1;
        }

        Ok(frames)
    }
}

/// Load a 16 kHz mono 16-bit PCM WAV as raw bytes for the listener.
pub fn read_wav_pcm(path: &Path) -> anyhow::Result<Vec<u8>> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("opening WAV file {}", path.display()))?;
    let spec = reader.spec();

    if spec.sample_rate != SAMPLE_RATE_HZ
        || spec.channels != CHANNELS_MONO
        || spec.bits_per_sample != 16
        || spec.sample_format != hound::SampleFormat::Int
    {
        bail!(
            "unsupported WAV format ({} Hz, {} ch, {} bit); expected 16000 Hz mono 16-bit PCM",
            spec.sample_rate,
            spec.channels,
            spec.bits_per_sample
        );
    }

    let mut bytes = Vec::with_capacity(reader.len() as usize * 2);
    for sample in reader.samples::<i16>() {
        bytes.extend_from_slice(&sample.context("decoding WAV sample")?.to_ne_bytes());
    }

    tracing::info!(
        samples = bytes.len() / 2,
        path = %path.display(),
        "WAV input loaded"
    );
    Ok(bytes)
}
