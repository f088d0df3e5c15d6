use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use frostwake_detect::FRAME_SIZE_SAMPLES;

use crate::error::FilterError;
use crate::filter::{AudioFormat, HotwordFilter};

pub struct PipelineConfig {
    /// Bytes read from the source per buffer
    pub buffer_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_bytes: FRAME_SIZE_SAMPLES * 2,
        }
    }
}

/// Runs a [`HotwordFilter`] between a byte source and sink on a dedicated
/// worker thread. The worker drains the source in fixed-size buffers and
/// exits on end of stream, a stop request, or an I/O failure.
pub struct FilterPipeline {
    handle: JoinHandle<()>,
    running: Arc<AtomicBool>,
}

impl FilterPipeline {
    /// Negotiates the fixed 16 kHz mono capability, then starts the worker.
    pub fn spawn<R, W>(
        mut filter: HotwordFilter,
        source: R,
        sink: W,
        cfg: PipelineConfig,
    ) -> Result<Self, FilterError>
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        filter.setup(AudioFormat::pcm_16k_mono())?;

        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        let handle = thread::Builder::new()
            .name("hotword-filter".to_string())
            .spawn(move || run_loop(filter, source, sink, cfg, flag))?;

        Ok(Self { handle, running })
    }

    /// Ask the worker to stop after the current buffer and wait for it.
    pub fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        let _ = self.handle.join();
    }

    /// Wait for the source to drain.
    pub fn wait(self) {
        let _ = self.handle.join();
    }
}

fn run_loop<R: Read, W: Write>(
    mut filter: HotwordFilter,
    mut source: R,
    mut sink: W,
    cfg: PipelineConfig,
    running: Arc<AtomicBool>,
) {
    tracing::info!(buffer_bytes = cfg.buffer_bytes, "filter pipeline started");

    let mut input = vec![0u8; cfg.buffer_bytes];
    let mut output = vec![0u8; cfg.buffer_bytes];

    while running.load(Ordering::Relaxed) {
        match read_full(&mut source, &mut input) {
            Ok(0) => {
                tracing::info!("input stream ended");
                break;
            }
            Ok(n) if n == input.len() => {
                if let Err(e) = filter.process(&input, &mut output) {
                    tracing::error!(error = %e, "buffer processing failed");
                    break;
                }
                if let Err(e) = sink.write_all(&output) {
                    tracing::error!(error = %e, "sink write failed");
                    break;
                }
            }
            Ok(n) => {
                // Trailing partial buffer: passed through verbatim, never analysed
                if let Err(e) = sink.write_all(&input[..n]) {
                    tracing::error!(error = %e, "sink write failed");
                }
                tracing::debug!(bytes = n, "partial final buffer passed through");
                break;
            }
            Err(e) => {
                tracing::error!(error = %e, "source read failed");
                break;
            }
        }
    }

    if let Err(e) = sink.flush() {
        tracing::warn!(error = %e, "sink flush failed");
    }
    tracing::info!("filter pipeline stopped");
}

fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
