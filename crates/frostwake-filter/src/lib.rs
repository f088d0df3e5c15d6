pub mod error;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod properties;

pub use error::FilterError;
pub use filter::{pcm_bytes_to_samples, AudioFormat, EngineFactory, HotwordFilter};
pub use metrics::FilterMetrics;
pub use pipeline::{FilterPipeline, PipelineConfig};
pub use properties::PropertyBlock;
