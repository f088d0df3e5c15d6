use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("format not supported: {format}")]
    FormatNotSupported { format: String },

    #[error("detector initialisation failed: {0}")]
    EngineInit(String),

    #[error("buffer processed before setup")]
    NotConfigured,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
