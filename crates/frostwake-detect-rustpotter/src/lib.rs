#[cfg(feature = "rustpotter")]
pub mod rustpotter_wrapper;
pub mod config;

pub use config::RustpotterEngineConfig;

#[cfg(feature = "rustpotter")]
pub use rustpotter_wrapper::RustpotterEngine;
