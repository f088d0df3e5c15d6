/// Per-frame classification produced by a hotword engine.
///
/// Engines report a signed integer code on the wire: -2 for silence, -1 for
/// an internal error, 0 for audio that matched no model, and n >= 1 when
/// model n (1-based) fired. `Detection` carries the same states as a typed
/// enum and round-trips to the raw code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    Silence,
    Error,
    Noise,
    /// 1-based index into the configured model list
    Hotword(u32),
}

impl Detection {
    pub fn code(self) -> i32 {
        match self {
            Detection::Silence => -2,
            Detection::Error => -1,
            Detection::Noise => 0,
            Detection::Hotword(n) => n as i32,
        }
    }

    /// Out-of-range negative codes are treated as engine errors.
    pub fn from_code(code: i32) -> Self {
        match code {
            -2 => Detection::Silence,
            0 => Detection::Noise,
            n if n >= 1 => Detection::Hotword(n as u32),
            _ => Detection::Error,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Detection::Silence => "silence",
            Detection::Error => "error",
            Detection::Noise => "noise",
            Detection::Hotword(_) => "hotword",
        }
    }

    /// Zero-based model index for positive detections
    pub fn model_index(self) -> Option<u32> {
        match self {
            Detection::Hotword(n) => Some(n - 1),
            _ => None,
        }
    }
}

/// Raised by the pipeline filter once per positive detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotwordEvent {
    /// Zero-based index into the configured model list
    pub model_index: u32,
    /// Stream position of the triggering buffer
    pub timestamp_ms: u64,
}
