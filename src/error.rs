// Pipeline error taxonomy.
//
// Everything here is fatal to the run. Diarization unavailability is
// deliberately absent: it is a `DiarizationOutcome` value, and the affected
// window downgrades to the fallback speaker label instead of aborting.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("config key '{key}' not found")]
    ConfigKeyMissing { key: String },

    #[error("config key '{key}' is not a {expected}")]
    ConfigTypeMismatch { key: String, expected: &'static str },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("model '{model}' unavailable: {reason}")]
    ModelUnavailable { model: String, reason: String },

    #[error("window {window}: {backend} failed to decode audio: {reason}")]
    SegmentDecode {
        window: usize,
        backend: String,
        reason: String,
    },

    #[error("unsupported audio in '{path}': {detail}")]
    AudioFormat { path: String, detail: String },

    #[error("run cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
