// lingoscribe - Windowed speech transcription with speaker diarization
//
// Pipeline: the segmenter tiles the audio into bounded windows; each window
// is transcribed and diarized, speakers are assigned by overlap majority
// vote, and the stitcher shifts window-local timestamps onto the global
// timeline before the transcript is persisted once as a CSV table.

// Core modules
pub mod audio;
pub mod config;
pub mod diarization;
pub mod error;
pub mod model_cache;
pub mod persister;
pub mod pipeline;
pub mod segmenter;
pub mod stitcher;
pub mod transcript;
pub mod transcription;

pub use audio::{AudioTrack, SAMPLE_RATE};
pub use config::ConfigService;
pub use diarization::{
    assign_speakers, DiarizationEngine, DiarizationOutcome, DiarizationProvider,
};
pub use error::PipelineError;
pub use model_cache::ModelCache;
pub use persister::TranscriptPersister;
pub use pipeline::TranscriptionPipeline;
pub use segmenter::{segment, Window};
pub use stitcher::stitch_window;
pub use transcript::{
    DiarizationTurn, Transcript, TranscriptSegment, Word, FALLBACK_SPEAKER, UNKNOWN_SPEAKER,
};
pub use transcription::{BackendKind, TranscriptionEngine, TranscriptionProvider};
