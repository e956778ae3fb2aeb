// Speaker diarization module.
//
// Module structure:
// - engine.rs: DiarizationProvider trait, DiarizationOutcome, engine wrapper
// - pyannote_provider.rs: pyannote-rs backend (segmentation + embeddings)
// - assigner.rs: overlap-duration majority vote onto transcript segments

pub mod assigner;
pub mod engine;
pub mod pyannote_provider;

pub use assigner::assign_speakers;
pub use engine::{DiarizationEngine, DiarizationOutcome, DiarizationProvider};
pub use pyannote_provider::PyannoteProvider;
