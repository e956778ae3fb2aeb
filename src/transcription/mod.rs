// Transcription module: provider abstraction and backend selection.
//
// Module structure:
// - provider.rs: TranscriptionProvider trait
// - whisper_provider.rs: local whisper-rs backend (default)
// - elevenlabs_provider.rs: remote HTTP ASR backend
// - engine.rs: backend selection from config, per-window decoding

pub mod engine;
pub mod elevenlabs_provider;
pub mod provider;
pub mod whisper_provider;

pub use elevenlabs_provider::ElevenLabsProvider;
pub use engine::{BackendKind, TranscriptionEngine};
pub use provider::TranscriptionProvider;
pub use whisper_provider::WhisperProvider;
