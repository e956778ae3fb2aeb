// Transcription engine: backend selection and per-window decoding.
//
// The backend is chosen once at construction from `whisper.runtime`. An
// unrecognized selector logs a warning and falls back to the local whisper
// backend rather than aborting.

use std::sync::Arc;

use log::{info, warn};

use crate::config::ConfigService;
use crate::error::PipelineError;
use crate::model_cache::ModelCache;
use crate::segmenter::Window;
use crate::transcript::TranscriptSegment;

use super::elevenlabs_provider::ElevenLabsProvider;
use super::provider::TranscriptionProvider;
use super::whisper_provider::WhisperProvider;

/// The closed set of transcription backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Whisper,
    ElevenLabs,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Whisper => "whisper",
            BackendKind::ElevenLabs => "elevenlabs",
        }
    }
}

pub struct TranscriptionEngine {
    provider: Arc<dyn TranscriptionProvider>,
    backend: BackendKind,
}

impl TranscriptionEngine {
    /// Select and construct the backend named by `whisper.runtime`.
    pub fn from_config(
        config: &ConfigService,
        cache: Arc<ModelCache>,
    ) -> Result<Self, PipelineError> {
        let runtime = config.get_str("whisper.runtime")?;
        let (provider, backend): (Arc<dyn TranscriptionProvider>, BackendKind) =
            match runtime.as_str() {
                "whisper" => (
                    Arc::new(WhisperProvider::from_config(config, cache)?),
                    BackendKind::Whisper,
                ),
                "elevenlabs" => (
                    Arc::new(ElevenLabsProvider::from_config(config)?),
                    BackendKind::ElevenLabs,
                ),
                other => {
                    warn!(
                        "Unknown ASR runtime '{}', falling back to '{}'",
                        other,
                        BackendKind::Whisper.as_str()
                    );
                    (
                        Arc::new(WhisperProvider::from_config(config, cache)?),
                        BackendKind::Whisper,
                    )
                }
            };

        info!("Transcription backend: {}", backend.as_str());
        Ok(Self { provider, backend })
    }

    /// Engine around an explicit provider. Used by embedders and tests.
    pub fn with_provider(provider: Arc<dyn TranscriptionProvider>, backend: BackendKind) -> Self {
        Self { provider, backend }
    }

    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Make the backend's model resident before the first window. A failure
    /// here aborts the run before any audio is decoded.
    pub async fn warm_up(&self) -> Result<(), PipelineError> {
        self.provider.warm_up().await.map_err(|e| {
            match e.downcast::<PipelineError>() {
                Ok(pipeline_err) => pipeline_err,
                Err(e) => PipelineError::ModelUnavailable {
                    model: self.provider.provider_name().to_string(),
                    reason: format!("{:#}", e),
                },
            }
        })
    }

    /// Transcribe one window. Any backend failure is fatal and carries the
    /// window index and backend identifier for diagnosis.
    pub async fn transcribe_window(
        &self,
        window: &Window,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<TranscriptSegment>, PipelineError> {
        self.provider
            .transcribe(samples, sample_rate)
            .await
            .map_err(|e| PipelineError::SegmentDecode {
                window: window.index,
                backend: self.provider.provider_name().to_string(),
                reason: format!("{:#}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct NoopProvider;

    #[async_trait]
    impl TranscriptionProvider for NoopProvider {
        fn provider_name(&self) -> &'static str {
            "noop"
        }

        async fn warm_up(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn transcribe(
            &self,
            _samples: &[f32],
            _sample_rate: u32,
        ) -> anyhow::Result<Vec<TranscriptSegment>> {
            anyhow::bail!("decode failed")
        }
    }

    #[tokio::test]
    async fn test_decode_failure_carries_window_index() {
        let engine = TranscriptionEngine::with_provider(Arc::new(NoopProvider), BackendKind::Whisper);
        let window = Window {
            index: 7,
            start: 420.0,
            end: 480.0,
        };

        let err = engine.transcribe_window(&window, &[], 16_000).await.unwrap_err();
        match err {
            PipelineError::SegmentDecode { window, backend, .. } => {
                assert_eq!(window, 7);
                assert_eq!(backend, "noop");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_runtime_falls_back_to_whisper() {
        let config = ConfigService::from_value(json!({
            "whisper": { "runtime": "mlx", "model": "models/ggml-base.bin" },
        }));
        let engine =
            TranscriptionEngine::from_config(&config, Arc::new(ModelCache::new())).unwrap();
        assert_eq!(engine.backend(), BackendKind::Whisper);
    }

    #[test]
    fn test_missing_runtime_key_is_fatal() {
        let config = ConfigService::from_value(json!({ "whisper": {} }));
        let err = TranscriptionEngine::from_config(&config, Arc::new(ModelCache::new()))
            .unwrap_err();
        assert!(matches!(err, PipelineError::ConfigKeyMissing { .. }));
    }
}
