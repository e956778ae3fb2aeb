// Pipeline orchestration.
//
// Windows are processed strictly sequentially: window i+1 does not start
// until window i has been transcribed, diarized, assigned, and stitched.
// Windows share no mutable state beyond the model cache, so they could run
// concurrently with results buffered in index order; the serial loop keeps
// inference calls unshared and the transcript append trivially ordered.

use std::sync::Arc;

use log::info;
use tokio_util::sync::CancellationToken;

use crate::audio::AudioTrack;
use crate::config::ConfigService;
use crate::diarization::{assign_speakers, DiarizationEngine};
use crate::error::PipelineError;
use crate::model_cache::ModelCache;
use crate::persister::TranscriptPersister;
use crate::segmenter::segment;
use crate::stitcher::stitch_window;
use crate::transcript::Transcript;
use crate::transcription::TranscriptionEngine;

/// Default window length when `pipeline.window_secs` is absent.
const DEFAULT_WINDOW_SECS: f64 = 600.0;

pub struct TranscriptionPipeline {
    transcription: TranscriptionEngine,
    diarization: DiarizationEngine,
    max_window: f64,
}

impl TranscriptionPipeline {
    pub fn from_config(
        config: &ConfigService,
        cache: Arc<ModelCache>,
    ) -> Result<Self, PipelineError> {
        let transcription = TranscriptionEngine::from_config(config, cache)?;
        let diarization = DiarizationEngine::from_config(config);
        let max_window = config
            .get_f64("pipeline.window_secs")
            .unwrap_or(DEFAULT_WINDOW_SECS);

        Ok(Self::new(transcription, diarization, max_window))
    }

    pub fn new(
        transcription: TranscriptionEngine,
        diarization: DiarizationEngine,
        max_window: f64,
    ) -> Self {
        Self {
            transcription,
            diarization,
            max_window,
        }
    }

    /// Run the full pipeline over one track.
    pub async fn run(&self, audio: &AudioTrack) -> Result<Transcript, PipelineError> {
        self.run_with_cancel(audio, &CancellationToken::new()).await
    }

    /// Run with cooperative cancellation. The transcript is all-or-nothing:
    /// cancelling discards the in-flight window's partial results and the
    /// run fails with `Cancelled`.
    pub async fn run_with_cancel(
        &self,
        audio: &AudioTrack,
        cancel: &CancellationToken,
    ) -> Result<Transcript, PipelineError> {
        let total = audio.duration_secs();
        if total <= 0.0 {
            return Err(PipelineError::AudioFormat {
                path: "(in-memory track)".to_string(),
                detail: "empty audio track".to_string(),
            });
        }

        let windows = segment(total, self.max_window);
        info!(
            "Processing {:.1}s of audio in {} window{} of up to {:.0}s",
            total,
            windows.len(),
            if windows.len() == 1 { "" } else { "s" },
            self.max_window
        );

        self.transcription.warm_up().await?;

        let mut transcript = Transcript::new();
        for window in &windows {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            let slice = audio.slice(window.start, window.end);
            info!(
                "Window {} [{:.1}s..{:.1}s]: transcribing",
                window.index, window.start, window.end
            );

            let mut segments = self
                .transcription
                .transcribe_window(window, slice, audio.sample_rate())
                .await?;

            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            let outcome = self
                .diarization
                .diarize_window(window, slice, audio.sample_rate())
                .await;
            assign_speakers(&mut segments, &outcome);

            info!(
                "Window {}: {} segments",
                window.index,
                segments.len()
            );
            transcript.append(stitch_window(window, segments));
        }

        Ok(transcript)
    }

    /// Run and hand the finished transcript to the persister, once.
    pub async fn run_and_persist(
        &self,
        audio: &AudioTrack,
        persister: &TranscriptPersister,
    ) -> Result<Transcript, PipelineError> {
        let transcript = self.run(audio).await?;
        persister.persist(&transcript)?;
        Ok(transcript)
    }
}
