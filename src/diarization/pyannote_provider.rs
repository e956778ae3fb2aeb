// pyannote-rs diarization backend.
//
// Segmentation finds speech regions, the embedding model fingerprints each
// region, and the embedding manager clusters fingerprints into session
// speakers labeled SPEAKER_00, SPEAKER_01, ...

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use pyannote_rs::{get_segments, EmbeddingExtractor, EmbeddingManager};

use crate::config::ConfigService;
use crate::transcript::DiarizationTurn;

use super::engine::DiarizationProvider;

const DEFAULT_MAX_SPEAKERS: usize = 10;
const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.5;

struct ClusterState {
    extractor: EmbeddingExtractor,
    manager: EmbeddingManager,
}

pub struct PyannoteProvider {
    segmentation_model: PathBuf,
    threshold: f32,
    state: Arc<Mutex<ClusterState>>,
}

impl PyannoteProvider {
    /// Build from config. The model bundle ships from a gated repository,
    /// so the Hugging Face credential must resolve even though inference
    /// itself runs locally; a missing token or missing model file is a
    /// construction error the engine downgrades to Unavailable.
    pub fn from_config(config: &ConfigService) -> Result<Self> {
        let token = config.get_str("api.huggingface_token")?;
        if token.trim().is_empty() {
            return Err(anyhow!("huggingface token is empty"));
        }

        let segmentation_model = PathBuf::from(config.get_str("diarization.segmentation_model")?);
        let embedding_model = PathBuf::from(config.get_str("diarization.embedding_model")?);

        let max_speakers = config
            .get_f64("diarization.max_speakers")
            .map(|n| n as usize)
            .unwrap_or(DEFAULT_MAX_SPEAKERS);
        let threshold = config
            .get_f64("diarization.similarity_threshold")
            .map(|n| n as f32)
            .unwrap_or(DEFAULT_SIMILARITY_THRESHOLD);

        Self::new(segmentation_model, embedding_model, max_speakers, threshold)
    }

    pub fn new(
        segmentation_model: PathBuf,
        embedding_model: PathBuf,
        max_speakers: usize,
        threshold: f32,
    ) -> Result<Self> {
        if !segmentation_model.exists() {
            return Err(anyhow!(
                "segmentation model not found: {:?}",
                segmentation_model
            ));
        }
        if !embedding_model.exists() {
            return Err(anyhow!("embedding model not found: {:?}", embedding_model));
        }

        // pyannote-rs reports errors via eyre; convert at the boundary.
        let extractor = EmbeddingExtractor::new(&embedding_model)
            .map_err(|e| anyhow!("failed to create embedding extractor: {}", e))?;
        let manager = EmbeddingManager::new(max_speakers);

        Ok(Self {
            segmentation_model,
            threshold,
            state: Arc::new(Mutex::new(ClusterState { extractor, manager })),
        })
    }
}

#[async_trait]
impl DiarizationProvider for PyannoteProvider {
    fn provider_name(&self) -> &'static str {
        "pyannote"
    }

    async fn diarize(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<DiarizationTurn>> {
        let samples = samples.to_vec();
        let segmentation_model = self.segmentation_model.clone();
        let threshold = self.threshold;
        let state = self.state.clone();

        tokio::task::spawn_blocking(move || {
            run_diarization(&samples, sample_rate, &segmentation_model, threshold, &state)
        })
        .await
        .context("diarization task panicked")?
    }
}

fn run_diarization(
    samples: &[f32],
    sample_rate: u32,
    segmentation_model: &PathBuf,
    threshold: f32,
    state: &Mutex<ClusterState>,
) -> Result<Vec<DiarizationTurn>> {
    // pyannote-rs consumes i16 samples
    let samples_i16: Vec<i16> = samples
        .iter()
        .map(|&s| (s * 32767.0).clamp(-32768.0, 32767.0) as i16)
        .collect();

    let segments = get_segments(&samples_i16, sample_rate, segmentation_model)
        .map_err(|e| anyhow!("segmentation failed: {}", e))?;

    let mut state = state.lock().unwrap_or_else(|e| e.into_inner());
    let mut turns = Vec::new();

    for segment in segments {
        let segment = match segment {
            Ok(segment) => segment,
            Err(e) => {
                warn!("Skipping speech region: {}", e);
                continue;
            }
        };

        let embedding: Vec<f32> = match state.extractor.compute(&segment.samples) {
            Ok(values) => values.collect(),
            Err(e) => {
                warn!("Failed to compute speaker embedding: {}", e);
                continue;
            }
        };

        match state.manager.search_speaker(embedding, threshold) {
            Some(speaker_idx) => turns.push(DiarizationTurn {
                start: segment.start,
                end: segment.end,
                speaker: format!("SPEAKER_{:02}", speaker_idx),
            }),
            None => {
                // Speaker capacity reached; leave the region unattributed so
                // assignment maps it to the unknown sentinel.
                debug!(
                    "speaker capacity reached, region {:.1}s..{:.1}s unattributed",
                    segment.start, segment.end
                );
            }
        }
    }

    Ok(turns)
}
