// Local whisper-rs backend with word-level timestamps.

use std::sync::Arc;

use anyhow::{ensure, Context, Result};
use async_trait::async_trait;
use log::debug;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperState};

use crate::audio::SAMPLE_RATE;
use crate::config::ConfigService;
use crate::error::PipelineError;
use crate::model_cache::ModelCache;
use crate::transcript::{TranscriptSegment, Word};

use super::provider::TranscriptionProvider;

pub struct WhisperProvider {
    cache: Arc<ModelCache>,
    model_path: String,
    language: Option<String>,
}

impl WhisperProvider {
    pub fn new(cache: Arc<ModelCache>, model_path: String, language: Option<String>) -> Self {
        Self {
            cache,
            model_path,
            language,
        }
    }

    /// Build from `whisper.model` and optional `whisper.language` config
    /// keys. A missing model key is fatal at this point.
    pub fn from_config(
        config: &ConfigService,
        cache: Arc<ModelCache>,
    ) -> Result<Self, PipelineError> {
        let model_path = config.get_str("whisper.model")?;
        let language = match config.get_str("whisper.language") {
            Ok(lang) if lang == "auto" => None,
            Ok(lang) => Some(lang),
            Err(_) => None,
        };
        Ok(Self::new(cache, model_path, language))
    }
}

#[async_trait]
impl TranscriptionProvider for WhisperProvider {
    fn provider_name(&self) -> &'static str {
        "whisper"
    }

    async fn warm_up(&self) -> Result<()> {
        self.cache.acquire(&self.model_path)?;
        Ok(())
    }

    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<TranscriptSegment>> {
        ensure!(
            sample_rate == SAMPLE_RATE,
            "whisper expects {} Hz input, got {} Hz",
            SAMPLE_RATE,
            sample_rate
        );

        let ctx = self.cache.acquire(&self.model_path)?;
        let language = self.language.clone();
        let samples = samples.to_vec();

        // Inference holds a core for seconds at a time; keep it off the
        // async workers.
        tokio::task::spawn_blocking(move || decode(&ctx, language.as_deref(), &samples))
            .await
            .context("whisper decode task panicked")?
    }
}

fn decode(
    ctx: &WhisperContext,
    language: Option<&str>,
    samples: &[f32],
) -> Result<Vec<TranscriptSegment>> {
    let mut params = FullParams::new(SamplingStrategy::BeamSearch {
        beam_size: 5,
        patience: 1.0,
    });
    params.set_language(language);
    params.set_token_timestamps(true);
    params.set_print_special(false);
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_timestamps(false);
    params.set_suppress_blank(true);
    params.set_no_context(true);
    params.set_single_segment(false);

    let mut state = ctx.create_state().context("failed to create whisper state")?;
    state.full(params, samples).context("whisper full() failed")?;

    let num_segments = state.full_n_segments().context("segment count")?;
    let mut segments = Vec::with_capacity(num_segments as usize);

    for i in 0..num_segments {
        let text = match state.full_get_segment_text_lossy(i) {
            Ok(text) => text,
            Err(_) => continue,
        };
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        // whisper reports centiseconds
        let start = state.full_get_segment_t0(i).context("segment t0")? as f64 / 100.0;
        let end = state.full_get_segment_t1(i).context("segment t1")? as f64 / 100.0;
        let words = collect_words(ctx, &state, i)?;

        segments.push(TranscriptSegment::new(start, end, text, words));
    }

    debug!("whisper produced {} segments", segments.len());
    Ok(segments)
}

/// Rebuild word timings from token timestamps. Whisper's BPE pieces mark a
/// word boundary with a leading space.
fn collect_words(ctx: &WhisperContext, state: &WhisperState, segment: i32) -> Result<Vec<Word>> {
    let num_tokens = state.full_n_tokens(segment).context("token count")?;
    let mut words = Vec::new();
    let mut current = String::new();
    let mut word_start = 0.0f64;
    let mut word_end = 0.0f64;

    for t in 0..num_tokens {
        let data = state.full_get_token_data(segment, t).context("token data")?;
        let piece = match ctx.token_to_str(data.id) {
            Ok(piece) => piece.to_string(),
            Err(_) => continue,
        };
        if piece.starts_with("[_") || piece.starts_with("<|") {
            continue;
        }

        if piece.starts_with(' ') && !current.is_empty() {
            flush_word(&mut words, &mut current, word_start, word_end);
        }
        if current.is_empty() {
            word_start = data.t0 as f64 / 100.0;
        }
        current.push_str(&piece);
        word_end = data.t1 as f64 / 100.0;
    }
    flush_word(&mut words, &mut current, word_start, word_end);

    Ok(words)
}

fn flush_word(words: &mut Vec<Word>, current: &mut String, start: f64, end: f64) {
    let text = current.trim().to_string();
    if !text.is_empty() {
        words.push(Word { text, start, end });
    }
    current.clear();
}
