// Remote ElevenLabs speech-to-text backend.
//
// Uploads each window as a WAV and folds the returned word stream into
// segments. Requires `whisper.elevenlabs_api_key` (or ELEVENLABS_API_KEY).

use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use serde::Deserialize;

use crate::config::ConfigService;
use crate::error::PipelineError;
use crate::transcript::{TranscriptSegment, Word};

use super::provider::TranscriptionProvider;

const API_URL: &str = "https://api.elevenlabs.io/v1/speech-to-text";
const MODEL_ID: &str = "scribe_v1";

/// A pause this long between words starts a new segment.
const SEGMENT_GAP_SECS: f64 = 1.0;

#[derive(Debug, Deserialize)]
struct SpeechToTextResponse {
    #[serde(default)]
    text: String,
    #[serde(default)]
    words: Vec<ApiWord>,
}

#[derive(Debug, Deserialize)]
struct ApiWord {
    #[serde(default)]
    text: String,
    #[serde(default)]
    start: f64,
    #[serde(default)]
    end: f64,
    #[serde(rename = "type", default)]
    kind: String,
}

pub struct ElevenLabsProvider {
    client: reqwest::Client,
    api_key: String,
}

impl ElevenLabsProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }

    pub fn from_config(config: &ConfigService) -> Result<Self, PipelineError> {
        Ok(Self::new(config.get_str("whisper.elevenlabs_api_key")?))
    }
}

#[async_trait]
impl TranscriptionProvider for ElevenLabsProvider {
    fn provider_name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn warm_up(&self) -> Result<()> {
        // Remote model; nothing to load locally.
        Ok(())
    }

    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<Vec<TranscriptSegment>> {
        let wav = encode_wav(samples, sample_rate)?;
        let part = reqwest::multipart::Part::bytes(wav)
            .file_name("window.wav")
            .mime_str("audio/wav")?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model_id", MODEL_ID);

        let response = self
            .client
            .post(API_URL)
            .header("xi-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .context("speech-to-text request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("speech-to-text API error {}: {}", status, body));
        }

        let parsed: SpeechToTextResponse =
            response.json().await.context("malformed API response")?;
        Ok(segments_from_words(parsed))
    }
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    let mut writer = WavWriter::new(&mut cursor, spec).context("wav header")?;
    for &s in samples {
        writer.write_sample((s.clamp(-1.0, 1.0) * 32767.0) as i16)?;
    }
    writer.finalize().context("wav finalize")?;
    Ok(cursor.into_inner())
}

/// Fold the response word stream into segments, breaking on long pauses.
fn segments_from_words(response: SpeechToTextResponse) -> Vec<TranscriptSegment> {
    let words: Vec<Word> = response
        .words
        .into_iter()
        .filter(|w| w.kind != "spacing" && !w.text.trim().is_empty())
        .map(|w| Word {
            text: w.text.trim().to_string(),
            start: w.start,
            end: w.end,
        })
        .collect();

    if words.is_empty() {
        let text = response.text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        // No word timing in the response; a single untimed segment.
        return vec![TranscriptSegment::new(0.0, 0.0, text, vec![])];
    }

    let mut segments = Vec::new();
    let mut bucket: Vec<Word> = Vec::new();
    for word in words {
        if let Some(last) = bucket.last() {
            if word.start - last.end >= SEGMENT_GAP_SECS {
                segments.push(segment_from(std::mem::take(&mut bucket)));
            }
        }
        bucket.push(word);
    }
    if !bucket.is_empty() {
        segments.push(segment_from(bucket));
    }
    segments
}

fn segment_from(words: Vec<Word>) -> TranscriptSegment {
    let start = words[0].start;
    let end = words[words.len() - 1].end;
    let text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    TranscriptSegment::new(start, end, text, words)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start: f64, end: f64) -> ApiWord {
        ApiWord {
            text: text.to_string(),
            start,
            end,
            kind: "word".to_string(),
        }
    }

    #[test]
    fn test_splits_segments_on_pause() {
        let response = SpeechToTextResponse {
            text: "hello there general kenobi".to_string(),
            words: vec![
                word("hello", 0.0, 0.4),
                word("there", 0.5, 0.9),
                word("general", 2.5, 3.0),
                word("kenobi", 3.1, 3.6),
            ],
        };

        let segments = segments_from_words(response);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "hello there");
        assert_eq!(segments[0].start, 0.0);
        assert_eq!(segments[0].end, 0.9);
        assert_eq!(segments[1].text, "general kenobi");
        assert_eq!(segments[1].words.len(), 2);
    }

    #[test]
    fn test_filters_spacing_entries() {
        let response = SpeechToTextResponse {
            text: "a b".to_string(),
            words: vec![
                word("a", 0.0, 0.1),
                ApiWord {
                    text: " ".to_string(),
                    start: 0.1,
                    end: 0.2,
                    kind: "spacing".to_string(),
                },
                word("b", 0.2, 0.3),
            ],
        };

        let segments = segments_from_words(response);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].words.len(), 2);
    }

    #[test]
    fn test_text_only_response() {
        let response = SpeechToTextResponse {
            text: "just text".to_string(),
            words: vec![],
        };

        let segments = segments_from_words(response);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "just text");
        assert!(segments[0].words.is_empty());
    }

    #[test]
    fn test_wav_encoding_has_riff_header() {
        let wav = encode_wav(&[0.0f32; 160], 16_000).unwrap();
        assert_eq!(&wav[..4], b"RIFF");
    }
}
