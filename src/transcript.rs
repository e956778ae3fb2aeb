// Transcript data model: words, segments, speaker turns.
//
// All timestamps are seconds. Segments coming out of a transcription backend
// are window-local (zero-based within the waveform slice that produced
// them); the stitcher shifts them onto the global timeline.

use serde::{Deserialize, Serialize};

/// Speaker label applied to a whole window when diarization is unavailable.
pub const FALLBACK_SPEAKER: &str = "SPEAKER_00";

/// Speaker label for a segment that no diarization turn overlaps.
/// Distinct from [`FALLBACK_SPEAKER`] so the two cases stay separable
/// downstream.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// A single recognized word with timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// A contiguous span of recognized speech.
///
/// `speaker_id` is always set: a diarization label once assignment has run,
/// or one of the sentinel labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
    pub speaker_id: String,
}

impl TranscriptSegment {
    /// New segment with no speaker assigned yet.
    pub fn new(start: f64, end: f64, text: impl Into<String>, words: Vec<Word>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words,
            speaker_id: UNKNOWN_SPEAKER.to_string(),
        }
    }

    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// A span the diarization backend attributes to one speaker.
/// Turns may overlap each other and need not be contiguous.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationTurn {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

/// The whole-audio transcript, segments ordered by global start time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one window's stitched segments. Windows arrive in increasing
    /// index order and each window is already locally ordered, so nothing
    /// is re-sorted here.
    pub fn append(&mut self, segments: Vec<TranscriptSegment>) {
        self.segments.extend(segments);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Plain-text rendering, one line per segment.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for seg in &self.segments {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(seg.text.trim());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_segment_has_sentinel_speaker() {
        let seg = TranscriptSegment::new(0.0, 1.0, "hi", vec![]);
        assert_eq!(seg.speaker_id, UNKNOWN_SPEAKER);
    }

    #[test]
    fn test_sentinels_are_distinct() {
        assert_ne!(FALLBACK_SPEAKER, UNKNOWN_SPEAKER);
    }

    #[test]
    fn test_transcript_text_joins_segments() {
        let mut transcript = Transcript::new();
        transcript.append(vec![
            TranscriptSegment::new(0.0, 1.0, "hello ", vec![]),
            TranscriptSegment::new(1.0, 2.0, "world", vec![]),
        ]);
        assert_eq!(transcript.text(), "hello\nworld");
    }
}
