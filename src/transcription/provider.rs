// Transcription provider contract.
//
// Backends produce window-local segments: timestamps start at zero within
// the waveform slice they were handed. Word timestamps are expected but a
// backend without them returns segments with empty `words`.

use async_trait::async_trait;

use crate::transcript::TranscriptSegment;

#[async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Stable identifier used in logs and error context.
    fn provider_name(&self) -> &'static str;

    /// Ensure the backing model is resident. Idempotent; the pipeline calls
    /// this once before the first window.
    async fn warm_up(&self) -> anyhow::Result<()>;

    /// Transcribe one window's samples. Timestamps are local to `samples`.
    async fn transcribe(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> anyhow::Result<Vec<TranscriptSegment>>;
}
