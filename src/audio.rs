// WAV loading and per-window sample slicing.
//
// The pipeline consumes a finished 16 kHz mono WAV; extracting audio from a
// video container happens upstream. Samples are normalized f32 in [-1, 1].

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::error::PipelineError;

/// Sample rate every backend in the pipeline expects.
pub const SAMPLE_RATE: u32 = 16_000;

pub struct AudioTrack {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioTrack {
    /// Read a 16 kHz mono WAV file. Int and float sample formats are both
    /// accepted; anything else is a fatal format error before the pipeline
    /// starts.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let format_err = |detail: String| PipelineError::AudioFormat {
            path: path.display().to_string(),
            detail,
        };

        let mut reader = WavReader::open(path).map_err(|e| format_err(e.to_string()))?;
        let spec = reader.spec();
        if spec.channels != 1 || spec.sample_rate != SAMPLE_RATE {
            return Err(format_err(format!(
                "expected {} Hz mono, got {} Hz {}ch",
                SAMPLE_RATE, spec.sample_rate, spec.channels
            )));
        }

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| format_err(e.to_string()))?
            }
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| format_err(e.to_string()))?,
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    pub fn from_samples(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Samples covering `[start, end)` seconds, clamped to the track.
    pub fn slice(&self, start: f64, end: f64) -> &[f32] {
        let len = self.samples.len();
        let rate = self.sample_rate as f64;
        let a = ((start * rate).round() as usize).min(len);
        let b = ((end * rate).round() as usize).clamp(a, len);
        &self.samples[a..b]
    }
}
