// Diarization engine.
//
// Diarization failures never abort a run. Every failure path collapses into
// `DiarizationOutcome::Unavailable`, logged once, and the affected windows
// fall back to the fallback speaker label during assignment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use crate::config::ConfigService;
use crate::segmenter::Window;
use crate::transcript::DiarizationTurn;

use super::pyannote_provider::PyannoteProvider;

/// Result of diarizing one window: turns, or an explicit unavailable signal.
#[derive(Debug, Clone)]
pub enum DiarizationOutcome {
    Turns(Vec<DiarizationTurn>),
    Unavailable,
}

#[async_trait]
pub trait DiarizationProvider: Send + Sync {
    /// Stable identifier used in logs.
    fn provider_name(&self) -> &'static str;

    /// Speaker turns for one window's samples, timestamps local to the
    /// slice. Turns may overlap and need not cover the whole window.
    async fn diarize(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> anyhow::Result<Vec<DiarizationTurn>>;
}

pub struct DiarizationEngine {
    provider: Option<Arc<dyn DiarizationProvider>>,
    warned: AtomicBool,
}

impl DiarizationEngine {
    /// Construct the pyannote backend from config. Construction failures
    /// (missing credential, missing models) leave the engine disabled with
    /// a single warning; the run continues on the fallback speaker.
    pub fn from_config(config: &ConfigService) -> Self {
        match PyannoteProvider::from_config(config) {
            Ok(provider) => Self::with_provider(Arc::new(provider)),
            Err(e) => {
                warn!(
                    "Speaker diarization unavailable: {:#}; windows will use the fallback speaker",
                    e
                );
                Self {
                    provider: None,
                    warned: AtomicBool::new(true),
                }
            }
        }
    }

    pub fn with_provider(provider: Arc<dyn DiarizationProvider>) -> Self {
        Self {
            provider: Some(provider),
            warned: AtomicBool::new(false),
        }
    }

    /// Engine with no backend at all. Every window is Unavailable.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            warned: AtomicBool::new(true),
        }
    }

    /// Diarize one window. Never fails: errors become `Unavailable`.
    pub async fn diarize_window(
        &self,
        window: &Window,
        samples: &[f32],
        sample_rate: u32,
    ) -> DiarizationOutcome {
        let provider = match &self.provider {
            Some(provider) => provider,
            None => return DiarizationOutcome::Unavailable,
        };

        match provider.diarize(samples, sample_rate).await {
            Ok(turns) => {
                debug!("window {}: {} diarization turns", window.index, turns.len());
                DiarizationOutcome::Turns(turns)
            }
            Err(e) => {
                if !self.warned.swap(true, Ordering::SeqCst) {
                    warn!(
                        "Diarization failed ({}): {:#}; continuing with fallback speaker",
                        provider.provider_name(),
                        e
                    );
                }
                DiarizationOutcome::Unavailable
            }
        }
    }
}
