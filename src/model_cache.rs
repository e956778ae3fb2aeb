// Process-wide whisper model cache.
//
// Loading a whisper context is expensive and the context is immutable once
// loaded, so the cache hands out `Arc` clones keyed by model path.
// Acquisition is idempotent: the first caller pays the load under the write
// lock, everyone after takes the read path.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use log::info;
use whisper_rs::{WhisperContext, WhisperContextParameters};

use crate::error::PipelineError;

fn gpu_enabled() -> bool {
    cfg!(target_os = "macos") || cfg!(feature = "cuda") || cfg!(feature = "vulkan")
}

#[derive(Default)]
pub struct ModelCache {
    contexts: RwLock<HashMap<String, Arc<WhisperContext>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the context for `model_path`, loading it on first request.
    /// Repeated requests for the same path are no-ops after the first.
    pub fn acquire(&self, model_path: &str) -> Result<Arc<WhisperContext>, PipelineError> {
        if let Some(ctx) = self
            .contexts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(model_path)
        {
            return Ok(ctx.clone());
        }

        let mut contexts = self.contexts.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have loaded it while we waited for the lock.
        if let Some(ctx) = contexts.get(model_path) {
            return Ok(ctx.clone());
        }

        info!("Loading whisper model: {}", model_path);
        let params = WhisperContextParameters {
            use_gpu: gpu_enabled(),
            ..Default::default()
        };
        let ctx = WhisperContext::new_with_params(model_path, params).map_err(|e| {
            PipelineError::ModelUnavailable {
                model: model_path.to_string(),
                reason: e.to_string(),
            }
        })?;

        let ctx = Arc::new(ctx);
        contexts.insert(model_path.to_string(), ctx.clone());
        info!("Whisper model resident: {}", model_path);
        Ok(ctx)
    }

    pub fn is_loaded(&self, model_path: &str) -> bool {
        self.contexts
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(model_path)
    }
}
