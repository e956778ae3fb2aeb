// Configuration service: dotted-key lookups over a JSON document.
//
// Environment variables override credential-shaped keys so secrets never
// have to live in the config file. Locking is internal; callers only see
// get/set.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::error::PipelineError;

/// Dotted keys that may be supplied via the environment instead of the
/// config file. The environment wins when set and non-empty.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("api.huggingface_token", "HUGGINGFACE_TOKEN"),
    ("whisper.elevenlabs_api_key", "ELEVENLABS_API_KEY"),
];

pub struct ConfigService {
    path: PathBuf,
    doc: Mutex<Value>,
}

impl ConfigService {
    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path)?;
        let doc: Value = serde_json::from_str(&raw)?;
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// In-memory service with no backing file. `set` skips persistence.
    pub fn from_value(doc: Value) -> Self {
        Self {
            path: PathBuf::new(),
            doc: Mutex::new(doc),
        }
    }

    /// Look up a dotted key, e.g. `"whisper.model"`.
    pub fn get(&self, key: &str) -> Result<Value, PipelineError> {
        if let Some((_, var)) = ENV_OVERRIDES.iter().find(|(k, _)| *k == key) {
            if let Ok(val) = std::env::var(var) {
                if !val.trim().is_empty() {
                    return Ok(Value::String(val));
                }
            }
        }

        let doc = self.doc.lock().unwrap_or_else(|e| e.into_inner());
        let mut current = &*doc;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| PipelineError::ConfigKeyMissing {
                    key: key.to_string(),
                })?;
        }
        Ok(current.clone())
    }

    pub fn get_str(&self, key: &str) -> Result<String, PipelineError> {
        match self.get(key)? {
            Value::String(s) => Ok(s),
            _ => Err(PipelineError::ConfigTypeMismatch {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, PipelineError> {
        self.get(key)?
            .as_f64()
            .ok_or_else(|| PipelineError::ConfigTypeMismatch {
                key: key.to_string(),
                expected: "number",
            })
    }

    /// Replace the value at an existing dotted key and write the document
    /// back to disk. The key must already exist; this mirrors `get` failing
    /// on unknown keys rather than growing the document silently.
    pub fn set(&self, key: &str, value: Value) -> Result<(), PipelineError> {
        let mut doc = self.doc.lock().unwrap_or_else(|e| e.into_inner());

        let parts: Vec<&str> = key.split('.').collect();
        let mut current = &mut *doc;
        for part in &parts[..parts.len() - 1] {
            current = current
                .get_mut(*part)
                .ok_or_else(|| PipelineError::ConfigKeyMissing {
                    key: key.to_string(),
                })?;
        }

        let last = parts[parts.len() - 1];
        match current {
            Value::Object(map) if map.contains_key(last) => {
                map.insert(last.to_string(), value);
            }
            _ => {
                return Err(PipelineError::ConfigKeyMissing {
                    key: key.to_string(),
                })
            }
        }

        if !self.path.as_os_str().is_empty() {
            std::fs::write(&self.path, serde_json::to_string_pretty(&*doc)?)?;
        }
        Ok(())
    }
}
