//! STT (Speech-to-Text) types.

use base64::Engine;
use serde_json::{Map, Value};

/// One transcription call.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionRequest {
    /// Base64-encoded audio payload.
    pub audio_base64: String,
    pub sample_rate: Option<u32>,
    /// Extra model parameters merged into the request input (e.g. `language`).
    pub overrides: Map<String, Value>,
}

impl TranscriptionRequest {
    pub fn new(audio_base64: impl Into<String>) -> Self {
        Self {
            audio_base64: audio_base64.into(),
            sample_rate: None,
            overrides: Map::new(),
        }
    }

    /// Encode raw audio bytes (WAV, Opus, PCM...) as the request payload.
    pub fn from_bytes(audio: &[u8]) -> Self {
        Self::new(base64::engine::general_purpose::STANDARD.encode(audio))
    }

    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = Some(sample_rate);
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }
}

impl From<&str> for TranscriptionRequest {
    fn from(audio_base64: &str) -> Self {
        Self::new(audio_base64)
    }
}

impl From<String> for TranscriptionRequest {
    fn from(audio_base64: String) -> Self {
        Self::new(audio_base64)
    }
}

/// Transcribed text plus whatever else the endpoint reported.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub transcription: String,
    pub metadata: Map<String, Value>,
    pub job_id: Option<String>,
}
