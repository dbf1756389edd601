//! TTS (Text-to-Speech) types.

use crate::{Error, ErrorContext, Result};
use base64::Engine;
use serde_json::{Map, Value};

/// One synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    /// Extra model parameters merged into the request input (e.g. `voice`, `format`).
    pub overrides: Map<String, Value>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            overrides: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn voice(self, voice: impl Into<String>) -> Self {
        self.with_option("voice", voice.into())
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.with_option("format", format.into())
    }
}

impl From<&str> for SynthesisRequest {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SynthesisRequest {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// Synthesized audio plus whatever else the endpoint reported.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisResult {
    /// Base64-encoded audio payload, never empty.
    pub audio: String,
    pub metadata: Map<String, Value>,
    pub job_id: Option<String>,
}

impl SynthesisResult {
    /// Decode the base64 audio into raw bytes.
    pub fn decode_audio(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.audio.trim())
            .map_err(|e| {
                Error::validation_with_context(
                    format!("audio is not valid base64: {}", e),
                    ErrorContext::new().with_field_path("audio"),
                )
            })
    }
}
