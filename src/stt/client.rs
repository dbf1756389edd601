//! STT (Speech-to-Text) client.

use super::types::{TranscriptionRequest, TranscriptionResult};
use crate::client::validation;
use crate::config::{ServiceId, WOLOF_DEFAULT_SAMPLE_RATE};
use crate::transport::{runsync, SessionManager};
use crate::Result;
use serde_json::{json, Value};
use tracing::debug;

const AUDIO_FIELD: &str = "audio_base64";
const SAMPLE_RATE_FIELD: &str = "sample_rate";
const TRANSCRIPTION_FIELD: &str = "transcription";

/// Proxy for one speech-recognition service.
#[derive(Clone, Copy)]
pub struct SttClient<'a> {
    sessions: &'a SessionManager,
    service: ServiceId,
}

impl<'a> SttClient<'a> {
    pub(crate) fn new(sessions: &'a SessionManager, service: ServiceId) -> Self {
        Self { sessions, service }
    }

    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Transcribe base64-encoded audio with the endpoint's default parameters.
    pub async fn transcribe(&self, audio_base64: &str) -> Result<TranscriptionResult> {
        self.transcribe_with(TranscriptionRequest::new(audio_base64))
            .await
    }

    pub async fn transcribe_with(
        &self,
        request: TranscriptionRequest,
    ) -> Result<TranscriptionResult> {
        self.sessions.ensure_usable(self.service)?;
        let body = build_body(self.service, request)?;
        let session = self.sessions.acquire(self.service)?;
        debug!(service = %self.service, "transcribing");
        let (status, response) = session.run_sync(&body).await?;
        parse_result(self.service, status, response)
    }

    pub async fn ping(&self) -> Result<Value> {
        self.sessions.acquire(self.service)?.probe().await
    }
}

/// Sample rate actually sent upstream. Only the Wolof variant gets a default,
/// and a caller-supplied value is never replaced.
pub(crate) fn effective_sample_rate(service: ServiceId, requested: Option<u32>) -> Option<u32> {
    match requested {
        Some(rate) => Some(rate),
        None if service.defaults_wolof_sample_rate() => Some(WOLOF_DEFAULT_SAMPLE_RATE),
        None => None,
    }
}

fn build_body(service: ServiceId, request: TranscriptionRequest) -> Result<Value> {
    validation::validate_audio_base64(service, &request.audio_base64)?;
    validation::validate_sample_rate(service, request.sample_rate)?;
    validation::validate_overrides(
        service,
        &request.overrides,
        &[AUDIO_FIELD, SAMPLE_RATE_FIELD],
    )?;

    let mut input = request.overrides;
    input.insert(AUDIO_FIELD.to_string(), Value::String(request.audio_base64));
    if let Some(rate) = effective_sample_rate(service, request.sample_rate) {
        input.insert(SAMPLE_RATE_FIELD.to_string(), json!(rate));
    }
    Ok(json!({ "input": input }))
}

fn parse_result(service: ServiceId, status: u16, response: Value) -> Result<TranscriptionResult> {
    let mut job = runsync::unwrap_output(service, status, response)?;
    // Silence legitimately transcribes to an empty string.
    let transcription = job.take_string(service, TRANSCRIPTION_FIELD)?;
    Ok(TranscriptionResult {
        transcription,
        metadata: job.output,
        job_id: job.job_id,
    })
}
