//! TTS (Text-to-Speech) client.

use super::types::{SynthesisRequest, SynthesisResult};
use crate::client::validation;
use crate::config::ServiceId;
use crate::transport::{runsync, SessionManager};
use crate::{Error, Result};
use serde_json::{json, Value};
use tracing::debug;

const TEXT_FIELD: &str = "text";
const AUDIO_FIELD: &str = "audio";

/// Proxy for one text-to-speech service.
///
/// Borrowed from [`SenVoice`](crate::SenVoice); the session it uses belongs to
/// the client.
#[derive(Clone, Copy)]
pub struct TtsClient<'a> {
    sessions: &'a SessionManager,
    service: ServiceId,
}

impl<'a> TtsClient<'a> {
    pub(crate) fn new(sessions: &'a SessionManager, service: ServiceId) -> Self {
        Self { sessions, service }
    }

    pub fn service(&self) -> ServiceId {
        self.service
    }

    /// Synthesize `text` with the endpoint's default parameters.
    pub async fn synthesize(&self, text: &str) -> Result<SynthesisResult> {
        self.synthesize_with(SynthesisRequest::new(text)).await
    }

    pub async fn synthesize_with(&self, request: SynthesisRequest) -> Result<SynthesisResult> {
        self.sessions.ensure_usable(self.service)?;
        let body = build_body(self.service, request)?;
        let session = self.sessions.acquire(self.service)?;
        debug!(service = %self.service, "synthesizing");
        let (status, response) = session.run_sync(&body).await?;
        parse_result(self.service, status, response)
    }

    /// Connectivity probe for this service alone.
    pub async fn ping(&self) -> Result<Value> {
        self.sessions.acquire(self.service)?.probe().await
    }
}

fn build_body(service: ServiceId, request: SynthesisRequest) -> Result<Value> {
    validation::validate_text(service, &request.text)?;
    validation::validate_overrides(service, &request.overrides, &[TEXT_FIELD])?;

    let mut input = request.overrides;
    input.insert(TEXT_FIELD.to_string(), Value::String(request.text));
    Ok(json!({ "input": input }))
}

fn parse_result(service: ServiceId, status: u16, response: Value) -> Result<SynthesisResult> {
    let mut job = runsync::unwrap_output(service, status, response)?;
    let audio = job.take_string(service, AUDIO_FIELD)?;
    if audio.trim().is_empty() {
        return Err(Error::malformed_response(
            service,
            Some(job.http_status),
            "endpoint returned an empty audio payload",
        ));
    }
    Ok(SynthesisResult {
        audio,
        metadata: job.output,
        job_id: job.job_id,
    })
}
