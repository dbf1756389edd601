//! Decoding of synchronous-run responses.
//!
//! Managed endpoints wrap results in a job envelope
//! (`{"id", "status", "output", ...}`); self-hosted servers usually answer
//! with the output object directly. Both are accepted. A top-level `status`
//! only marks an envelope when it is one of the job states below.

use crate::config::ServiceId;
use crate::{Error, Result};
use serde_json::{Map, Value};

/// Output of a completed job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutput {
    /// HTTP status of the response that carried the job.
    pub http_status: u16,
    pub job_id: Option<String>,
    pub output: Map<String, Value>,
}

const JOB_STATES: &[&str] = &[
    "COMPLETED",
    "FAILED",
    "CANCELLED",
    "TIMED_OUT",
    "IN_QUEUE",
    "IN_PROGRESS",
];

impl JobOutput {
    /// Remove and return the required string field `field`; the rest stays as metadata.
    pub fn take_string(&mut self, service: ServiceId, field: &str) -> Result<String> {
        match self.output.remove(field) {
            Some(Value::String(s)) => Ok(s),
            Some(other) => Err(Error::malformed_response(
                service,
                Some(self.http_status),
                format!("field '{}' is not a string (got {})", field, type_name(&other)),
            )),
            None => Err(Error::malformed_response(
                service,
                Some(self.http_status),
                format!("response has no '{}' field", field),
            )),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn error_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some(Value::Object(obj.clone()).to_string())),
        other => Some(other.to_string()),
    }
}

/// Unwrap a run-sync body, received with `http_status`, into the job's output object.
pub fn unwrap_output(service: ServiceId, http_status: u16, body: Value) -> Result<JobOutput> {
    let status = Some(http_status);
    let Value::Object(mut envelope) = body else {
        return Err(Error::malformed_response(
            service,
            status,
            "response body is not a JSON object",
        ));
    };

    let job_id = envelope
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string);

    let job_state = envelope
        .get("status")
        .and_then(Value::as_str)
        .filter(|s| JOB_STATES.contains(s))
        .map(str::to_string);

    let output = match job_state.as_deref() {
        Some("COMPLETED") => envelope.remove("output").unwrap_or(Value::Null),
        Some(state @ ("FAILED" | "CANCELLED" | "TIMED_OUT")) => {
            let message = error_text(envelope.get("error"))
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(Error::Api {
                service: service.to_string(),
                kind: crate::ApiErrorKind::Upstream,
                status,
                message: format!("job {} {}: {}", job_id.as_deref().unwrap_or("?"), state, message),
            });
        }
        Some(state) => {
            return Err(Error::malformed_response(
                service,
                status,
                format!(
                    "job {} did not finish within the synchronous window (status {})",
                    job_id.as_deref().unwrap_or("?"),
                    state
                ),
            ));
        }
        // Not a job envelope: a nested `output` object or the body itself.
        None => match envelope.remove("output") {
            Some(output @ Value::Object(_)) => output,
            Some(other) => {
                envelope.insert("output".to_string(), other);
                Value::Object(envelope)
            }
            None => Value::Object(envelope),
        },
    };

    let output = match output {
        Value::Object(output) => output,
        other => {
            return Err(Error::malformed_response(
                service,
                status,
                format!("job output is not an object (got {})", type_name(&other)),
            ));
        }
    };

    if let Some(message) = error_text(output.get("error")) {
        return Err(Error::Api {
            service: service.to_string(),
            kind: crate::ApiErrorKind::Upstream,
            status,
            message,
        });
    }

    Ok(JobOutput {
        http_status,
        job_id,
        output,
    })
}
