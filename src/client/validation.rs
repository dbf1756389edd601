//! Local structural checks run before any network I/O.

use crate::config::ServiceId;
use crate::{Error, ErrorContext, Result};
use base64::Engine;
use serde_json::{Map, Value};

fn invalid(service: ServiceId, field: &str, msg: impl Into<String>) -> Error {
    Error::validation_with_context(
        msg,
        ErrorContext::new()
            .with_service(service)
            .with_field_path(format!("input.{}", field)),
    )
}

pub(crate) fn validate_text(service: ServiceId, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(invalid(
            service,
            "text",
            "text must be a non-empty string (whitespace only is rejected)",
        ));
    }
    Ok(())
}

/// The payload is sent as given, so it must decode exactly as given:
/// surrounding whitespace or line breaks are rejected.
pub(crate) fn validate_audio_base64(service: ServiceId, audio: &str) -> Result<()> {
    if audio.trim().is_empty() {
        return Err(invalid(
            service,
            "audio_base64",
            "audio must be a non-empty base64 string",
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(audio)
        .map_err(|e| {
            invalid(
                service,
                "audio_base64",
                format!("audio must be valid base64 encoded data ({})", e),
            )
        })?;
    Ok(())
}

pub(crate) fn validate_sample_rate(service: ServiceId, sample_rate: Option<u32>) -> Result<()> {
    if sample_rate == Some(0) {
        return Err(invalid(
            service,
            "sample_rate",
            "sample_rate must be a positive integer",
        ));
    }
    Ok(())
}

/// Overrides may add fields but never shadow the primary ones.
pub(crate) fn validate_overrides(
    service: ServiceId,
    overrides: &Map<String, Value>,
    reserved: &[&str],
) -> Result<()> {
    for key in reserved {
        if overrides.contains_key(*key) {
            return Err(invalid(
                service,
                key,
                format!("'{}' cannot be passed as an override", key),
            ));
        }
    }
    Ok(())
}
