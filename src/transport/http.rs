use crate::client::endpoint::ResolvedEndpoint;
use crate::config::{ClientConfig, ServiceId};
use crate::{Error, Result};
use reqwest::{Proxy, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Correlation id header attached to every outbound call.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A pooled HTTP context bound to one resolved endpoint.
///
/// `reqwest::Client` is internally reference counted and safe for many
/// concurrent in-flight requests. The connection pool is released when the
/// last clone is dropped.
pub struct Session {
    client: reqwest::Client,
    endpoint: ResolvedEndpoint,
}

impl Session {
    pub(crate) fn open(endpoint: ResolvedEndpoint, config: &ClientConfig) -> Result<Self> {
        let service = endpoint.service;
        let mut builder = reqwest::Client::builder()
            .default_headers(endpoint.headers.clone())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(config.pool_idle_timeout))
            // Conservative HTTP/2 keepalive defaults for long-lived connections.
            .http2_adaptive_window(true)
            .http2_keep_alive_interval(Some(Duration::from_secs(30)))
            .http2_keep_alive_timeout(Duration::from_secs(10));

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy URL: {}", e),
                    crate::ErrorContext::new()
                        .with_service(service)
                        .with_field_path("proxy_url"),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to create HTTP client: {}", e),
                crate::ErrorContext::new().with_service(service),
            )
        })?;

        Ok(Self { client, endpoint })
    }

    pub fn service(&self) -> ServiceId {
        self.endpoint.service
    }

    pub fn endpoint(&self) -> &ResolvedEndpoint {
        &self.endpoint
    }

    /// POST `{"input": ...}` to the synchronous-run path. Returns the HTTP
    /// status alongside the decoded body.
    pub async fn run_sync(&self, body: &Value) -> Result<(u16, Value)> {
        let url = self.endpoint.run_url();
        let request_id = Uuid::new_v4().to_string();
        debug!(service = %self.service(), %url, %request_id, "dispatching run-sync request");

        let response = self
            .client
            .post(&url)
            .header(REQUEST_ID_HEADER, &request_id)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        self.read_json(response).await
    }

    /// GET the endpoint's health probe path.
    pub async fn probe(&self) -> Result<Value> {
        let url = self.endpoint.probe_url();
        debug!(service = %self.service(), %url, "probing endpoint");

        let response = self
            .client
            .get(&url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let (_, body) = self.read_json(response).await?;
        Ok(body)
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        let cause = if e.is_timeout() {
            "request timed out"
        } else if e.is_connect() {
            "failed to connect"
        } else {
            "request failed"
        };
        warn!(service = %self.service(), error = %e, "{}", cause);
        Error::transport(self.service(), format!("{}: {}", cause, e))
    }

    async fn read_json(&self, response: reqwest::Response) -> Result<(u16, Value)> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(service = %self.service(), status = status.as_u16(), "credentials rejected");
            return Err(Error::authentication(
                self.service(),
                status.as_u16(),
                upstream_message(status, &text),
            ));
        }

        if !status.is_success() {
            warn!(service = %self.service(), status = status.as_u16(), "upstream error");
            return Err(Error::api(
                self.service(),
                status.as_u16(),
                upstream_message(status, &text),
            ));
        }

        // Non-JSON success bodies are passed through as text.
        let body =
            serde_json::from_str(&text).unwrap_or_else(|_| serde_json::json!({ "response": text }));
        Ok((status.as_u16(), body))
    }
}

/// Best-effort extraction of an upstream error message.
pub(crate) fn upstream_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        match json.get("error") {
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            Some(Value::Object(obj)) => {
                if let Some(Value::String(s)) = obj.get("message") {
                    return s.clone();
                }
            }
            _ => {}
        }
        if let Some(Value::String(s)) = json.get("message") {
            return s.clone();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), body)
    }
}
