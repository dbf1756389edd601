//! Endpoint resolution: EndpointConfig -> (base URL, default headers, paths).
//!
//! Resolution is pure: it performs no I/O and holds no state.

use crate::config::{EndpointConfig, EndpointMode, ServiceId};
use crate::{Error, ErrorContext, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use url::Url;

/// Path that runs one job and returns its output in the same exchange.
pub const RUNSYNC_PATH: &str = "/runsync";
/// Health probe path on the managed gateway.
pub const MANAGED_PROBE_PATH: &str = "/health";
/// Health probe path on self-hosted servers.
pub const LOCAL_PROBE_PATH: &str = "/ping";

/// A concrete target for one logical service.
#[derive(Clone, PartialEq)]
pub struct ResolvedEndpoint {
    pub service: ServiceId,
    pub mode: EndpointMode,
    pub base_url: String,
    pub headers: HeaderMap,
    pub run_path: &'static str,
    pub probe_path: &'static str,
}

impl ResolvedEndpoint {
    pub fn run_url(&self) -> String {
        format!("{}{}", self.base_url, self.run_path)
    }

    pub fn probe_url(&self) -> String {
        format!("{}{}", self.base_url, self.probe_path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.headers.contains_key(AUTHORIZATION)
    }
}

impl std::fmt::Debug for ResolvedEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedEndpoint")
            .field("service", &self.service)
            .field("mode", &self.mode)
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

fn config_error(service: ServiceId, field: &str, msg: impl Into<String>) -> Error {
    Error::configuration_with_context(
        msg,
        ErrorContext::new()
            .with_service(service)
            .with_field_path(format!("endpoints.{}.{}", service, field)),
    )
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_http_url(service: ServiceId, field: &str, raw: &str) -> Result<String> {
    let url = Url::parse(raw)
        .map_err(|e| config_error(service, field, format!("invalid URL '{}': {}", raw, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(config_error(
            service,
            field,
            format!("unsupported URL scheme '{}'", url.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

/// Resolve one service's endpoint against the managed gateway.
pub fn resolve(
    service: ServiceId,
    config: &EndpointConfig,
    managed_gateway: &str,
) -> Result<ResolvedEndpoint> {
    let identifier = non_empty(&config.identifier);
    let base_url = non_empty(&config.base_url);

    match (identifier, base_url) {
        (Some(_), Some(_)) => {
            return Err(config_error(
                service,
                "identifier",
                "both identifier and base_url are set; exactly one is allowed",
            ))
        }
        (None, None) => {
            return Err(config_error(
                service,
                "identifier",
                "neither identifier nor base_url is set",
            ))
        }
        _ => {}
    }

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    match config.mode {
        EndpointMode::Managed => {
            let id = identifier.ok_or_else(|| {
                config_error(service, "identifier", "managed endpoints require an identifier")
            })?;
            if id.contains('/') {
                return Err(config_error(
                    service,
                    "identifier",
                    format!("identifier '{}' must not contain '/'", id),
                ));
            }
            let credential = non_empty(&config.credential).ok_or_else(|| {
                config_error(service, "credential", "managed endpoints require a credential")
            })?;
            let mut auth = HeaderValue::from_str(&format!("Bearer {}", credential))
                .map_err(|_| config_error(service, "credential", "credential is not a valid header value"))?;
            auth.set_sensitive(true);
            headers.insert(AUTHORIZATION, auth);

            let gateway = parse_http_url(service, "managed_gateway", managed_gateway)?;
            Ok(ResolvedEndpoint {
                service,
                mode: EndpointMode::Managed,
                base_url: format!("{}/{}", gateway, id),
                headers,
                run_path: RUNSYNC_PATH,
                probe_path: MANAGED_PROBE_PATH,
            })
        }
        EndpointMode::Local => {
            let raw = base_url.ok_or_else(|| {
                config_error(service, "base_url", "local endpoints require a base_url")
            })?;
            if non_empty(&config.credential).is_some() {
                return Err(config_error(
                    service,
                    "credential",
                    "local endpoints do not take a credential",
                ));
            }
            Ok(ResolvedEndpoint {
                service,
                mode: EndpointMode::Local,
                base_url: parse_http_url(service, "base_url", raw)?,
                headers,
                run_path: RUNSYNC_PATH,
                probe_path: LOCAL_PROBE_PATH,
            })
        }
    }
}
