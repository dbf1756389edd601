use crate::client::core::SenVoice;
use crate::config::{ClientConfig, EndpointConfig, Language, ServiceId};
use crate::{Error, ErrorContext, Result};
use std::collections::BTreeMap;
use std::time::Duration;

/// Builder for creating clients with custom configuration.
///
/// Mirrors the constructor parameters of the service: one API key for managed
/// endpoints, then per service either a managed endpoint id or a direct URL.
/// When both are given for the same service the direct URL wins.
pub struct SenVoiceBuilder {
    config: ClientConfig,
    api_key: Option<String>,
    endpoint_ids: BTreeMap<ServiceId, String>,
    endpoint_urls: BTreeMap<ServiceId, String>,
}

impl SenVoiceBuilder {
    pub fn new() -> Self {
        Self {
            config: ClientConfig::default(),
            api_key: None,
            endpoint_ids: BTreeMap::new(),
            endpoint_urls: BTreeMap::new(),
        }
    }

    /// Start from an existing configuration (e.g. loaded from YAML).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// API key for managed endpoints. Falls back to `SENVOICE_API_KEY`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn tts_endpoint_id(self, id: impl Into<String>) -> Self {
        self.endpoint_id(ServiceId::TTS, id)
    }

    pub fn tts_endpoint(self, url: impl Into<String>) -> Self {
        self.endpoint_url(ServiceId::TTS, url)
    }

    pub fn asr_endpoint_id(self, id: impl Into<String>) -> Self {
        self.endpoint_id(ServiceId::ASR, id)
    }

    pub fn asr_endpoint(self, url: impl Into<String>) -> Self {
        self.endpoint_url(ServiceId::ASR, url)
    }

    pub fn tts_language_endpoint_id(self, language: Language, id: impl Into<String>) -> Self {
        self.endpoint_id(ServiceId::tts(language), id)
    }

    pub fn stt_language_endpoint_id(self, language: Language, id: impl Into<String>) -> Self {
        self.endpoint_id(ServiceId::stt(language), id)
    }

    /// Managed endpoint id for any service.
    pub fn endpoint_id(mut self, service: ServiceId, id: impl Into<String>) -> Self {
        self.endpoint_ids.insert(service, id.into());
        self
    }

    /// Direct (self-hosted) URL for any service.
    pub fn endpoint_url(mut self, service: ServiceId, url: impl Into<String>) -> Self {
        self.endpoint_urls.insert(service, url.into());
        self
    }

    /// Fully specified endpoint for any service.
    pub fn endpoint(mut self, service: ServiceId, endpoint: EndpointConfig) -> Self {
        self.endpoint_ids.remove(&service);
        self.endpoint_urls.remove(&service);
        self.config.endpoints.insert(service, endpoint);
        self
    }

    /// Total per-request timeout. Off by default; callers can also race calls
    /// against their own deadline.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = Some(timeout);
        self
    }

    /// Override the managed platform gateway (private gateways, mock servers).
    pub fn managed_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.config.managed_gateway = gateway.into();
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    pub fn pool_max_idle_per_host(mut self, n: usize) -> Self {
        self.config.pool_max_idle_per_host = n;
        self
    }

    /// Build the client. No connection is opened.
    pub fn build(self) -> Result<SenVoice> {
        let mut config = self.config;
        let api_key = self
            .api_key
            .or_else(|| std::env::var("SENVOICE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty());

        for (service, id) in self.endpoint_ids {
            // A direct URL given to this builder wins over an id.
            if self.endpoint_urls.contains_key(&service) {
                continue;
            }
            let credential = api_key.clone().ok_or_else(|| {
                Error::configuration_with_context(
                    "an API key is required for managed endpoints",
                    ErrorContext::new()
                        .with_service(service)
                        .with_field_path("api_key"),
                )
            })?;
            config
                .endpoints
                .insert(service, EndpointConfig::managed(id, credential));
        }

        for (service, url) in self.endpoint_urls {
            config.endpoints.insert(service, EndpointConfig::local(url));
        }

        SenVoice::with_default_credential(config, api_key)
    }
}

impl Default for SenVoiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
