//! Client configuration: logical services, per-service endpoints, and transport knobs.
//!
//! A [`ClientConfig`] can be assembled in code, deserialized from YAML, or read
//! from `SENVOICE_*` environment variables.

use crate::{Error, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default gateway for managed (serverless) endpoints.
pub const DEFAULT_MANAGED_GATEWAY: &str = "https://api.runpod.ai/v2";

/// Sample rate applied to Wolof ASR requests that do not carry one.
pub const WOLOF_DEFAULT_SAMPLE_RATE: u32 = 16_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Tts,
    Asr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    French,
    Wolof,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::French => "fr",
            Language::Wolof => "wo",
        }
    }
}

/// Logical service key.
///
/// Unified services (`tts`, `asr`) detect the language server-side. The
/// language-specific variants (`tts_fr`, `tts_wo`, `stt_fr`, `stt_wo`) address
/// one model per language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceId {
    pub capability: Capability,
    pub language: Option<Language>,
}

impl ServiceId {
    pub const TTS: ServiceId = ServiceId {
        capability: Capability::Tts,
        language: None,
    };
    pub const ASR: ServiceId = ServiceId {
        capability: Capability::Asr,
        language: None,
    };

    pub const fn tts(language: Language) -> Self {
        Self {
            capability: Capability::Tts,
            language: Some(language),
        }
    }

    pub const fn stt(language: Language) -> Self {
        Self {
            capability: Capability::Asr,
            language: Some(language),
        }
    }

    /// Whether requests to this service get the 16 kHz sample-rate default.
    pub fn defaults_wolof_sample_rate(&self) -> bool {
        self.capability == Capability::Asr && self.language == Some(Language::Wolof)
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.capability, self.language) {
            (Capability::Tts, None) => f.write_str("tts"),
            (Capability::Asr, None) => f.write_str("asr"),
            (Capability::Tts, Some(lang)) => write!(f, "tts_{}", lang.code()),
            (Capability::Asr, Some(lang)) => write!(f, "stt_{}", lang.code()),
        }
    }
}

impl FromStr for ServiceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tts" => Ok(ServiceId::TTS),
            "asr" | "stt" => Ok(ServiceId::ASR),
            "tts_fr" => Ok(ServiceId::tts(Language::French)),
            "tts_wo" => Ok(ServiceId::tts(Language::Wolof)),
            "stt_fr" | "asr_fr" => Ok(ServiceId::stt(Language::French)),
            "stt_wo" | "asr_wo" => Ok(ServiceId::stt(Language::Wolof)),
            other => Err(Error::configuration_with_context(
                format!("unknown service name '{}'", other),
                ErrorContext::new()
                    .with_field_path("endpoints")
                    .with_details("expected one of tts, asr, tts_fr, tts_wo, stt_fr, stt_wo"),
            )),
        }
    }
}

impl TryFrom<String> for ServiceId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ServiceId> for String {
    fn from(value: ServiceId) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointMode {
    /// Serverless platform endpoint, addressed by id, bearer-token auth.
    Managed,
    /// Self-hosted server, addressed by URL, no auth.
    Local,
}

/// Where one logical service lives.
///
/// Exactly one of `identifier` / `base_url` must be set, consistent with
/// `mode`. The invariant is checked when the endpoint is resolved.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub mode: EndpointMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl EndpointConfig {
    pub fn managed(identifier: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            mode: EndpointMode::Managed,
            identifier: Some(identifier.into()),
            base_url: None,
            credential: Some(credential.into()),
        }
    }

    pub fn local(base_url: impl Into<String>) -> Self {
        Self {
            mode: EndpointMode::Local,
            identifier: None,
            base_url: Some(base_url.into()),
            credential: None,
        }
    }
}

// Keep credentials out of logs.
impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("mode", &self.mode)
            .field("identifier", &self.identifier)
            .field("base_url", &self.base_url)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn default_gateway() -> String {
    DEFAULT_MANAGED_GATEWAY.to_string()
}

fn default_pool_max_idle() -> usize {
    32
}

fn default_pool_idle_timeout() -> Duration {
    Duration::from_secs(90)
}

/// Full client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub endpoints: BTreeMap<ServiceId, EndpointConfig>,
    #[serde(default = "default_gateway")]
    pub managed_gateway: String,
    /// Total per-request timeout. `None` leaves deadlines to the caller.
    #[serde(default, with = "opt_secs")]
    pub timeout: Option<Duration>,
    #[serde(default, with = "opt_secs")]
    pub connect_timeout: Option<Duration>,
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,
    #[serde(default = "default_pool_idle_timeout", with = "secs")]
    pub pool_idle_timeout: Duration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_url: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            managed_gateway: default_gateway(),
            timeout: None,
            connect_timeout: None,
            pool_max_idle_per_host: default_pool_max_idle(),
            pool_idle_timeout: default_pool_idle_timeout(),
            proxy_url: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, service: ServiceId, endpoint: EndpointConfig) -> Self {
        self.endpoints.insert(service, endpoint);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_managed_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.managed_gateway = gateway.into();
        self
    }

    pub fn endpoint(&self, service: ServiceId) -> Option<&EndpointConfig> {
        self.endpoints.get(&service)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| {
            Error::configuration_with_context(
                format!("invalid client configuration: {}", e),
                ErrorContext::new().with_details("yaml"),
            )
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                format!("failed to read configuration file: {}", e),
                ErrorContext::new().with_details(path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Build a configuration from `SENVOICE_*` environment variables.
    ///
    /// For each unified service a direct URL (`SENVOICE_<SVC>_ENDPOINT`) wins
    /// over a managed id (`SENVOICE_<SVC>_ENDPOINT_ID`).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = ClientConfig::default();
        let api_key = get("SENVOICE_API_KEY");

        for (service, prefix) in [(ServiceId::TTS, "SENVOICE_TTS"), (ServiceId::ASR, "SENVOICE_ASR")] {
            if let Some(url) = get(&format!("{}_ENDPOINT", prefix)) {
                config.endpoints.insert(service, EndpointConfig::local(url));
            } else if let Some(id) = get(&format!("{}_ENDPOINT_ID", prefix)) {
                let credential = api_key.clone().ok_or_else(|| {
                    Error::configuration_with_context(
                        "SENVOICE_API_KEY is required for managed endpoints",
                        ErrorContext::new()
                            .with_service(service)
                            .with_field_path(format!("{}_ENDPOINT_ID", prefix)),
                    )
                })?;
                config
                    .endpoints
                    .insert(service, EndpointConfig::managed(id, credential));
            }
        }

        if let Some(raw) = get("SENVOICE_HTTP_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|_| {
                Error::configuration_with_context(
                    "timeout must be a whole number of seconds",
                    ErrorContext::new()
                        .with_field_path("SENVOICE_HTTP_TIMEOUT_SECS")
                        .with_details(raw.clone()),
                )
            })?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        config.proxy_url = get("SENVOICE_PROXY_URL");
        if let Some(gateway) = get("SENVOICE_MANAGED_GATEWAY") {
            config.managed_gateway = gateway;
        }

        Ok(config)
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

mod opt_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => s.serialize_some(&d.as_secs_f64()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Option::<f64>::deserialize(d)?
            .map(|secs| Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom))
            .transpose()
    }
}
