use crate::config::{ClientConfig, EndpointConfig, Language, ServiceId};
use crate::health::{self, HealthReport};
use crate::stt::SttClient;
use crate::transport::{SessionManager, SessionStats};
use crate::tts::TtsClient;
use crate::{Error, ErrorContext, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

/// Entry point: owns the configuration and one pooled session per service.
///
/// Sessions open lazily on first use and are all released by [`close`](Self::close)
/// or when the client is dropped. Proxies returned by [`tts`](Self::tts) /
/// [`asr`](Self::asr) borrow the client and cannot outlive it.
pub struct SenVoice {
    sessions: SessionManager,
    /// Credential reused by [`configure_managed`](Self::configure_managed).
    default_credential: Option<String>,
}

impl std::fmt::Debug for SenVoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenVoice")
            .field("services", &self.sessions.configured_services())
            .field("stats", &self.sessions.stats())
            .finish()
    }
}

impl SenVoice {
    /// Create a client. Every endpoint is validated; no connection is opened.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_default_credential(config, None)
    }

    pub(crate) fn with_default_credential(
        config: ClientConfig,
        default_credential: Option<String>,
    ) -> Result<Self> {
        for (service, endpoint) in &config.endpoints {
            crate::client::endpoint::resolve(*service, endpoint, &config.managed_gateway)?;
        }
        info!(
            services = config.endpoints.len(),
            "senvoice client created"
        );
        Ok(Self {
            sessions: SessionManager::new(config),
            default_credential,
        })
    }

    pub fn builder() -> crate::client::builder::SenVoiceBuilder {
        crate::client::builder::SenVoiceBuilder::new()
    }

    /// Create a client from `SENVOICE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let credential = std::env::var("SENVOICE_API_KEY").ok();
        Self::with_default_credential(ClientConfig::from_env()?, credential)
    }

    /// Run `body` with a fresh client and close it afterwards, whatever the
    /// outcome (including panics and cancellation of the returned future).
    pub async fn scope<F, Fut, T>(config: ClientConfig, body: F) -> Result<T>
    where
        F: FnOnce(Arc<SenVoice>) -> Fut,
        Fut: Future<Output = T>,
    {
        let client = Arc::new(SenVoice::new(config)?);
        let _guard = CloseGuard(Arc::clone(&client));
        Ok(body(client).await)
    }

    /// Unified text-to-speech service.
    pub fn tts(&self) -> TtsClient<'_> {
        TtsClient::new(&self.sessions, ServiceId::TTS)
    }

    /// Unified speech-recognition service.
    pub fn asr(&self) -> SttClient<'_> {
        SttClient::new(&self.sessions, ServiceId::ASR)
    }

    /// Language-specific text-to-speech service (`tts_fr`, `tts_wo`).
    pub fn tts_for(&self, language: Language) -> TtsClient<'_> {
        TtsClient::new(&self.sessions, ServiceId::tts(language))
    }

    /// Language-specific speech-recognition service (`stt_fr`, `stt_wo`).
    pub fn stt_for(&self, language: Language) -> SttClient<'_> {
        SttClient::new(&self.sessions, ServiceId::stt(language))
    }

    /// Replace a service's endpoint. The next call opens a fresh session
    /// bound to the new target.
    pub fn configure(&self, service: ServiceId, endpoint: EndpointConfig) -> Result<()> {
        self.sessions.reconfigure(service, Some(endpoint))
    }

    /// Point a service at a managed endpoint id, reusing the client's credential.
    pub fn configure_managed(&self, service: ServiceId, identifier: &str) -> Result<()> {
        if identifier.trim().is_empty() {
            return Err(Error::validation_with_context(
                "endpoint identifier cannot be empty",
                ErrorContext::new()
                    .with_service(service)
                    .with_field_path("identifier"),
            ));
        }
        let credential = self.default_credential.clone().ok_or_else(|| {
            Error::configuration_with_context(
                "an API key is required for managed endpoints",
                ErrorContext::new()
                    .with_service(service)
                    .with_field_path("credential"),
            )
        })?;
        self.configure(service, EndpointConfig::managed(identifier, credential))
    }

    pub fn configure_local(&self, service: ServiceId, base_url: &str) -> Result<()> {
        self.configure(service, EndpointConfig::local(base_url))
    }

    /// Make a service unconfigured; later calls to it fail fast.
    pub fn remove_endpoint(&self, service: ServiceId) -> Result<()> {
        self.sessions.reconfigure(service, None)
    }

    pub fn is_configured(&self, service: ServiceId) -> bool {
        self.sessions.is_configured(service)
    }

    pub fn configured_services(&self) -> Vec<ServiceId> {
        self.sessions.configured_services()
    }

    /// Current configuration, including any runtime changes.
    pub fn config(&self) -> Result<ClientConfig> {
        self.sessions.config()
    }

    /// Probe every configured service concurrently. Never fails: each entry
    /// is either ok (with latency) or an error message.
    pub async fn ping_all(&self) -> HealthReport {
        health::ping_all(&self.sessions).await
    }

    /// Release every session. Idempotent; returns how many sessions were
    /// released by this call. Any later proxy call fails with a
    /// configuration error.
    pub fn close(&self) -> usize {
        self.sessions.close_all()
    }

    pub fn is_closed(&self) -> bool {
        self.sessions.is_closed()
    }

    pub fn session_stats(&self) -> SessionStats {
        self.sessions.stats()
    }
}

impl Drop for SenVoice {
    fn drop(&mut self) {
        self.sessions.close_all();
    }
}

struct CloseGuard(Arc<SenVoice>);

impl Drop for CloseGuard {
    fn drop(&mut self) {
        self.0.close();
    }
}
