//! Per-service session pool.
//!
//! - At most one live session per service
//! - Sessions are created lazily on first acquire
//! - Reconfiguring a service drops its cached session
//! - After `close_all` nothing is ever reopened

use super::http::Session;
use crate::client::endpoint;
use crate::config::{ClientConfig, EndpointConfig, ServiceId};
use crate::{Error, ErrorContext, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Snapshot of session pool state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Sessions currently cached.
    pub open: usize,
    /// Sessions created over the client's lifetime.
    pub created: u64,
    /// Sessions released by reconfiguration or close.
    pub released: u64,
    pub closed: bool,
}

#[derive(Debug)]
struct State {
    config: ClientConfig,
    sessions: HashMap<ServiceId, Arc<Session>>,
    closed: bool,
}

pub struct SessionManager {
    state: Mutex<State>,
    created: AtomicU64,
    released: AtomicU64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", self.endpoint())
            .finish()
    }
}

fn closed_error(service: Option<ServiceId>) -> Error {
    let mut ctx = ErrorContext::new().with_details("client has been closed");
    if let Some(service) = service {
        ctx = ctx.with_service(service);
    }
    Error::configuration_with_context("client is closed", ctx)
}

fn usable_endpoint(st: &State, service: ServiceId) -> Result<&EndpointConfig> {
    if st.closed {
        return Err(closed_error(Some(service)));
    }
    st.config.endpoint(service).ok_or_else(|| {
        Error::configuration_with_context(
            format!("service '{}' is not configured", service),
            ErrorContext::new()
                .with_service(service)
                .with_field_path(format!("endpoints.{}", service)),
        )
    })
}

impl SessionManager {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            state: Mutex::new(State {
                config,
                sessions: HashMap::new(),
                closed: false,
            }),
            created: AtomicU64::new(0),
            released: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            Error::configuration_with_context(
                "session pool poisoned",
                ErrorContext::new().with_details("a thread panicked while holding the pool"),
            )
        })
    }

    /// Return the pooled session for `service`, opening it on first use.
    ///
    /// The lock is held across creation, so concurrent first calls observe a
    /// single session. Creation never awaits.
    pub fn acquire(&self, service: ServiceId) -> Result<Arc<Session>> {
        let mut st = self.lock()?;
        let endpoint_config = usable_endpoint(&st, service)?;
        if let Some(session) = st.sessions.get(&service) {
            return Ok(session.clone());
        }
        let resolved = endpoint::resolve(service, endpoint_config, &st.config.managed_gateway)?;
        let session = Arc::new(Session::open(resolved, &st.config)?);

        self.created.fetch_add(1, Ordering::Relaxed);
        debug!(%service, base_url = %session.endpoint().base_url, "opened session");
        st.sessions.insert(service, session.clone());
        Ok(session)
    }

    /// Fail with a configuration error if the pool is closed or `service` has
    /// no endpoint. Opens nothing.
    pub fn ensure_usable(&self, service: ServiceId) -> Result<()> {
        let st = self.lock()?;
        usable_endpoint(&st, service).map(|_| ())
    }

    /// Whether `service` has an endpoint configured.
    pub fn is_configured(&self, service: ServiceId) -> bool {
        self.lock()
            .map(|st| st.config.endpoints.contains_key(&service))
            .unwrap_or(false)
    }

    pub fn configured_services(&self) -> Vec<ServiceId> {
        self.lock()
            .map(|st| st.config.endpoints.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn config(&self) -> Result<ClientConfig> {
        Ok(self.lock()?.config.clone())
    }

    /// Replace (or remove, with `None`) a service's endpoint.
    ///
    /// The new endpoint is resolved before anything changes, so an invalid
    /// configuration leaves the previous one in place. The cached session for
    /// the service is dropped; calls already holding it run to completion.
    pub fn reconfigure(&self, service: ServiceId, endpoint: Option<EndpointConfig>) -> Result<()> {
        let mut st = self.lock()?;
        if st.closed {
            return Err(closed_error(Some(service)));
        }
        match endpoint {
            Some(cfg) => {
                endpoint::resolve(service, &cfg, &st.config.managed_gateway)?;
                st.config.endpoints.insert(service, cfg);
            }
            None => {
                st.config.endpoints.remove(&service);
            }
        }
        if st.sessions.remove(&service).is_some() {
            self.released.fetch_add(1, Ordering::Relaxed);
        }
        info!(%service, "service reconfigured");
        Ok(())
    }

    /// Release every session. Returns how many were released; a second call
    /// returns 0.
    pub fn close_all(&self) -> usize {
        // A poisoned pool is still closed; the flag must stick.
        let mut st = match self.state.lock() {
            Ok(st) => st,
            Err(poisoned) => poisoned.into_inner(),
        };
        if st.closed {
            return 0;
        }
        st.closed = true;
        let released = st.sessions.len();
        st.sessions.clear();
        self.released.fetch_add(released as u64, Ordering::Relaxed);
        info!(sessions = released, "closed client sessions");
        released
    }

    pub fn is_closed(&self) -> bool {
        match self.state.lock() {
            Ok(st) => st.closed,
            Err(poisoned) => poisoned.into_inner().closed,
        }
    }

    pub fn stats(&self) -> SessionStats {
        let (open, closed) = match self.state.lock() {
            Ok(st) => (st.sessions.len(), st.closed),
            Err(poisoned) => {
                let st = poisoned.into_inner();
                (st.sessions.len(), st.closed)
            }
        };
        SessionStats {
            open,
            created: self.created.load(Ordering::Relaxed),
            released: self.released.load(Ordering::Relaxed),
            closed,
        }
    }
}
