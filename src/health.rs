//! Concurrent connectivity probes across every configured service.

use crate::config::ServiceId;
use crate::transport::SessionManager;
use crate::{ErrorKind, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::warn;

/// Outcome of probing one service. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PingResult {
    Ok {
        #[serde(rename = "latency_ms", serialize_with = "as_millis")]
        latency: Duration,
        /// Body returned by the probe endpoint.
        response: Value,
    },
    Error {
        message: String,
        #[serde(skip)]
        kind: Option<ErrorKind>,
    },
}

fn as_millis<S: serde::Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl PingResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, PingResult::Ok { .. })
    }

    pub fn latency(&self) -> Option<Duration> {
        match self {
            PingResult::Ok { latency, .. } => Some(*latency),
            PingResult::Error { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            PingResult::Error { message, .. } => Some(message),
            PingResult::Ok { .. } => None,
        }
    }
}

/// Per-service report, always one entry per configured service.
pub type HealthReport = BTreeMap<ServiceId, PingResult>;

async fn probe_one(sessions: &SessionManager, service: ServiceId) -> Result<(Duration, Value)> {
    let session = sessions.acquire(service)?;
    let started = Instant::now();
    let response = session.probe().await?;
    Ok((started.elapsed(), response))
}

/// Probe every configured service concurrently.
pub async fn ping_all(sessions: &SessionManager) -> HealthReport {
    let services = sessions.configured_services();
    let probes = services.iter().map(|service| probe_one(sessions, *service));
    let outcomes = futures::future::join_all(probes).await;

    services
        .into_iter()
        .zip(outcomes)
        .map(|(service, outcome)| {
            let result = match outcome {
                Ok((latency, response)) => PingResult::Ok { latency, response },
                Err(e) => {
                    warn!(%service, error = %e, "health probe failed");
                    PingResult::Error {
                        message: e.to_string(),
                        kind: Some(e.kind()),
                    }
                }
            };
            (service, result)
        })
        .collect()
}
