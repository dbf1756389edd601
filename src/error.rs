use thiserror::Error;

/// Structured error context for configuration and validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Logical service the failure belongs to (e.g., "tts", "stt_wo")
    pub service: Option<String>,
    /// Field path or configuration key that caused the error (e.g., "input.text", "endpoints.asr.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected type, actual value)
    pub details: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            service: None,
            field_path: None,
            details: None,
        }
    }

    pub fn with_service(mut self, service: impl ToString) -> Self {
        self.service = Some(service.to_string());
        self
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Top-level category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Validation,
    Authentication,
    Api,
}

/// Sub-kind of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Upstream answered with a non-2xx status other than 401/403, or a failed job.
    Upstream,
    /// Upstream answered 2xx but the body lacked the expected success shape.
    MalformedResponse,
    /// No HTTP response was ever received (timeout, refused connection, DNS).
    Transport,
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiErrorKind::Upstream => "upstream",
            ApiErrorKind::MalformedResponse => "malformed_response",
            ApiErrorKind::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Unified error type for every proxy call and lifecycle operation.
///
/// Lower-level failures (reqwest, JSON, YAML, I/O) are always mapped into one
/// of these four categories before they reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Authentication error [{service}]: HTTP {status}: {message}")]
    Authentication {
        service: String,
        status: u16,
        message: String,
    },

    #[error("API error [{service}] ({kind}): {}", format_api(.status, .message))]
    Api {
        service: String,
        kind: ApiErrorKind,
        status: Option<u16>,
        message: String,
    },
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref service) = ctx.service {
        parts.push(format!("service: {}", service));
    }
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_api(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("HTTP {}: {}", code, message),
        None => format!("no response: {}", message),
    }
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn authentication(service: impl ToString, status: u16, msg: impl Into<String>) -> Self {
        Error::Authentication {
            service: service.to_string(),
            status,
            message: msg.into(),
        }
    }

    pub fn api(service: impl ToString, status: u16, msg: impl Into<String>) -> Self {
        Error::Api {
            service: service.to_string(),
            kind: ApiErrorKind::Upstream,
            status: Some(status),
            message: msg.into(),
        }
    }

    pub fn malformed_response(
        service: impl ToString,
        status: Option<u16>,
        msg: impl Into<String>,
    ) -> Self {
        Error::Api {
            service: service.to_string(),
            kind: ApiErrorKind::MalformedResponse,
            status,
            message: msg.into(),
        }
    }

    pub fn transport(service: impl ToString, msg: impl Into<String>) -> Self {
        Error::Api {
            service: service.to_string(),
            kind: ApiErrorKind::Transport,
            status: None,
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Authentication { .. } => ErrorKind::Authentication,
            Error::Api { .. } => ErrorKind::Api,
        }
    }

    /// Name of the service that failed, when known.
    pub fn service(&self) -> Option<&str> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                context.service.as_deref()
            }
            Error::Authentication { service, .. } | Error::Api { service, .. } => {
                Some(service.as_str())
            }
        }
    }

    /// Upstream HTTP status, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } => Some(*status),
            Error::Api { status, .. } => *status,
            _ => None,
        }
    }

    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Transport)
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } | Error::Validation { context, .. } => {
                Some(context)
            }
            _ => None,
        }
    }
}
