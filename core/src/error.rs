//! Error types for the Twitter API client.
//!
//! # Design
//! Every failure a caller can see is one of the `ApiError` variants.
//! Caller misuse is caught before any request is issued; everything that
//! comes back from the service is classified exactly once, right after the
//! transport returns (see `classify`). `ErrorKind` is the fieldless view of
//! the same taxonomy for retry decisions.

/// Fixed message for an unstructured 500.
pub const UPSTREAM_FAULT_MESSAGE: &str =
    "Something is broken at Twitter. Please see http://dev.twitter.com/pages/support to report the issue.";

/// Fixed message for a 502.
pub const UPSTREAM_UNAVAILABLE_MESSAGE: &str = "Twitter is down or is being upgraded.";

/// Fixed message for a 503.
pub const UPSTREAM_OVERLOADED_MESSAGE: &str = "Twitter is overloaded with requests. Try again later.";

/// Failure to obtain any response from the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Io(String),
}

/// Errors returned by every client operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The caller supplied conflicting, missing or out-of-range arguments.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The operation acts for the current user but the client has no
    /// credentials.
    #[error("authorization is required for {operation}")]
    NotAuthorized { operation: &'static str },

    /// 401: credentials missing, expired or revoked.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// 420 "Enhance your calm" or 429.
    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The service rejected the request and said why.
    #[error("request rejected ({status}): {message}")]
    RequestRejected { status: u16, message: String },

    #[error("{}", UPSTREAM_FAULT_MESSAGE)]
    UpstreamFault,

    #[error("{}", UPSTREAM_UNAVAILABLE_MESSAGE)]
    UpstreamUnavailable,

    #[error("{}", UPSTREAM_OVERLOADED_MESSAGE)]
    UpstreamOverloaded,

    /// A 2xx body did not have the shape the operation expects.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unexpected HTTP {status}: {snippet}")]
    UnknownUpstream { status: u16, snippet: String },

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Fieldless discriminant of `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    NotAuthorized,
    AuthenticationFailed,
    RateLimitExceeded,
    RequestRejected,
    UpstreamFault,
    UpstreamUnavailable,
    UpstreamOverloaded,
    MalformedResponse,
    UnknownUpstream,
    TransportTimeout,
    TransportFailure,
}

impl ErrorKind {
    /// Whether repeating the same call later can reasonably succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimitExceeded
                | ErrorKind::UpstreamUnavailable
                | ErrorKind::UpstreamOverloaded
                | ErrorKind::TransportTimeout
        )
    }
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidRequest(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        ApiError::MalformedResponse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::InvalidRequest(_) => ErrorKind::InvalidRequest,
            ApiError::NotAuthorized { .. } => ErrorKind::NotAuthorized,
            ApiError::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            ApiError::RateLimitExceeded(_) => ErrorKind::RateLimitExceeded,
            ApiError::RequestRejected { .. } => ErrorKind::RequestRejected,
            ApiError::UpstreamFault => ErrorKind::UpstreamFault,
            ApiError::UpstreamUnavailable => ErrorKind::UpstreamUnavailable,
            ApiError::UpstreamOverloaded => ErrorKind::UpstreamOverloaded,
            ApiError::MalformedResponse(_) => ErrorKind::MalformedResponse,
            ApiError::UnknownUpstream { .. } => ErrorKind::UnknownUpstream,
            ApiError::Transport(TransportError::Timeout(_)) => ErrorKind::TransportTimeout,
            ApiError::Transport(TransportError::Io(_)) => ErrorKind::TransportFailure,
        }
    }

    /// The HTTP status behind an upstream error, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::AuthenticationFailed => Some(401),
            ApiError::UpstreamFault => Some(500),
            ApiError::UpstreamUnavailable => Some(502),
            ApiError::UpstreamOverloaded => Some(503),
            ApiError::RequestRejected { status, .. } | ApiError::UnknownUpstream { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
