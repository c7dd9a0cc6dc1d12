//! Status + body → `ApiError` classification.
//!
//! `classify` is a pure function over the raw status and body; it never
//! touches the network. `check_status` is the one place the client calls it,
//! immediately after the transport hands back a response.

use serde_json::Value;
use tracing::warn;

use crate::error::{ApiError, Result};
use crate::http::HttpResponse;

const SNIPPET_LIMIT: usize = 200;

/// Pass 2xx responses through; classify everything else.
pub fn check_status(response: HttpResponse) -> Result<HttpResponse> {
    if response.is_success() {
        return Ok(response);
    }
    let error = classify(response.status, &response.body);
    warn!(status = response.status, kind = ?error.kind(), "request failed");
    Err(error)
}

/// Map a non-2xx status and its body to one error condition.
///
/// The body is checked for a structured error envelope first; the status
/// alone decides only when no envelope is present, except for the statuses
/// whose meaning does not depend on the body (401, 502, 503).
pub fn classify(status: u16, body: &str) -> ApiError {
    let envelope = error_message(body);
    match status {
        401 => ApiError::AuthenticationFailed,
        420 if is_calm_signal(envelope.as_deref().unwrap_or(body)) => {
            ApiError::RateLimitExceeded(envelope.unwrap_or_else(|| snippet(body)))
        }
        429 => ApiError::RateLimitExceeded(envelope.unwrap_or_else(|| snippet(body))),
        502 => ApiError::UpstreamUnavailable,
        503 => ApiError::UpstreamOverloaded,
        _ => match envelope {
            Some(message) if status >= 400 => ApiError::RequestRejected { status, message },
            _ if status == 500 => ApiError::UpstreamFault,
            _ => ApiError::UnknownUpstream {
                status,
                snippet: snippet(body),
            },
        },
    }
}

/// Extract the message from `{"error": "..."}` or `{"errors": [{"message": "..."}]}`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    if let Some(message) = value.get("error").and_then(Value::as_str) {
        return Some(message.to_string());
    }
    value
        .get("errors")?
        .as_array()?
        .first()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

fn is_calm_signal(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    text.contains("enhance your calm") || text.contains("rate limit")
}

fn snippet(body: &str) -> String {
    match body.char_indices().nth(SNIPPET_LIMIT) {
        Some((cut, _)) => body[..cut].to_string(),
        None => body.to_string(),
    }
}
