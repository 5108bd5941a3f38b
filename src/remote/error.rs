use std::fmt;
use std::time::Duration;

/// Failure of a call to the remote DPR API.
///
/// Network, status and decode failures are the three outcomes a caller has
/// to tell apart; timeouts and cancellation are split out so the upload path
/// can report them distinctly from a server-side error.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network(String),
    TimedOut(Duration),
    Cancelled,
    Status { status: u16, detail: Option<String> },
    Decode(String),
    InvalidRequest(String),
}

impl ApiError {
    /// Classify a transport error raised by reqwest.
    pub fn from_transport(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            ApiError::TimedOut(timeout)
        } else if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_builder() {
            ApiError::InvalidRequest(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e) => write!(f, "Network error: {e}"),
            ApiError::TimedOut(d) => write!(f, "Request timed out after {}s", d.as_secs()),
            ApiError::Cancelled => write!(f, "Request cancelled"),
            ApiError::Status { status, detail: Some(d) } => {
                write!(f, "Server returned {status}: {d}")
            }
            ApiError::Status { status, detail: None } => write!(f, "Server returned {status}"),
            ApiError::Decode(e) => write!(f, "Invalid response body: {e}"),
            ApiError::InvalidRequest(e) => write!(f, "Invalid request: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Pull a human-readable detail out of an error body.
///
/// The backend answers errors as `{"detail": ...}` where `detail` is either a
/// string or a list of validation problems.
pub(crate) fn extract_detail(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => Some(trimmed.to_string()),
            Some(other) => Some(other.to_string()),
        },
        _ => Some(trimmed.to_string()),
    }
}
