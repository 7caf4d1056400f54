//! # Domain Errors
//!
//! Structured error kinds returned by the feed transport and the renderer.
//! Retry decisions match on [`ErrorKind`], never on message text.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Provider throttling (HTTP 429). Transient, retried with backoff.
    RateLimited,
    /// Credentials rejected (HTTP 401/403).
    Unauthorized,
    /// Any other non-success response from the API.
    Api,
    /// Network failure, timeout or broken connection.
    Transport,
    /// Response body could not be decoded.
    Decode,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Api => "api error",
            ErrorKind::Transport => "transport error",
            ErrorKind::Decode => "decode error",
        };
        f.write_str(name)
    }
}

/// Error returned by the feed collaborator (search, send, stream).
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct FeedError {
    kind: ErrorKind,
    message: String,
}

impl FeedError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a non-success HTTP response.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            429 => ErrorKind::RateLimited,
            401 | 403 => ErrorKind::Unauthorized,
            _ => ErrorKind::Api,
        };
        Self::new(kind, format!("HTTP {status}: {}", body.trim()))
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_rate_limited(&self) -> bool {
        self.kind == ErrorKind::RateLimited
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(status.as_u16(), &err.to_string());
        }
        if err.is_decode() {
            return Self::new(ErrorKind::Decode, err.to_string());
        }
        Self::new(ErrorKind::Transport, err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(ErrorKind::Decode, err.to_string())
    }
}

/// Error returned by the rendering collaborator.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("frequency map is empty")]
    EmptyFrequencies,
    #[error("failed to load font {path}: {reason}")]
    Font { path: String, reason: String },
    #[error("invalid style: {0}")]
    Style(String),
    #[error("none of {0} words fit on the canvas")]
    NothingPlaced(usize),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("renderer task failed: {0}")]
    Task(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(FeedError::from_status(429, "").kind(), ErrorKind::RateLimited);
        assert_eq!(FeedError::from_status(401, "").kind(), ErrorKind::Unauthorized);
        assert_eq!(FeedError::from_status(403, "").kind(), ErrorKind::Unauthorized);
        assert_eq!(FeedError::from_status(500, "").kind(), ErrorKind::Api);
        assert!(FeedError::from_status(429, "slow down").is_rate_limited());
    }

    #[test]
    fn test_display_includes_kind_and_body() {
        let err = FeedError::from_status(404, " {\"errors\":[]} ");
        assert_eq!(err.to_string(), "api error: HTTP 404: {\"errors\":[]}");
    }
}
