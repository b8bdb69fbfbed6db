use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by scan process operations.
///
/// None of these are retried internally; each operation either fully
/// succeeds or returns exactly one of them.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The login token is missing or past its expiry. Raised before any request is sent.
    #[error("login token expired at {expired_at}")]
    AuthorizationExpired { expired_at: DateTime<Utc> },

    /// The service answered with something other than 200 OK.
    #[error("remote command failed with status {status}: {body}")]
    RemoteCommandFailed { status: u16, body: String },

    /// Connection, DNS or stream failure.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body could not be decoded.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ScanError {
    /// True for errors raised by the transport layer (I/O or a malformed stream).
    pub fn is_transport(&self) -> bool {
        matches!(self, ScanError::Transport(_) | ScanError::Decode(_))
    }

    /// HTTP status carried by a `RemoteCommandFailed`, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ScanError::RemoteCommandFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
