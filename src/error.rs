//! Error types shared by the credential store, the token refresher,
//! the remote fetcher and the config cache.

use thiserror::Error;

/// Failure of a single attempt to obtain rows for a namespace.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// No usable access token (never logged in, unreadable, or past expiry).
    #[error("credential error: {0}")]
    Credential(String),

    /// The remote source rejected the access token.
    #[error("remote source rejected the access token: {0}")]
    Auth(String),

    /// Network / IO failure or an unexpected HTTP status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Stable label used for metrics and error bodies.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Credential(_) => "credential",
            FetchError::Auth(_) => "auth",
            FetchError::Transport(_) => "transport",
            FetchError::MalformedResponse(_) => "malformed_response",
        }
    }
}

/// Result of a config query that did not produce a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The namespace was fetched but does not contain the key.
    #[error("key {key} is not in sheet {namespace}")]
    KeyNotFound { namespace: String, key: String },
}

impl QueryError {
    pub fn reason(&self) -> &'static str {
        match self {
            QueryError::Fetch(err) => err.reason(),
            QueryError::KeyNotFound { .. } => "key_not_found",
        }
    }
}

/// Durable token storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("token file io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("token file is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no token stored yet")]
    Empty,
}

/// Failures of a token renewal attempt.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("no token stored yet, login required")]
    NoToken,

    #[error("stored token has no refresh token")]
    MissingRefreshToken,

    #[error("identity provider unreachable: {0}")]
    Transport(String),

    #[error("identity provider rejected the grant ({status}): {body}")]
    InvalidGrant { status: u16, body: String },

    #[error("identity provider returned an unexpected response: {0}")]
    MalformedResponse(String),

    #[error("renewed token could not be persisted: {0}")]
    Persist(#[from] StoreError),
}

impl RefreshError {
    pub fn reason(&self) -> &'static str {
        match self {
            RefreshError::NoToken => "no_token",
            RefreshError::MissingRefreshToken => "missing_refresh_token",
            RefreshError::Transport(_) => "transport",
            RefreshError::InvalidGrant { .. } => "invalid_grant",
            RefreshError::MalformedResponse(_) => "malformed_response",
            RefreshError::Persist(_) => "persist",
        }
    }
}
