use std::path::PathBuf;

use thiserror::Error;

use crate::request::RequestDescriptor;

/// Failure below HTTP: the request never produced a complete response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The status line arrived but the body could not be read.
    #[error("reading response body after status {status}: {source}")]
    Body {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Status code received before the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Body { status, .. } => Some(*status),
            TransportError::Http(_) | TransportError::Io(_) => None,
        }
    }
}

/// Outcome of a failed database request.
#[derive(Debug, Error)]
pub enum CouchError {
    /// The server could not be reached.
    #[error("connect_db: {request} failed: {source}")]
    Connect {
        #[source]
        source: TransportError,
        request: RequestDescriptor,
        status: Option<u16>,
    },

    /// The server answered with something other than 200/201.
    #[error(
        "couch:{}: {request} returned {status}: {}",
        .error.as_deref().unwrap_or("unknown"),
        .reason.as_deref().unwrap_or("no reason given")
    )]
    Couch {
        error: Option<String>,
        reason: Option<String>,
        request: RequestDescriptor,
        status: u16,
    },

    /// The database name was empty; no request was sent.
    #[error("invalid_name: database name must not be empty")]
    InvalidName { request: RequestDescriptor },

    /// The response body was not JSON.
    #[error("malformed_response: {request} returned {status} with a non-JSON body: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        request: RequestDescriptor,
        status: u16,
    },
}

impl CouchError {
    /// Short classification: `connect_db`, `couch:<error>`, `malformed_response`
    /// or `invalid_name`.
    pub fn kind(&self) -> String {
        match self {
            CouchError::Connect { .. } => "connect_db".to_string(),
            CouchError::Couch { error, .. } => {
                format!("couch:{}", error.as_deref().unwrap_or("unknown"))
            }
            CouchError::MalformedResponse { .. } => "malformed_response".to_string(),
            CouchError::InvalidName { .. } => "invalid_name".to_string(),
        }
    }

    pub fn request(&self) -> &RequestDescriptor {
        match self {
            CouchError::Connect { request, .. }
            | CouchError::Couch { request, .. }
            | CouchError::MalformedResponse { request, .. }
            | CouchError::InvalidName { request } => request,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            CouchError::Connect { status, .. } => *status,
            CouchError::InvalidName { .. } => None,
            CouchError::Couch { status, .. } | CouchError::MalformedResponse { status, .. } => {
                Some(*status)
            }
        }
    }

    /// True for remote failures whose `error` field matches `code` (e.g. `not_found`).
    pub fn is_couch(&self, code: &str) -> bool {
        matches!(self, CouchError::Couch { error: Some(e), .. } if e == code)
    }
}

/// Failure while resolving a configuration source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML config error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON config error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("unsupported URL scheme: {0} (expected http or https)")]
    UnsupportedScheme(String),
}
