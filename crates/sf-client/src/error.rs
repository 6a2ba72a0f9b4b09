//! Error types for sfdc-client.
//!
//! One taxonomy is shared by the transport, the query cursor and bulk jobs,
//! so callers can match on [`ErrorKind`] no matter which layer failed.

/// Result type alias for sfdc-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for sfdc-client operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Shorthand for a local contract violation.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidState(message.into()))
    }

    /// Returns true if the remote platform rejected the request.
    pub fn is_remote(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::RemoteApi { .. } | ErrorKind::UnstructuredRemote(_)
        )
    }

    /// Returns true if the write-guard stopped the request.
    pub fn is_writes_blocked(&self) -> bool {
        matches!(self.kind, ErrorKind::WritesBlocked)
    }

    /// The platform's diagnostic text, unmodified, if this is a remote error.
    pub fn remote_message(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::RemoteApi { message, .. } => Some(message),
            ErrorKind::UnstructuredRemote(body) => Some(body),
            _ => None,
        }
    }

    /// The HTTP status of a structured remote error.
    pub fn status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::RemoteApi { status, .. } => Some(*status),
            ErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The platform answered a structured endpoint with a status >= 400.
    #[error("Salesforce API error ({status}): {message}")]
    RemoteApi { status: u16, message: String },

    /// A batch upload failed; the raw response body is kept as-is.
    #[error("{0}")]
    UnstructuredRemote(String),

    /// A mutating call was attempted while writes are blocked.
    #[error("Salesforce writes are blocked: mock the Salesforce calls or disable write blocking in your tests")]
    WritesBlocked,

    /// An operation was invoked in a state that does not allow it.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// HTTP request failed below the API layer.
    #[error("HTTP error: {status} {message}")]
    Http { status: u16, message: String },

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ErrorKind::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            ErrorKind::Other(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
