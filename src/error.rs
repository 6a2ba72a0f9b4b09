//! Error type for the facade.

use sfdc_client::ErrorKind;

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure a facade call can produce.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Login failed or its configuration is incomplete.
    #[error(transparent)]
    Auth(#[from] sfdc_auth::Error),

    /// Transport, remote API or local contract failure.
    #[error(transparent)]
    Client(#[from] sfdc_client::Error),
}

impl Error {
    /// Returns true if a write was rejected locally.
    pub fn is_writes_blocked(&self) -> bool {
        matches!(self, Error::Client(err) if err.is_writes_blocked())
    }

    /// The message the platform returned, for remote failures.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Error::Auth(err) => err.oauth_description(),
            Error::Client(err) => err.remote_message(),
        }
    }

    /// The client error kind, if this is not a login failure.
    pub fn client_kind(&self) -> Option<&ErrorKind> {
        match self {
            Error::Client(err) => Some(&err.kind),
            Error::Auth(_) => None,
        }
    }
}
