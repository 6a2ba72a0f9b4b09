//! The authenticated session a login exchange produces.

use crate::error::{Error, ErrorKind, Result};

/// Instance URL and access token for one authenticated session.
///
/// Immutable once created. The token is never refreshed here; obtaining a
/// new one is the caller's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    instance_url: String,
    access_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

impl Session {
    /// Create a session, validating the instance URL.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let instance_url = instance_url.into();
        let parsed = url::Url::parse(&instance_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::InvalidUrl(format!(
                "unsupported scheme: {}",
                parsed.scheme()
            ))));
        }

        Ok(Self {
            instance_url: instance_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// The instance base URL, without a trailing slash.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// The bearer token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}
