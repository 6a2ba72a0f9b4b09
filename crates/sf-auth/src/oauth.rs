//! OAuth 2.0 username-password login.
//!
//! The only flow this crate performs: the connected app's client id and
//! secret plus a user's password (with security token) are exchanged at the
//! token endpoint for an instance URL and an access token.

use serde::{Deserialize, Serialize};
use sfdc_client::Session;
use tracing::{debug, info, instrument};

use crate::credentials::PasswordCredentials;
use crate::error::{Error, ErrorKind, Result};

/// OAuth 2.0 configuration for a connected app.
///
/// Sensitive fields like `consumer_secret` are redacted in Debug output
/// to prevent accidental exposure in logs.
#[derive(Clone)]
pub struct OAuthConfig {
    /// Consumer key (client_id).
    pub consumer_key: String,
    /// Consumer secret (client_secret).
    consumer_secret: Option<String>,
}

impl std::fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"[REDACTED]")
            .finish()
    }
}

impl OAuthConfig {
    /// Create a new OAuth config.
    pub fn new(consumer_key: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: None,
        }
    }

    /// Set the consumer secret.
    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.consumer_secret = Some(secret.into());
        self
    }

    pub(crate) fn consumer_secret(&self) -> Option<&str> {
        self.consumer_secret.as_deref()
    }

    /// Load the connected app from `SF_CLIENT_ID` and optional `SF_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load the connected app through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let consumer_key = lookup("SF_CLIENT_ID")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_CLIENT_ID".to_string())))?;

        let mut config = Self::new(consumer_key);
        if let Some(secret) = lookup("SF_CLIENT_SECRET") {
            config = config.with_secret(secret);
        }
        Ok(config)
    }
}

/// OAuth client for authenticating with Salesforce.
#[derive(Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    http_client: reqwest::Client,
}

impl std::fmt::Debug for OAuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl OAuthClient {
    /// Create a new OAuth client.
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Get the OAuth config.
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Exchange user credentials for a token at `token_url`.
    ///
    /// `token_url` is the full token endpoint, e.g. [`crate::PRODUCTION_LOGIN_URL`].
    /// Credentials are not logged.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn password_login(
        &self,
        credentials: &PasswordCredentials,
        token_url: &str,
    ) -> Result<TokenResponse> {
        credentials.validate()?;

        let password = credentials.password_with_token();
        let mut params = vec![
            ("grant_type", "password"),
            ("format", "json"),
            ("client_id", self.config.consumer_key.as_str()),
        ];

        if let Some(secret) = self.config.consumer_secret() {
            params.push(("client_secret", secret));
        }
        params.push(("username", credentials.username()));
        params.push(("password", password.as_str()));

        let body = serde_urlencoded::to_string(params)?;

        debug!("Requesting access token");
        let response = self
            .http_client
            .post(token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .header("Accept", "application/json")
            .body(body)
            .send()
            .await?;

        self.handle_token_response(response).await
    }

    /// Handle a token response, checking for errors.
    async fn handle_token_response(&self, response: reqwest::Response) -> Result<TokenResponse> {
        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await?;
            info!(status, "Login rejected");
            return Err(match serde_json::from_str::<OAuthErrorResponse>(&body) {
                Ok(error) => Error::new(ErrorKind::OAuth {
                    error: error.error,
                    description: error.error_description,
                }),
                Err(_) => Error::new(ErrorKind::OAuth {
                    error: status.to_string(),
                    description: body,
                }),
            });
        }

        let token: TokenResponse = response.json().await?;
        debug!(instance_url = %token.instance_url, "Login succeeded");
        Ok(token)
    }
}

/// Token response from OAuth.
///
/// Sensitive fields like `access_token` are redacted in Debug output to
/// prevent accidental exposure in logs.
#[derive(Clone, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    pub access_token: String,
    /// Instance URL.
    pub instance_url: String,
    /// User ID URL.
    #[serde(default)]
    pub id: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default)]
    pub token_type: Option<String>,
    /// Signature for verification.
    #[serde(default)]
    pub signature: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub issued_at: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"[REDACTED]")
            .field("instance_url", &self.instance_url)
            .field("id", &self.id)
            .field("token_type", &self.token_type)
            .field("signature", &self.signature.as_ref().map(|_| "[REDACTED]"))
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

impl TokenResponse {
    /// Convert to a transport session.
    pub fn to_session(&self) -> Result<Session> {
        Session::new(&self.instance_url, &self.access_token)
            .map_err(|e| Error::with_source(ErrorKind::InvalidResponse(e.to_string()), e))
    }
}

/// OAuth error response.
#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    #[serde(default)]
    error: String,
    error_description: String,
}
