//! Facade configuration.

use sfdc_auth::{OAuthConfig, PasswordCredentials, PRODUCTION_LOGIN_URL};
use sfdc_client::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BULK_API_VERSION};

use crate::error::Result;

/// Everything [`Sfdc`](crate::Sfdc) needs to log in and talk to an org.
///
/// Secrets live in [`OAuthConfig`] and [`PasswordCredentials`], whose Debug
/// output is redacted.
#[derive(Debug, Clone)]
pub struct SfdcConfig {
    pub(crate) login_url: String,
    pub(crate) oauth: OAuthConfig,
    pub(crate) credentials: PasswordCredentials,
    pub(crate) client: ClientConfig,
    pub(crate) api_version: String,
    pub(crate) bulk_api_version: String,
}

impl SfdcConfig {
    /// Configuration for a production org with default API versions.
    pub fn new(oauth: OAuthConfig, credentials: PasswordCredentials) -> Self {
        Self {
            login_url: PRODUCTION_LOGIN_URL.to_string(),
            oauth,
            credentials,
            client: ClientConfig::default(),
            api_version: DEFAULT_API_VERSION.to_string(),
            bulk_api_version: DEFAULT_BULK_API_VERSION.to_string(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `SF_LOGIN_URL` (default: production token endpoint)
    /// - `SF_CLIENT_ID`, `SF_CLIENT_SECRET`
    /// - `SF_USERNAME`, `SF_PASSWORD`, `SF_SECURITY_TOKEN`
    /// - `SF_BLOCK_WRITES` (`1`, `true`, `yes` or `on` to block)
    /// - `SF_API_VERSION`, `SF_BULK_API_VERSION`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let oauth = OAuthConfig::from_lookup(&lookup)?;
        let credentials = PasswordCredentials::from_lookup(&lookup)?;

        let mut config = Self::new(oauth, credentials);
        if let Some(url) = lookup("SF_LOGIN_URL") {
            config = config.with_login_url(url);
        }
        if let Some(flag) = lookup("SF_BLOCK_WRITES") {
            config = config.with_block_writes(parse_flag(&flag));
        }
        if let Some(version) = lookup("SF_API_VERSION") {
            config = config.with_api_version(version);
        }
        if let Some(version) = lookup("SF_BULK_API_VERSION") {
            config = config.with_bulk_api_version(version);
        }
        Ok(config)
    }

    /// Set the OAuth token endpoint, e.g. [`sfdc_auth::SANDBOX_LOGIN_URL`].
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = url.into();
        self
    }

    /// Reject every mutating call locally.
    pub fn with_block_writes(mut self, blocked: bool) -> Self {
        self.client.block_writes = blocked;
        self
    }

    /// Replace the HTTP client configuration.
    pub fn with_client_config(mut self, config: ClientConfig) -> Self {
        self.client = config;
        self
    }

    /// Set the REST API version (e.g., "32.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the async Bulk API version (e.g., "36.0").
    pub fn with_bulk_api_version(mut self, version: impl Into<String>) -> Self {
        self.bulk_api_version = version.into();
        self
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    pub fn writes_blocked(&self) -> bool {
        self.client.block_writes
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SfdcConfig::new(
            OAuthConfig::new("cid"),
            PasswordCredentials::new("user@example.com", "pw"),
        );

        assert_eq!(config.login_url(), PRODUCTION_LOGIN_URL);
        assert_eq!(config.api_version, "32.0");
        assert_eq!(config.bulk_api_version, "36.0");
        assert!(!config.writes_blocked());
    }

    #[test]
    fn test_from_lookup() {
        let config = SfdcConfig::from_lookup(lookup(&[
            ("SF_CLIENT_ID", "cid"),
            ("SF_USERNAME", "user@example.com"),
            ("SF_PASSWORD", "pw"),
            ("SF_LOGIN_URL", "https://test.salesforce.com/services/oauth2/token"),
            ("SF_BLOCK_WRITES", "True"),
            ("SF_API_VERSION", "45.0"),
        ]))
        .unwrap();

        assert_eq!(
            config.login_url(),
            "https://test.salesforce.com/services/oauth2/token"
        );
        assert!(config.writes_blocked());
        assert_eq!(config.api_version, "45.0");
        assert_eq!(config.bulk_api_version, "36.0");
    }

    #[test]
    fn test_from_lookup_missing_client_id() {
        let err = SfdcConfig::from_lookup(lookup(&[("SF_USERNAME", "u"), ("SF_PASSWORD", "p")]))
            .unwrap_err();
        assert!(matches!(err, crate::Error::Auth(_)));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = SfdcConfig::new(
            OAuthConfig::new("cid").with_secret("client-secret-value"),
            PasswordCredentials::new("user@example.com", "password-value"),
        );
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("client-secret-value"));
        assert!(!debug_output.contains("password-value"));
    }
}
