//! Username-password credentials.
//!
//! All credential types implement custom Debug to redact sensitive data.

use crate::error::{Error, ErrorKind, Result};

/// User credentials for the OAuth 2.0 username-password flow.
///
/// Salesforce expects the user's security token appended to the password
/// when the login does not come from a trusted IP range. The token is kept
/// separately here and joined only when the login request is built.
#[derive(Clone)]
pub struct PasswordCredentials {
    username: String,
    password: String,
    security_token: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("security_token", &"[REDACTED]")
            .finish()
    }
}

impl PasswordCredentials {
    /// Create credentials without a security token.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            security_token: String::new(),
        }
    }

    /// Set the security token appended to the password at login.
    pub fn with_security_token(mut self, token: impl Into<String>) -> Self {
        self.security_token = token.into();
        self
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password as the token endpoint expects it: password + security token.
    pub(crate) fn password_with_token(&self) -> String {
        format!("{}{}", self.password, self.security_token)
    }

    /// Returns an error if the credentials cannot possibly authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "username is empty".to_string(),
            )));
        }
        if self.password.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "password is empty".to_string(),
            )));
        }
        Ok(())
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_USERNAME` or `SALESFORCE_USERNAME`
    /// - `SF_PASSWORD` or `SALESFORCE_PASSWORD`
    ///
    /// Optional:
    /// - `SF_SECURITY_TOKEN` or `SALESFORCE_SECURITY_TOKEN`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("SF_USERNAME")
            .or_else(|| lookup("SALESFORCE_USERNAME"))
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_USERNAME".to_string())))?;

        let password = lookup("SF_PASSWORD")
            .or_else(|| lookup("SALESFORCE_PASSWORD"))
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_PASSWORD".to_string())))?;

        let security_token = lookup("SF_SECURITY_TOKEN")
            .or_else(|| lookup("SALESFORCE_SECURITY_TOKEN"))
            .unwrap_or_default();

        Ok(Self::new(username, password).with_security_token(security_token))
    }
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
    fn test_password_with_token() {
        let creds =
            PasswordCredentials::new("user@example.com", "hunter2").with_security_token("XYZ");
        assert_eq!(creds.username(), "user@example.com");
        assert_eq!(creds.password_with_token(), "hunter2XYZ");

        let creds = PasswordCredentials::new("user@example.com", "hunter2");
        assert_eq!(creds.password_with_token(), "hunter2");
    }

    #[test]
    fn test_validate() {
        assert!(PasswordCredentials::new("u", "p").validate().is_ok());

        let err = PasswordCredentials::new("", "p").validate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidCredentials(_)));

        let err = PasswordCredentials::new("u", "").validate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidCredentials(_)));
    }

    #[test]
    fn test_from_lookup() {
        let creds = PasswordCredentials::from_lookup(lookup(&[
            ("SF_USERNAME", "user@example.com"),
            ("SALESFORCE_PASSWORD", "pw"),
            ("SF_SECURITY_TOKEN", "tok"),
        ]))
        .unwrap();

        assert_eq!(creds.username(), "user@example.com");
        assert_eq!(creds.password_with_token(), "pwtok");
    }

    #[test]
    fn test_from_lookup_missing_password() {
        let err = PasswordCredentials::from_lookup(lookup(&[("SF_USERNAME", "u")])).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::EnvVar(ref name) if name == "SF_PASSWORD"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = PasswordCredentials::new("user@example.com", "super_secret_password")
            .with_security_token("super_secret_token");
        let debug_output = format!("{:?}", creds);
        assert!(debug_output.contains("user@example.com"));
        assert!(!debug_output.contains("super_secret_password"));
        assert!(!debug_output.contains("super_secret_token"));
    }
}
