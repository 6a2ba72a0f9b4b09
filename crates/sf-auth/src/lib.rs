//! # sfdc-auth
//!
//! Salesforce login via the OAuth 2.0 username-password flow.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Transport error messages that mention credentials are replaced
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfdc_auth::{OAuthClient, OAuthConfig, PasswordCredentials, PRODUCTION_LOGIN_URL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfdc_auth::Error> {
//!     let client = OAuthClient::new(OAuthConfig::from_env()?);
//!     let creds = PasswordCredentials::from_env()?;
//!
//!     let token = client.password_login(&creds, PRODUCTION_LOGIN_URL).await?;
//!     let session = token.to_session()?;
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod oauth;

pub use credentials::PasswordCredentials;
pub use error::{Error, ErrorKind, Result};
pub use oauth::{OAuthClient, OAuthConfig, TokenResponse};

/// Token endpoint for production orgs.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com/services/oauth2/token";

/// Token endpoint for sandbox orgs.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com/services/oauth2/token";
