//! # sfdc
//!
//! Salesforce client: password-grant login, authenticated REST calls,
//! paginated SOQL queries and async Bulk API jobs.
//!
//! ## Security
//!
//! - Sensitive data (tokens, secrets, passwords) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - An optional write guard rejects mutating calls before they are sent
//!
//! ## Crates
//!
//! - **sfdc-client** - Session, authenticated transport, shared error taxonomy
//! - **sfdc-auth** - OAuth 2.0 username-password login
//! - **sfdc-rest** - SOQL query cursor and CRUD passthrough
//! - **sfdc-bulk** - Async Bulk API job lifecycle
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sfdc::{BulkOperation, ContentType, Sfdc, SfdcConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfdc::Error> {
//!     let sfdc = Sfdc::new(SfdcConfig::from_env()?);
//!
//!     let accounts: Vec<serde_json::Value> = sfdc
//!         .query_all("SELECT Id, Name FROM Account LIMIT 10")
//!         .await?;
//!
//!     for account in accounts {
//!         println!("{}", account["Name"]);
//!     }
//!
//!     let mut job = sfdc
//!         .create_job(BulkOperation::Insert, "Account", ContentType::Csv)
//!         .await?;
//!     job.add_batch("Name\nAcme\n").await?;
//!     job.close().await?;
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod sfdc;

pub use crate::config::SfdcConfig;
pub use crate::error::{Error, Result};
pub use crate::sfdc::Sfdc;

// Re-export all crates for convenient access
pub use sfdc_auth as auth;
pub use sfdc_bulk as bulk;
pub use sfdc_client as client;
pub use sfdc_rest as rest;

// Re-export commonly used types at the top level
pub use sfdc_auth::{OAuthConfig, PasswordCredentials};
pub use sfdc_bulk::{BulkJob, BulkOperation, ContentType, JobPhase};
pub use sfdc_client::{ClientConfig, DeleteResponse, SalesforceClient, Session};
pub use sfdc_rest::{QueryCursor, ResultPage, SalesforceRestClient};
