//! # sfdc-client
//!
//! Authenticated HTTP transport for the Salesforce REST and async Bulk APIs.
//!
//! This crate provides:
//! - A session value (instance URL + access token)
//! - One-request-per-call dispatch with no hidden retries
//! - Error mapping per endpoint family (REST, async Bulk job, raw text)
//! - A write guard that rejects mutating calls before they leave the process
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Application Layer                        │
//! │        (sfdc-rest query cursor, sfdc-bulk jobs)             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds the Session + HTTP client                          │
//! │  - Typed JSON methods (get_json, post_json, patch_json...)  │
//! │  - Write guard, REST and async Bulk URL building            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP via reqwest, compression                        │
//! │  - ErrorShape-driven error parsing                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use sfdc_client::{ClientConfig, SalesforceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfdc_client::Error> {
//!     let client = SalesforceClient::with_config(
//!         "https://na1.salesforce.com",
//!         "access_token",
//!         ClientConfig::builder().with_block_writes(true).build(),
//!     )?;
//!
//!     let page: serde_json::Value = client
//!         .get_json(&client.rest_url("query"), &[("q", "SELECT Id FROM Account")])
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
mod session;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder, CompressionConfig};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{ErrorShape, Response, ResponseExt};
pub use salesforce_client::{DeleteResponse, SalesforceClient};
pub use session::Session;

/// Default Salesforce REST API version.
pub const DEFAULT_API_VERSION: &str = "32.0";

/// Default async Bulk API version.
pub const DEFAULT_BULK_API_VERSION: &str = "36.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("sfdc-rs/", env!("CARGO_PKG_VERSION"));
