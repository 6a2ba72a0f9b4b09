//! # sfdc-rest
//!
//! Salesforce REST API client centred on SOQL pagination.
//!
//! ## Features
//!
//! - **SOQL Query** - First page, lazy cursor, or every page at once
//! - **Deleted records** - `queryAll` via `include_deleted`
//! - **CRUD passthrough** - GET/POST/PATCH/PUT/DELETE on instance paths
//!
//! ## Example
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use sfdc_rest::SalesforceRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfdc_rest::Error> {
//!     let client = SalesforceRestClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token_here",
//!     )?;
//!
//!     let mut cursor = client
//!         .query_cursor::<serde_json::Value>("SELECT Id, Name FROM Account", false)
//!         .await?;
//!     println!("{} accounts", cursor.len().await?);
//!
//!     let accounts: Vec<_> = cursor.records().try_collect().await?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod cursor;
mod query;

pub use client::SalesforceRestClient;
pub use cursor::QueryCursor;
pub use query::ResultPage;

// Errors are shared with the transport
pub use sfdc_client::{ClientConfig, ClientConfigBuilder, DeleteResponse, Error, ErrorKind, Result};
