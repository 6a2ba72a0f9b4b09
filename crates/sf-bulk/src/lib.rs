//! # sfdc-bulk
//!
//! Jobs on the Salesforce async Bulk API (`/services/async/<version>/job`).
//!
//! ## Features
//!
//! - **Job lifecycle** - Create, add batches, close, abort
//! - **All operations** - Insert, Update, Upsert, Delete, Hard Delete, Query
//! - **Any batch format** - CSV, JSON, XML and their zipped variants
//! - **Write guard** - Mutating jobs cannot be created while writes are blocked
//!
//! ## Example - Bulk Insert
//!
//! ```rust,ignore
//! use sfdc_bulk::{BulkJob, BulkOperation, ContentType};
//! use sfdc_client::SalesforceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sfdc_bulk::Error> {
//!     let client = SalesforceClient::new(
//!         "https://myorg.my.salesforce.com",
//!         "access_token",
//!     )?;
//!
//!     let mut job = BulkJob::new(client, BulkOperation::Insert, "Account", ContentType::Csv);
//!     job.create().await?;
//!     job.add_batch("Name,Industry\nAcme Corp,Technology\nGlobal Inc,Finance\n").await?;
//!     let info = job.close().await?;
//!
//!     println!("Job {} is {:?}", info.id, info.state);
//!
//!     Ok(())
//! }
//! ```

mod job;
mod types;

pub use job::{BulkJob, JobPhase};
pub use types::{
    BatchInfo, BulkOperation, ContentType, CreateJobRequest, JobInfo, JobStateRequest,
    RequestedState,
};

// Errors are shared with the transport
pub use sfdc_client::{Error, ErrorKind, Result};
