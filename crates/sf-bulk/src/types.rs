//! Wire types for the async Bulk API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use sfdc_client::{Error, ErrorKind};

/// Deserialize API version that can be either a float (36.0) or string ("36.0").
pub(crate) fn deserialize_api_version<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ApiVersion {
        Float(f64),
        String(String),
    }

    Option::<ApiVersion>::deserialize(deserializer).map(|opt| {
        opt.map(|v| match v {
            ApiVersion::Float(f) => format!("{:.1}", f),
            ApiVersion::String(s) => s,
        })
    })
}

/// Operation a bulk job performs on its object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BulkOperation {
    /// Delete records (soft delete)
    Delete,
    /// Insert new records
    Insert,
    /// Query records
    Query,
    /// Upsert based on external ID
    Upsert,
    /// Update existing records
    Update,
    /// Hard delete records (permanent)
    HardDelete,
}

impl BulkOperation {
    /// Get the API string for this operation.
    pub fn api_name(&self) -> &'static str {
        match self {
            BulkOperation::Delete => "delete",
            BulkOperation::Insert => "insert",
            BulkOperation::Query => "query",
            BulkOperation::Upsert => "upsert",
            BulkOperation::Update => "update",
            BulkOperation::HardDelete => "hardDelete",
        }
    }

    /// Returns true for every operation except `query`.
    pub fn is_mutating(&self) -> bool {
        !matches!(self, BulkOperation::Query)
    }
}

impl fmt::Display for BulkOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for BulkOperation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delete" => Ok(BulkOperation::Delete),
            "insert" => Ok(BulkOperation::Insert),
            "query" => Ok(BulkOperation::Query),
            "upsert" => Ok(BulkOperation::Upsert),
            "update" => Ok(BulkOperation::Update),
            "hardDelete" => Ok(BulkOperation::HardDelete),
            other => Err(Error::new(ErrorKind::Other(format!(
                "unknown bulk operation: {other}"
            )))),
        }
    }
}

/// Format of the batch data a job accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContentType {
    #[default]
    #[serde(rename = "CSV")]
    Csv,
    #[serde(rename = "JSON")]
    Json,
    #[serde(rename = "XML")]
    Xml,
    #[serde(rename = "ZIP_CSV")]
    ZipCsv,
    #[serde(rename = "ZIP_JSON")]
    ZipJson,
    #[serde(rename = "ZIP_XML")]
    ZipXml,
}

impl ContentType {
    /// Get the API string for this content type.
    pub fn api_name(&self) -> &'static str {
        match self {
            ContentType::Csv => "CSV",
            ContentType::Json => "JSON",
            ContentType::Xml => "XML",
            ContentType::ZipCsv => "ZIP_CSV",
            ContentType::ZipJson => "ZIP_JSON",
            ContentType::ZipXml => "ZIP_XML",
        }
    }

    /// MIME type sent with batch uploads of this format.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Csv => "text/csv",
            ContentType::Json => "application/json",
            ContentType::Xml => "application/xml",
            ContentType::ZipCsv => "zip/csv",
            ContentType::ZipJson => "zip/json",
            ContentType::ZipXml => "zip/xml",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CSV" => Ok(ContentType::Csv),
            "JSON" => Ok(ContentType::Json),
            "XML" => Ok(ContentType::Xml),
            "ZIP_CSV" => Ok(ContentType::ZipCsv),
            "ZIP_JSON" => Ok(ContentType::ZipJson),
            "ZIP_XML" => Ok(ContentType::ZipXml),
            other => Err(Error::new(ErrorKind::Other(format!(
                "unknown content type: {other}"
            )))),
        }
    }
}

/// Request body creating a job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub operation: BulkOperation,
    pub object: String,
    pub content_type: ContentType,
}

/// Target state for a job state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RequestedState {
    Closed,
    Aborted,
}

/// Request body changing a job's state.
#[derive(Debug, Clone, Serialize)]
pub struct JobStateRequest {
    pub state: RequestedState,
}

impl JobStateRequest {
    /// Stop accepting batches.
    pub fn close() -> Self {
        Self {
            state: RequestedState::Closed,
        }
    }

    /// Abort the job, discarding unprocessed batches.
    pub fn abort() -> Self {
        Self {
            state: RequestedState::Aborted,
        }
    }
}

/// Job information returned by every job command.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub id: String,
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default)]
    pub object: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub concurrency_mode: Option<String>,
    #[serde(default)]
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub number_batches_total: Option<u64>,
    #[serde(default)]
    pub number_records_processed: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_api_version")]
    pub api_version: Option<String>,
}

/// Batch information returned by a batch upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInfo {
    pub id: String,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_message: Option<String>,
    #[serde(default)]
    pub number_records_processed: Option<u64>,
}
