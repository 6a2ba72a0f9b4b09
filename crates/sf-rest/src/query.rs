//! SOQL query result pages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a SOQL query result.
///
/// `total_size` is meaningful on the first page only. A present
/// `next_records_url` means exactly one more page can be fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    rename_all = "camelCase",
    bound(deserialize = "T: serde::de::DeserializeOwned")
)]
pub struct ResultPage<T = Value> {
    /// Total number of records matching the query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,

    /// Whether this is the last page.
    #[serde(default)]
    pub done: bool,

    /// Continuation reference for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,

    /// The records on this page.
    #[serde(default)]
    pub records: Vec<T>,
}

impl<T> ResultPage<T> {
    /// Returns true if the server offered a further page.
    pub fn has_more(&self) -> bool {
        self.next_records_url.is_some()
    }
}

/// Query endpoint name: `queryAll` also returns deleted and archived records.
pub(crate) fn query_resource(include_deleted: bool) -> &'static str {
    if include_deleted {
        "queryAll"
    } else {
        "query"
    }
}
