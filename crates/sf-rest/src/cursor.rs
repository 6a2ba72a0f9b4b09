//! Page-by-page traversal of a SOQL query result.
//!
//! A [`QueryCursor`] starts inert and makes no request until it is asked for
//! something. The first fetch sends the query; every later page is reached
//! through the `nextRecordsUrl` the previous page returned. Only the current
//! page is held in memory.
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//!
//! let mut cursor = client.cursor::<serde_json::Value>("SELECT Id FROM Account", false);
//! println!("{} matching", cursor.len().await?);
//!
//! let records: Vec<_> = cursor.records().try_collect().await?;
//! ```

use futures::stream::{self, Stream};
use futures::TryStreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use sfdc_client::{Result, SalesforceClient};

use crate::query::ResultPage;

/// Lazy, single-pass cursor over a paginated query result.
pub struct QueryCursor<T = Value> {
    client: SalesforceClient,
    query_url: String,
    params: Vec<(String, String)>,
    page: Option<ResultPage<T>>,
    next_records_url: Option<String>,
    total_size: Option<u64>,
}

impl<T> std::fmt::Debug for QueryCursor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCursor")
            .field("query_url", &self.query_url)
            .field("primed", &self.page.is_some())
            .field("next_records_url", &self.next_records_url)
            .field("total_size", &self.total_size)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned + Clone> QueryCursor<T> {
    /// Create an inert cursor. No request is made until the first fetch.
    pub fn new<K, V>(
        client: SalesforceClient,
        query_url: impl Into<String>,
        params: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            client,
            query_url: query_url.into(),
            params: params
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            page: None,
            next_records_url: None,
            total_size: None,
        }
    }

    /// Returns true once a page has been fetched.
    pub fn is_primed(&self) -> bool {
        self.page.is_some()
    }

    /// Returns true if primed and no further page is available.
    pub fn is_exhausted(&self) -> bool {
        self.is_primed() && self.next_records_url.is_none()
    }

    /// The most recently fetched page.
    pub fn page(&self) -> Option<&ResultPage<T>> {
        self.page.as_ref()
    }

    /// The continuation reference for the next page, if any.
    pub fn next_records_url(&self) -> Option<&str> {
        self.next_records_url.as_deref()
    }

    /// Send the query and store its first page.
    ///
    /// Calling this again restarts from the first page.
    #[instrument(skip(self), fields(url = %self.query_url))]
    pub async fn fetch_first(&mut self) -> Result<()> {
        let params: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let page: ResultPage<T> = self.client.get_json(&self.query_url, &params).await?;
        debug!(
            total_size = ?page.total_size,
            records = page.records.len(),
            has_more = page.has_more(),
            "Fetched first page"
        );

        self.total_size = Some(page.total_size.unwrap_or(page.records.len() as u64));
        self.next_records_url = page.next_records_url.clone();
        self.page = Some(page);
        Ok(())
    }

    /// Fetch the page behind the held continuation reference.
    ///
    /// Returns `Ok(false)` without any request when there is none. The total
    /// size recorded from the first page is left as is.
    #[instrument(skip(self))]
    pub async fn fetch_next(&mut self) -> Result<bool> {
        let Some(next_url) = self.next_records_url.as_deref() else {
            return Ok(false);
        };

        let page: ResultPage<T> = self.client.get_json(next_url, &[]).await?;
        debug!(
            records = page.records.len(),
            has_more = page.has_more(),
            "Fetched next page"
        );

        self.next_records_url = page.next_records_url.clone();
        self.page = Some(page);
        Ok(true)
    }

    /// Total number of matching records, as reported by the first page.
    ///
    /// Fetches the first page if nothing has been fetched yet.
    pub async fn len(&mut self) -> Result<u64> {
        if !self.is_primed() {
            self.fetch_first().await?;
        }
        Ok(self.total_size.unwrap_or_default())
    }

    /// Returns true if the query matched no records.
    pub async fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Stream every record from the current page onwards.
    ///
    /// Primes the cursor if needed, yields the current page's records, then
    /// advances with [`fetch_next`](Self::fetch_next) until no page is left.
    /// The stream drives this cursor, so it can be consumed only once; an
    /// error ends it.
    pub fn records(&mut self) -> impl Stream<Item = Result<T>> + '_ {
        let state = RecordsState {
            cursor: self,
            buffer: Vec::new().into_iter(),
            started: false,
        };

        stream::try_unfold(state, |state| state.advance())
    }

    /// Drain the cursor into a `Vec`.
    pub async fn collect_all(&mut self) -> Result<Vec<T>> {
        self.records().try_collect().await
    }
}

struct RecordsState<'a, T> {
    cursor: &'a mut QueryCursor<T>,
    buffer: std::vec::IntoIter<T>,
    started: bool,
}

impl<T: DeserializeOwned + Clone> RecordsState<'_, T> {
    /// Yield the next buffered record, refilling from the next page when empty.
    async fn advance(mut self) -> Result<Option<(T, Self)>> {
        loop {
            if let Some(record) = self.buffer.next() {
                return Ok(Some((record, self)));
            }

            let advanced = if self.started {
                self.cursor.fetch_next().await?
            } else {
                self.started = true;
                if !self.cursor.is_primed() {
                    self.cursor.fetch_first().await?;
                }
                true
            };
            if !advanced {
                return Ok(None);
            }

            self.buffer = self
                .cursor
                .page
                .as_ref()
                .map(|page| page.records.clone())
                .unwrap_or_default()
                .into_iter();
        }
    }
}
