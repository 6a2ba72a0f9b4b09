//! Salesforce REST API client.
//!
//! This client wraps `SalesforceClient` from `sfdc-client` and provides SOQL
//! queries (single page, cursor, or everything) plus plain CRUD calls
//! against instance-relative paths.

use serde::{de::DeserializeOwned, Serialize};
use tracing::instrument;

use sfdc_client::{ClientConfig, DeleteResponse, Result, SalesforceClient};

use crate::cursor::QueryCursor;
use crate::query::{query_resource, ResultPage};

/// Salesforce REST API client.
///
/// # Example
///
/// ```rust,ignore
/// use sfdc_rest::SalesforceRestClient;
///
/// let client = SalesforceRestClient::new(
///     "https://myorg.my.salesforce.com",
///     "access_token_here",
/// )?;
///
/// // Every page
/// let accounts: Vec<serde_json::Value> = client.query_all("SELECT Id, Name FROM Account").await?;
///
/// // Create
/// let created: serde_json::Value = client
///     .post("/services/data/v32.0/sobjects/Account", &json!({"Name": "New Account"}))
///     .await?;
///
/// // Delete
/// client.delete("/services/data/v32.0/sobjects/Account/001xx").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SalesforceRestClient {
    client: SalesforceClient,
}

impl SalesforceRestClient {
    /// Create a new REST client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        let client = SalesforceClient::new(instance_url, access_token)?;
        Ok(Self { client })
    }

    /// Create a new REST client with custom HTTP configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let client = SalesforceClient::with_config(instance_url, access_token, config)?;
        Ok(Self { client })
    }

    /// Create a REST client from an existing SalesforceClient.
    pub fn from_client(client: SalesforceClient) -> Self {
        Self { client }
    }

    /// Get the underlying SalesforceClient.
    pub fn inner(&self) -> &SalesforceClient {
        &self.client
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.client.instance_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.client.api_version()
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.client = self.client.with_api_version(version);
        self
    }

    // =========================================================================
    // Query Operations
    // =========================================================================

    /// Execute a SOQL query and return its first page.
    ///
    /// With `include_deleted` the `queryAll` resource is used, which also
    /// returns deleted and archived records.
    #[instrument(skip(self))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        soql: &str,
        include_deleted: bool,
    ) -> Result<ResultPage<T>> {
        let url = self.client.rest_url(query_resource(include_deleted));
        self.client.get_json(&url, &[("q", soql)]).await
    }

    /// Build an inert cursor for a SOQL query. Nothing is sent yet.
    pub fn cursor<T: DeserializeOwned + Clone>(
        &self,
        soql: &str,
        include_deleted: bool,
    ) -> QueryCursor<T> {
        let url = self.client.rest_url(query_resource(include_deleted));
        QueryCursor::new(self.client.clone(), url, [("q", soql)])
    }

    /// Execute a SOQL query and return a cursor holding its first page.
    #[instrument(skip(self))]
    pub async fn query_cursor<T: DeserializeOwned + Clone>(
        &self,
        soql: &str,
        include_deleted: bool,
    ) -> Result<QueryCursor<T>> {
        let mut cursor = self.cursor(soql, include_deleted);
        cursor.fetch_first().await?;
        Ok(cursor)
    }

    /// Execute a SOQL query and return the records of every page, in order.
    #[instrument(skip(self))]
    pub async fn query_all<T: DeserializeOwned + Clone>(&self, soql: &str) -> Result<Vec<T>> {
        self.cursor(soql, false).collect_all().await
    }

    // =========================================================================
    // CRUD Operations
    // =========================================================================

    /// GET a path with optional query parameters.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        self.client.get_json(path, params).await
    }

    /// POST a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.client.post_json(path, body).await
    }

    /// PATCH a JSON body. `None` means the record was updated without a
    /// response body.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        self.client.patch_json(path, body).await
    }

    /// PUT a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.client.put_json(path, body).await
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> Result<DeleteResponse> {
        self.client.delete_request(path).await
    }
}
