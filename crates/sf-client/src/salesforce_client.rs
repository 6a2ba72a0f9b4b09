//! Authenticated Salesforce transport with typed HTTP methods.
//!
//! `SalesforceClient` combines a [`Session`] with an HTTP client and issues
//! one request per call against the session's instance URL.
//!
//! ## Write guard
//!
//! When [`ClientConfig::block_writes`] is set, POST/PATCH/PUT/DELETE requests
//! sent through [`SalesforceClient::execute`] fail with
//! [`ErrorKind::WritesBlocked`] before anything touches the network. GET is
//! never blocked.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Request bodies are skipped in tracing spans

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::{ErrorShape, Response};
use crate::session::Session;
use crate::{DEFAULT_API_VERSION, DEFAULT_BULK_API_VERSION};

/// Authenticated Salesforce API transport.
///
/// Used by the query cursor and bulk jobs in the sibling crates; it knows how
/// to build URLs for both the REST API and the async Bulk API and how to
/// authenticate against each of them.
///
/// # Example
///
/// ```rust,ignore
/// use sfdc_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://na1.salesforce.com", "token")?;
///
/// let limits: serde_json::Value = client
///     .get_json("/services/data/v32.0/limits", &[])
///     .await?;
///
/// let created: serde_json::Value = client
///     .post_json("/services/data/v32.0/sobjects/Account", &account)
///     .await?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    session: Session,
    api_version: String,
    bulk_api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.session.instance_url())
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("bulk_api_version", &self.bulk_api_version)
            .field("block_writes", &self.writes_blocked())
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new Salesforce client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new Salesforce client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let session = Session::new(instance_url, access_token)?;
        Self::from_session(session, config)
    }

    /// Create a client for an existing session.
    pub fn from_session(session: Session, config: ClientConfig) -> Result<Self> {
        let http = SfHttpClient::new(config)?;
        Ok(Self {
            http,
            session,
            api_version: DEFAULT_API_VERSION.to_string(),
            bulk_api_version: DEFAULT_BULK_API_VERSION.to_string(),
        })
    }

    /// Set the REST API version (e.g., "32.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the async Bulk API version (e.g., "36.0").
    pub fn with_bulk_api_version(mut self, version: impl Into<String>) -> Self {
        self.bulk_api_version = version.into();
        self
    }

    /// Get the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        self.session.instance_url()
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        self.session.access_token()
    }

    /// Get the REST API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the async Bulk API version.
    pub fn bulk_api_version(&self) -> &str {
        &self.bulk_api_version
    }

    /// Returns true if mutating requests are rejected locally.
    pub fn writes_blocked(&self) -> bool {
        self.http.config().block_writes
    }

    /// Build the full URL for a path.
    ///
    /// If the path starts with `/`, it's appended to the instance URL.
    /// Absolute URLs are returned unchanged.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url(), path)
        } else {
            format!("{}/{}", self.instance_url(), path)
        }
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("query")` -> `/services/data/v32.0/query`
    pub fn rest_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url(),
            self.api_version,
            path
        )
    }

    /// Build the async Bulk API URL for a path.
    ///
    /// The async API has no `v` in front of its version:
    /// `async_url("job")` -> `/services/async/36.0/job`
    pub fn async_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/async/{}/{}",
            self.instance_url(),
            self.bulk_api_version,
            path
        )
    }

    // =========================================================================
    // Base HTTP Methods (with authentication)
    // =========================================================================

    /// Create a GET request builder with authentication.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(self.access_token())
    }

    /// Create a POST request builder with authentication.
    pub fn post(&self, url: &str) -> RequestBuilder {
        self.http.post(url).bearer_auth(self.access_token())
    }

    /// Create a PATCH request builder with authentication.
    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.http.patch(url).bearer_auth(self.access_token())
    }

    /// Create a PUT request builder with authentication.
    pub fn put(&self, url: &str) -> RequestBuilder {
        self.http.put(url).bearer_auth(self.access_token())
    }

    /// Create a DELETE request builder with authentication.
    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.http.delete(url).bearer_auth(self.access_token())
    }

    /// Create a POST request builder for the async Bulk API.
    ///
    /// That API authenticates with `X-SFDC-Session` instead of a bearer
    /// token and reports errors as `{exceptionCode, exceptionMessage}`.
    pub fn async_post(&self, url: &str) -> RequestBuilder {
        self.http
            .post(url)
            .header("X-SFDC-Session", self.access_token())
            .error_shape(ErrorShape::BulkJob)
    }

    /// Execute a request, enforcing the write guard.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.check_write_allowed(request.method())?;
        self.http.execute(request).await
    }

    /// Execute a request without the write guard.
    ///
    /// For callers that apply their own policy, such as bulk jobs, where a
    /// `query` job is created with a POST but cannot change data.
    pub async fn execute_unguarded(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// Fail with [`ErrorKind::WritesBlocked`] if `method` may not be sent.
    pub fn check_write_allowed(&self, method: RequestMethod) -> Result<()> {
        if self.writes_blocked() && method.is_write() {
            warn!(?method, "Blocked mutating request");
            return Err(Error::new(ErrorKind::WritesBlocked));
        }
        Ok(())
    }

    // =========================================================================
    // Typed JSON Methods
    // =========================================================================

    /// GET request with query parameters and JSON response deserialization.
    #[instrument(skip(self, params), fields(url = %path))]
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let full_url = self.url(path);
        let request = self.get(&full_url).query_pairs(params.iter().copied());
        let response = self.execute(request).await?;
        response.json().await
    }

    /// POST request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %path))]
    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let full_url = self.url(path);
        let request = self.post(&full_url).json(body)?;
        let response = self.execute(request).await?;
        response.json().await
    }

    /// PUT request with JSON body and response.
    #[instrument(skip(self, body), fields(url = %path))]
    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let full_url = self.url(path);
        let request = self.put(&full_url).json(body)?;
        let response = self.execute(request).await?;
        response.json().await
    }

    /// PATCH request with JSON body.
    ///
    /// Returns `None` on 204 No Content, which Salesforce sends when an
    /// existing record was updated.
    #[instrument(skip(self, body), fields(url = %path))]
    pub async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        let full_url = self.url(path);
        let request = self.patch(&full_url).json(body)?;
        let response = self.execute(request).await?;

        if response.is_no_content() {
            return Ok(None);
        }
        response.json().await.map(Some)
    }

    /// DELETE request. The body is not read; only the status is reported.
    #[instrument(skip(self), fields(url = %path))]
    pub async fn delete_request(&self, path: &str) -> Result<DeleteResponse> {
        let full_url = self.url(path);
        let request = self.delete(&full_url);
        let response = self.execute(request).await?;

        Ok(DeleteResponse {
            status_code: response.status(),
        })
    }
}

/// Outcome of a successful DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// HTTP status returned by the platform (usually 204).
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn blocked_client(server: &MockServer) -> SalesforceClient {
        SalesforceClient::with_config(
            server.uri(),
            "token",
            ClientConfig::builder().with_block_writes(true).build(),
        )
        .unwrap()
    }

    #[test]
    fn test_url_building() {
        let client = SalesforceClient::new("https://na1.salesforce.com", "token123").unwrap();

        assert_eq!(
            client.url("/services/data/v32.0/sobjects/Account"),
            "https://na1.salesforce.com/services/data/v32.0/sobjects/Account"
        );
        assert_eq!(
            client.url("services/oauth2/userinfo"),
            "https://na1.salesforce.com/services/oauth2/userinfo"
        );
        assert_eq!(
            client.url("https://other.com/path"),
            "https://other.com/path"
        );
        assert_eq!(
            client.rest_url("query"),
            "https://na1.salesforce.com/services/data/v32.0/query"
        );
        assert_eq!(
            client.async_url("job"),
            "https://na1.salesforce.com/services/async/36.0/job"
        );
    }

    #[test]
    fn test_api_versions() {
        let client = SalesforceClient::new("https://na1.salesforce.com", "token")
            .unwrap()
            .with_api_version("60.0")
            .with_bulk_api_version("60.0");

        assert_eq!(client.api_version(), "60.0");
        assert_eq!(
            client.rest_url("limits"),
            "https://na1.salesforce.com/services/data/v60.0/limits"
        );
        assert_eq!(
            client.async_url("/job/750x"),
            "https://na1.salesforce.com/services/async/60.0/job/750x"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let client = SalesforceClient::new("https://na1.salesforce.com", "secret-token").unwrap();
        let debug_output = format!("{:?}", client);
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("secret-token"));
    }

    #[tokio::test]
    async fn test_get_json_sends_bearer_and_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v32.0/sobjects/Account/001"))
            .and(query_param("fields", "Name"))
            .and(header("Authorization", "Bearer token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"Name": "Acme"})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let record: serde_json::Value = client
            .get_json(
                "/services/data/v32.0/sobjects/Account/001",
                &[("fields", "Name")],
            )
            .await
            .unwrap();

        assert_eq!(record["Name"], "Acme");
    }

    #[tokio::test]
    async fn test_post_json_sends_content_type() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/data/v32.0/sobjects/Account"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({"Name": "Acme"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(
                serde_json::json!({"id": "001xx", "success": true, "errors": []}),
            ))
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let created: serde_json::Value = client
            .post_json(
                "/services/data/v32.0/sobjects/Account",
                &serde_json::json!({"Name": "Acme"}),
            )
            .await
            .unwrap();

        assert_eq!(created["id"], "001xx");
    }

    #[tokio::test]
    async fn test_patch_204_returns_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v32.0/sobjects/Account/001xx"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let result: Option<serde_json::Value> = client
            .patch_json(
                "/services/data/v32.0/sobjects/Account/001xx",
                &serde_json::json!({"Name": "Updated"}),
            )
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_patch_with_body_returns_some() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/services/data/v32.0/sobjects/Account/ExtId__c/42"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"id": "001new", "created": true})),
            )
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let result: Option<serde_json::Value> = client
            .patch_json(
                "/services/data/v32.0/sobjects/Account/ExtId__c/42",
                &serde_json::json!({"Name": "Upserted"}),
            )
            .await
            .unwrap();

        assert_eq!(result.unwrap()["id"], "001new");
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/services/data/v32.0/sobjects/Account/001missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!([{"message": "entity not found"}])),
            )
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let err = client
            .delete_request("/services/data/v32.0/sobjects/Account/001missing")
            .await
            .unwrap_err();

        assert!(matches!(err.kind, ErrorKind::RemoteApi { status: 404, .. }));
        assert_eq!(err.remote_message(), Some("entity not found"));
    }

    #[tokio::test]
    async fn test_delete_reports_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/services/data/v32.0/sobjects/Account/001xx"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let result = client
            .delete_request("/services/data/v32.0/sobjects/Account/001xx")
            .await
            .unwrap();

        assert_eq!(result, DeleteResponse { status_code: 204 });
    }

    #[tokio::test]
    async fn test_blocked_writes_make_no_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = blocked_client(&mock_server);
        let body = serde_json::json!({"Name": "Acme"});

        let err = client
            .post_json::<serde_json::Value, _>("/x", &body)
            .await
            .unwrap_err();
        assert!(err.is_writes_blocked());

        let err = client
            .put_json::<serde_json::Value, _>("/x", &body)
            .await
            .unwrap_err();
        assert!(err.is_writes_blocked());

        let err = client
            .patch_json::<serde_json::Value, _>("/x", &body)
            .await
            .unwrap_err();
        assert!(err.is_writes_blocked());

        let err = client.delete_request("/x").await.unwrap_err();
        assert!(err.is_writes_blocked());
    }

    #[tokio::test]
    async fn test_blocked_writes_allow_get() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/services/data/v32.0/limits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = blocked_client(&mock_server);
        let limits: serde_json::Value = client
            .get_json("/services/data/v32.0/limits", &[])
            .await
            .unwrap();

        assert!(limits.is_object());
    }

    #[tokio::test]
    async fn test_async_post_uses_session_header_and_bulk_errors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/async/36.0/job"))
            .and(header("X-SFDC-Session", "token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "exceptionCode": "InvalidSessionId",
                "exceptionMessage": "Invalid session id"
            })))
            .mount(&mock_server)
            .await;

        let client = SalesforceClient::new(mock_server.uri(), "token").unwrap();
        let request = client.async_post(&client.async_url("job"));
        assert!(request.bearer_token.is_none());

        let err = client.execute_unguarded(request).await.unwrap_err();
        assert_eq!(
            err.remote_message(),
            Some("InvalidSessionId : Invalid session id")
        );
    }
}
