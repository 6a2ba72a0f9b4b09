//! The facade: one object that logs in lazily and exposes REST calls,
//! SOQL queries and bulk jobs.

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use sfdc_auth::OAuthClient;
use sfdc_bulk::{BulkJob, BulkOperation, ContentType};
use sfdc_client::{DeleteResponse, ErrorKind, SalesforceClient, Session};
use sfdc_rest::{QueryCursor, ResultPage, SalesforceRestClient};

use crate::config::SfdcConfig;
use crate::error::Result;

/// Salesforce client with lazy password-grant login.
///
/// The first call that needs the network logs in; concurrent first calls
/// share a single login. A failed login leaves nothing cached, so the next
/// call tries again. The session is never refreshed.
///
/// # Example
///
/// ```rust,ignore
/// use sfdc::{Sfdc, SfdcConfig};
///
/// let sfdc = Sfdc::new(SfdcConfig::from_env()?);
///
/// let accounts: Vec<serde_json::Value> = sfdc.query_all("SELECT Id FROM Account").await?;
/// let created: serde_json::Value = sfdc
///     .post("/services/data/v32.0/sobjects/Account", &json!({"Name": "Acme"}))
///     .await?;
/// ```
#[derive(Debug)]
pub struct Sfdc {
    config: SfdcConfig,
    oauth: OAuthClient,
    rest: OnceCell<SalesforceRestClient>,
}

impl Sfdc {
    /// Create the facade. Nothing is sent until the first call.
    pub fn new(config: SfdcConfig) -> Self {
        let oauth = OAuthClient::new(config.oauth.clone());
        Self {
            config,
            oauth,
            rest: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SfdcConfig {
        &self.config
    }

    /// The session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        self.rest.get().map(|rest| rest.inner().session())
    }

    /// Log in unless a session already exists, and return it.
    pub async fn login(&self) -> Result<&Session> {
        Ok(self.rest().await?.inner().session())
    }

    async fn rest(&self) -> Result<&SalesforceRestClient> {
        self.rest.get_or_try_init(|| self.authenticate()).await
    }

    #[instrument(skip(self), fields(login_url = %self.config.login_url))]
    async fn authenticate(&self) -> Result<SalesforceRestClient> {
        let token = self
            .oauth
            .password_login(&self.config.credentials, &self.config.login_url)
            .await?;
        let session = token.to_session()?;
        info!(instance_url = %session.instance_url(), "Logged in");

        let client = SalesforceClient::from_session(session, self.config.client.clone())?
            .with_api_version(&self.config.api_version)
            .with_bulk_api_version(&self.config.bulk_api_version);
        Ok(SalesforceRestClient::from_client(client))
    }

    /// Fail before login if writes are blocked.
    fn guard_write(&self) -> Result<()> {
        if self.config.writes_blocked() {
            warn!("Blocked mutating call");
            return Err(sfdc_client::Error::new(ErrorKind::WritesBlocked).into());
        }
        Ok(())
    }

    // =========================================================================
    // REST Calls
    // =========================================================================

    /// GET an instance-relative path with query parameters.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        Ok(self.rest().await?.get(path, params).await?)
    }

    /// POST a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.guard_write()?;
        Ok(self.rest().await?.post(path, body).await?)
    }

    /// PATCH a JSON body. `None` means updated with no response body.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Option<T>> {
        self.guard_write()?;
        Ok(self.rest().await?.patch(path, body).await?)
    }

    /// PUT a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        self.guard_write()?;
        Ok(self.rest().await?.put(path, body).await?)
    }

    /// DELETE a path.
    pub async fn delete(&self, path: &str) -> Result<DeleteResponse> {
        self.guard_write()?;
        Ok(self.rest().await?.delete(path).await?)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// First page of a SOQL query.
    pub async fn query<T: DeserializeOwned>(
        &self,
        soql: &str,
        include_deleted: bool,
    ) -> Result<ResultPage<T>> {
        Ok(self.rest().await?.query(soql, include_deleted).await?)
    }

    /// Cursor over a SOQL query, holding its first page.
    pub async fn query_cursor<T: DeserializeOwned + Clone>(
        &self,
        soql: &str,
        include_deleted: bool,
    ) -> Result<QueryCursor<T>> {
        let rest = self.rest().await?;
        Ok(rest.query_cursor(soql, include_deleted).await?)
    }

    /// Every record of a SOQL query, all pages concatenated.
    pub async fn query_all<T: DeserializeOwned + Clone>(&self, soql: &str) -> Result<Vec<T>> {
        Ok(self.rest().await?.query_all(soql).await?)
    }

    // =========================================================================
    // Bulk Jobs
    // =========================================================================

    /// Create a bulk job on the server and return it in the created phase.
    ///
    /// While writes are blocked only `query` jobs are allowed; other
    /// operations fail before login.
    pub async fn create_job(
        &self,
        operation: BulkOperation,
        object: &str,
        content_type: ContentType,
    ) -> Result<BulkJob> {
        if operation.is_mutating() {
            self.guard_write()?;
        }

        let client = self.rest().await?.inner().clone();
        let mut job = BulkJob::new(client, operation, object, content_type);
        job.create().await?;
        Ok(job)
    }
}
