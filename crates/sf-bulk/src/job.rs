//! Bulk job lifecycle.
//!
//! A [`BulkJob`] is created locally in the [`JobPhase::Inert`] phase and only
//! talks to the server when a command is issued:
//!
//! ```text
//! Inert --create--> Created --close--> Closed
//!                      |  \
//!                      |   `--abort--> Aborted
//!                      `--add_batch (any number of times)
//! ```
//!
//! Each command sends exactly one request. A command that fails, locally or
//! remotely, leaves the phase as it was.

use bytes::Bytes;
use serde::Serialize;
use tracing::{info, instrument, warn};

use sfdc_client::{Error, ErrorKind, ErrorShape, Result, SalesforceClient};

use crate::types::{
    BatchInfo, BulkOperation, ContentType, CreateJobRequest, JobInfo, JobStateRequest,
};

/// Where a job is in its lifecycle, with the latest server snapshot.
#[derive(Debug, Clone)]
pub enum JobPhase {
    /// Not yet created on the server.
    Inert,
    /// Open and accepting batches.
    Created(JobInfo),
    /// Closed; no more batches are accepted.
    Closed(JobInfo),
    /// Aborted; unprocessed batches are discarded.
    Aborted(JobInfo),
}

impl JobPhase {
    /// The latest server snapshot, absent before creation.
    pub fn info(&self) -> Option<&JobInfo> {
        match self {
            JobPhase::Inert => None,
            JobPhase::Created(info) | JobPhase::Closed(info) | JobPhase::Aborted(info) => {
                Some(info)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            JobPhase::Inert => "inert",
            JobPhase::Created(_) => "created",
            JobPhase::Closed(_) => "closed",
            JobPhase::Aborted(_) => "aborted",
        }
    }
}

/// One async Bulk API job: an operation on one object type.
///
/// # Example
///
/// ```rust,ignore
/// use sfdc_bulk::{BulkJob, BulkOperation, ContentType};
///
/// let mut job = BulkJob::new(client, BulkOperation::Insert, "Account", ContentType::Csv);
/// job.create().await?;
/// job.add_batch("Name\nAcme\nGlobex\n").await?;
/// job.close().await?;
/// ```
#[derive(Debug)]
pub struct BulkJob {
    client: SalesforceClient,
    operation: BulkOperation,
    object: String,
    content_type: ContentType,
    phase: JobPhase,
}

impl BulkJob {
    /// Describe a job without contacting the server.
    pub fn new(
        client: SalesforceClient,
        operation: BulkOperation,
        object: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            client,
            operation,
            object: object.into(),
            content_type,
            phase: JobPhase::Inert,
        }
    }

    pub fn operation(&self) -> BulkOperation {
        self.operation
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn phase(&self) -> &JobPhase {
        &self.phase
    }

    /// The latest server snapshot.
    pub fn info(&self) -> Option<&JobInfo> {
        self.phase.info()
    }

    /// The server-assigned job id, present once created.
    pub fn id(&self) -> Option<&str> {
        self.info().map(|info| info.id.as_str())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Create the job on the server.
    ///
    /// When writes are blocked only `query` jobs may be created.
    #[instrument(skip(self), fields(operation = %self.operation, object = %self.object))]
    pub async fn create(&mut self) -> Result<JobInfo> {
        if !matches!(self.phase, JobPhase::Inert) {
            return Err(self.wrong_phase("create"));
        }

        if self.client.writes_blocked() && self.operation.is_mutating() {
            warn!(operation = %self.operation, "Blocked bulk job creation");
            return Err(Error::new(ErrorKind::WritesBlocked));
        }

        let request = CreateJobRequest {
            operation: self.operation,
            object: self.object.clone(),
            content_type: self.content_type,
        };
        let info = self.dispatch_command(&request).await?;

        info!(job_id = %info.id, "Bulk job created");
        self.phase = JobPhase::Created(info.clone());
        Ok(info)
    }

    /// Upload one batch of records, formatted per the job's content type.
    ///
    /// A failed upload reports the raw response body as
    /// [`ErrorKind::UnstructuredRemote`].
    #[instrument(skip(self, content), fields(job_id = ?self.id()))]
    pub async fn add_batch(&self, content: impl Into<Bytes>) -> Result<BatchInfo> {
        let job_id = self.require_created("add a batch to")?;

        let url = self.client.async_url(&format!("job/{}/batch", job_id));
        let request = self
            .client
            .async_post(&url)
            .raw(content, self.content_type.mime())
            .error_shape(ErrorShape::Raw);

        let response = self.client.execute_unguarded(request).await?;
        response.json().await
    }

    /// Close the job. No further batches are accepted.
    #[instrument(skip(self), fields(job_id = ?self.id()))]
    pub async fn close(&mut self) -> Result<JobInfo> {
        self.require_created("close")?;

        let info = self.dispatch_command(&JobStateRequest::close()).await?;
        info!(job_id = %info.id, "Bulk job closed");
        self.phase = JobPhase::Closed(info.clone());
        Ok(info)
    }

    /// Abort the job.
    #[instrument(skip(self), fields(job_id = ?self.id()))]
    pub async fn abort(&mut self) -> Result<JobInfo> {
        self.require_created("abort")?;

        let info = self.dispatch_command(&JobStateRequest::abort()).await?;
        info!(job_id = %info.id, "Bulk job aborted");
        self.phase = JobPhase::Aborted(info.clone());
        Ok(info)
    }

    /// POST a job command: to the job collection before creation, to the
    /// job itself afterwards.
    async fn dispatch_command<B: Serialize>(&self, payload: &B) -> Result<JobInfo> {
        let url = match self.id() {
            None => self.client.async_url("job"),
            Some(id) => self.client.async_url(&format!("job/{}", id)),
        };

        let request = self.client.async_post(&url).json(payload)?;
        let response = self.client.execute_unguarded(request).await?;
        response.json().await
    }

    fn require_created(&self, action: &str) -> Result<&str> {
        match &self.phase {
            JobPhase::Created(info) => Ok(&info.id),
            _ => Err(self.wrong_phase(action)),
        }
    }

    fn wrong_phase(&self, action: &str) -> Error {
        Error::invalid_state(format!(
            "cannot {} a bulk job that is {}",
            action,
            self.phase.name()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sfdc_client::ClientConfig;
    use wiremock::matchers::{any, body_json, body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const JOB_ID: &str = "750xx0000000001";

    fn client(server: &MockServer) -> SalesforceClient {
        SalesforceClient::new(server.uri(), "token").unwrap()
    }

    fn blocked_client(server: &MockServer) -> SalesforceClient {
        SalesforceClient::with_config(
            server.uri(),
            "token",
            ClientConfig::builder().with_block_writes(true).build(),
        )
        .unwrap()
    }

    fn job_info(state: &str) -> serde_json::Value {
        serde_json::json!({
            "id": JOB_ID,
            "operation": "insert",
            "object": "Account",
            "state": state,
            "contentType": "CSV",
            "apiVersion": 36.0
        })
    }

    async fn mount_create(server: &MockServer, operation: &str) {
        Mock::given(method("POST"))
            .and(path("/services/async/36.0/job"))
            .and(header("X-SFDC-Session", "token"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "operation": operation,
                "object": "Account",
                "contentType": "CSV"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(job_info("Open")))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_state_change(server: &MockServer, state: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/services/async/36.0/job/{}", JOB_ID)))
            .and(header("X-SFDC-Session", "token"))
            .and(body_json(serde_json::json!({"state": state})))
            .respond_with(ResponseTemplate::new(200).set_body_json(job_info(state)))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn created_job(server: &MockServer) -> BulkJob {
        mount_create(server, "insert").await;
        let mut job = BulkJob::new(
            client(server),
            BulkOperation::Insert,
            "Account",
            ContentType::Csv,
        );
        job.create().await.unwrap();
        job
    }

    #[tokio::test]
    async fn test_create_then_close() {
        let mock_server = MockServer::start().await;
        let mut job = created_job(&mock_server).await;

        assert_eq!(job.id(), Some(JOB_ID));
        assert!(matches!(job.phase(), JobPhase::Created(_)));

        mount_state_change(&mock_server, "Closed").await;
        let info = job.close().await.unwrap();

        assert_eq!(info.state.as_deref(), Some("Closed"));
        assert!(matches!(job.phase(), JobPhase::Closed(_)));
        assert_eq!(job.id(), Some(JOB_ID));
    }

    #[tokio::test]
    async fn test_create_then_abort() {
        let mock_server = MockServer::start().await;
        let mut job = created_job(&mock_server).await;

        mount_state_change(&mock_server, "Aborted").await;
        job.abort().await.unwrap();

        assert!(matches!(job.phase(), JobPhase::Aborted(_)));
        assert_eq!(job.info().unwrap().state.as_deref(), Some("Aborted"));
    }

    #[tokio::test]
    async fn test_commands_before_create_are_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let mut job = BulkJob::new(
            client(&mock_server),
            BulkOperation::Insert,
            "Account",
            ContentType::Csv,
        );

        let err = job.add_batch("Name\nAcme\n").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));

        let err = job.close().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));

        let err = job.abort().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));

        assert!(job.id().is_none());
        assert!(matches!(job.phase(), JobPhase::Inert));
    }

    #[tokio::test]
    async fn test_no_transition_out_of_terminal_phases() {
        let mock_server = MockServer::start().await;
        let mut job = created_job(&mock_server).await;

        mount_state_change(&mock_server, "Closed").await;
        job.close().await.unwrap();

        let err = job.abort().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(ref msg) if msg.contains("closed")));

        let err = job.close().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));

        let err = job.create().await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));

        let err = job.add_batch("Name\n").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_blocked_writes_allow_query_jobs() {
        let mock_server = MockServer::start().await;
        mount_create(&mock_server, "query").await;

        let mut job = BulkJob::new(
            blocked_client(&mock_server),
            BulkOperation::Query,
            "Account",
            ContentType::Csv,
        );
        job.create().await.unwrap();

        assert!(matches!(job.phase(), JobPhase::Created(_)));
    }

    #[tokio::test]
    async fn test_blocked_writes_reject_mutating_jobs() {
        let mock_server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(201).set_body_json(job_info("Open")))
            .expect(0)
            .mount(&mock_server)
            .await;

        for operation in [
            BulkOperation::Insert,
            BulkOperation::Update,
            BulkOperation::Delete,
            BulkOperation::Upsert,
            BulkOperation::HardDelete,
        ] {
            let mut job = BulkJob::new(
                blocked_client(&mock_server),
                operation,
                "Account",
                ContentType::Csv,
            );
            let err = job.create().await.unwrap_err();
            assert!(err.is_writes_blocked(), "{operation} should be blocked");
            assert!(matches!(job.phase(), JobPhase::Inert));
        }
    }

    #[tokio::test]
    async fn test_create_failure_uses_bulk_error_shape() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/services/async/36.0/job"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "exceptionCode": "InvalidJob",
                "exceptionMessage": "Unable to find object: Acount"
            })))
            .mount(&mock_server)
            .await;

        let mut job = BulkJob::new(
            client(&mock_server),
            BulkOperation::Insert,
            "Acount",
            ContentType::Csv,
        );
        let err = job.create().await.unwrap_err();

        assert!(matches!(err.kind, ErrorKind::RemoteApi { status: 400, .. }));
        assert_eq!(
            err.remote_message(),
            Some("InvalidJob : Unable to find object: Acount")
        );
        assert!(matches!(job.phase(), JobPhase::Inert));
    }

    #[tokio::test]
    async fn test_failed_close_keeps_job_open() {
        let mock_server = MockServer::start().await;
        let mut job = created_job(&mock_server).await;

        Mock::given(method("POST"))
            .and(path(format!("/services/async/36.0/job/{}", JOB_ID)))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "exceptionCode": "InvalidJobState",
                "exceptionMessage": "Job not open"
            })))
            .mount(&mock_server)
            .await;

        let err = job.close().await.unwrap_err();
        assert_eq!(err.remote_message(), Some("InvalidJobState : Job not open"));
        assert!(matches!(job.phase(), JobPhase::Created(_)));
    }

    #[tokio::test]
    async fn test_add_batch_sends_raw_content() {
        let mock_server = MockServer::start().await;
        let job = created_job(&mock_server).await;

        Mock::given(method("POST"))
            .and(path(format!("/services/async/36.0/job/{}/batch", JOB_ID)))
            .and(header("X-SFDC-Session", "token"))
            .and(header("Content-Type", "text/csv"))
            .and(body_string("Name\nAcme\n"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "751xx0000000001",
                "jobId": JOB_ID,
                "state": "Queued"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let batch = job.add_batch("Name\nAcme\n").await.unwrap();
        assert_eq!(batch.id, "751xx0000000001");
        assert_eq!(batch.state.as_deref(), Some("Queued"));
    }

    #[tokio::test]
    async fn test_add_batch_failure_is_unstructured() {
        let mock_server = MockServer::start().await;
        let job = created_job(&mock_server).await;

        let body =
            r#"{"exceptionCode":"InvalidBatch","exceptionMessage":"Field name not found : Nmae"}"#;
        Mock::given(method("POST"))
            .and(path(format!("/services/async/36.0/job/{}/batch", JOB_ID)))
            .respond_with(ResponseTemplate::new(400).set_body_string(body))
            .mount(&mock_server)
            .await;

        let err = job.add_batch("Nmae\nAcme\n").await.unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnstructuredRemote(ref raw) if raw == body));
        assert!(matches!(job.phase(), JobPhase::Created(_)));
    }
}
