//! HTTP response handling with Salesforce-specific extensions.
//!
//! Salesforce does not use one error body format across its APIs. The REST
//! API answers with an array of `{errorCode, message}` objects, the async
//! Bulk API with a single `{exceptionCode, exceptionMessage}` object, and the
//! batch endpoint is consumed as plain text. [`ErrorShape`] names the family a
//! request belongs to and each family keeps its own parser.

use serde::de::DeserializeOwned;

use crate::error::{Error, ErrorKind, Result};

/// Error body format of the endpoint family a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorShape {
    /// REST API: `[{"errorCode": "...", "message": "..."}]`, first element wins.
    #[default]
    Rest,
    /// Async Bulk API job endpoints: `{"exceptionCode": "...", "exceptionMessage": "..."}`.
    BulkJob,
    /// No parsing; the raw body becomes the error.
    Raw,
}

/// Wrapper around HTTP response with additional functionality.
#[derive(Debug)]
pub struct Response {
    inner: reqwest::Response,
}

impl Response {
    pub(crate) fn new(inner: reqwest::Response) -> Self {
        Self { inner }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Returns true if the platform reported a failure (status >= 400).
    pub fn is_error(&self) -> bool {
        self.status() >= 400
    }

    /// Returns true for 204 No Content.
    pub fn is_no_content(&self) -> bool {
        self.status() == 204
    }

    /// Read the body as text.
    pub async fn text(self) -> Result<String> {
        self.inner.text().await.map_err(Into::into)
    }

    /// Deserialize the JSON body.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let body = self.inner.bytes().await?;
        serde_json::from_slice(&body).map_err(Into::into)
    }
}

/// Extension trait for processing Salesforce API responses.
pub trait ResponseExt: Sized {
    /// Pass successful responses through; turn failures into errors using
    /// the parser for `shape`.
    fn check_salesforce_error(
        self,
        shape: ErrorShape,
    ) -> impl std::future::Future<Output = Result<Response>> + Send;
}

impl ResponseExt for Response {
    async fn check_salesforce_error(self, shape: ErrorShape) -> Result<Response> {
        if !self.is_error() {
            return Ok(self);
        }

        let status = self.status();
        let body = self.text().await?;
        Err(parse_error_response(shape, status, &body))
    }
}

/// Build the error for a failed response according to its endpoint family.
pub(crate) fn parse_error_response(shape: ErrorShape, status: u16, body: &str) -> Error {
    match shape {
        ErrorShape::Rest => rest_error(status, body),
        ErrorShape::BulkJob => bulk_job_error(status, body),
        ErrorShape::Raw => Error::new(ErrorKind::UnstructuredRemote(body.to_string())),
    }
}

fn rest_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<Vec<RestErrorResponse>>(body)
        .ok()
        .and_then(|errors| errors.into_iter().next())
        .map(|err| err.message)
        .unwrap_or_else(|| body.to_string());

    Error::new(ErrorKind::RemoteApi { status, message })
}

fn bulk_job_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<BulkJobErrorResponse>(body)
        .map(|err| format!("{} : {}", err.exception_code, err.exception_message))
        .unwrap_or_else(|_| body.to_string());

    Error::new(ErrorKind::RemoteApi { status, message })
}

/// REST API error element.
#[derive(Debug, serde::Deserialize)]
struct RestErrorResponse {
    message: String,
}

/// Async Bulk API error body.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct BulkJobErrorResponse {
    exception_code: String,
    exception_message: String,
}
