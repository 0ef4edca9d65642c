//! Implements the `ExpenseApi` trait over HTTP with reqwest.

use crate::api::ExpenseApi;
use crate::model::{ExpenseDraft, ExpensePatch, ExpensePayload};
use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::trace;
use url::Url;

/// Talks JSON to the remote expense service. One client, one bounded
/// round-trip per call, no retries; retry policy belongs to the caller.
pub struct HttpExpenseApi {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpExpenseApi {
    /// Creates a client for the service at `base_url`. Every call is bounded
    /// by `timeout` in total.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash makes Url::join treat the last path segment as a
        // directory rather than replacing it.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|err| Error::Config(format!("invalid base url '{base_url}': {err}")))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Config(format!("unable to build the http client: {err}")))?;
        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|err| Error::Config(format!("invalid endpoint '{path}': {err}")))
    }
}

/// The list endpoint has two known response shapes: `{"expenses": [...]}`
/// and a bare array. Neither backend is authoritative, so both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ListBody {
    Wrapped { expenses: Vec<ExpensePayload> },
    Bare(Vec<ExpensePayload>),
}

impl ListBody {
    fn into_payloads(self) -> Vec<ExpensePayload> {
        match self {
            ListBody::Wrapped { expenses } => expenses,
            ListBody::Bare(expenses) => expenses,
        }
    }
}

/// Known error-body shapes, e.g. `{"message": "..."}` or `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// No response was received at all; previously cached data stays usable.
fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Connectivity("the request timed out".to_string())
    } else {
        Error::Connectivity(err.to_string())
    }
}

/// A response arrived but could not be decoded as the expected JSON.
fn decode_error(status: reqwest::StatusCode, err: reqwest::Error) -> Error {
    Error::Request {
        status: status.as_u16(),
        message: format!("unexpected response body: {err}"),
    }
}

/// Converts an error response into `Error::Request`, preferring the
/// server-supplied message over the status line.
async fn status_error(response: reqwest::Response) -> Error {
    let status = response.status();
    let fallback = status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message.or(body.error).unwrap_or(fallback),
        Err(_) => fallback,
    };
    Error::Request {
        status: status.as_u16(),
        message,
    }
}

#[async_trait::async_trait]
impl ExpenseApi for HttpExpenseApi {
    async fn list(&self) -> Result<Vec<ExpensePayload>> {
        trace!("GET /expenses");
        let response = self
            .http
            .get(self.endpoint("expenses")?)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let status = response.status();
        let body = response
            .json::<ListBody>()
            .await
            .map_err(|err| decode_error(status, err))?;
        Ok(body.into_payloads())
    }

    async fn get(&self, id: &str) -> Result<ExpensePayload> {
        trace!("GET /expenses/{id}");
        let response = self
            .http
            .get(self.endpoint(&format!("expenses/{id}"))?)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let status = response.status();
        response
            .json::<ExpensePayload>()
            .await
            .map_err(|err| decode_error(status, err))
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<ExpensePayload> {
        trace!("POST /expenses");
        let response = self
            .http
            .post(self.endpoint("expenses")?)
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let status = response.status();
        response
            .json::<ExpensePayload>()
            .await
            .map_err(|err| decode_error(status, err))
    }

    async fn update(&self, id: &str, patch: &ExpensePatch) -> Result<ExpensePayload> {
        trace!("PUT /expenses/{id}");
        let response = self
            .http
            .put(self.endpoint(&format!("expenses/{id}"))?)
            .json(patch)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        let status = response.status();
        response
            .json::<ExpensePayload>()
            .await
            .map_err(|err| decode_error(status, err))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        trace!("DELETE /expenses/{id}");
        let response = self
            .http
            .delete(self.endpoint(&format!("expenses/{id}"))?)
            .send()
            .await
            .map_err(transport_error)?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        // The ack body is empty or uninteresting either way.
        Ok(())
    }
}
