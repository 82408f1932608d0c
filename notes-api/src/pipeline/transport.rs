use super::{HttpFailure, OutboundRequest, PipelineResult, RawResponse, Transport};
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Sends requests over the network with reqwest.
pub struct ReqwestTransport {
    http_client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self { http_client })
    }

    async fn send(&self, request: OutboundRequest) -> PipelineResult {
        let mut builder = self
            .http_client
            .request(request.method, request.url.as_str())
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| HttpFailure::Network {
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::warn!(%status, "Failed to read response body: {}", e);
                None
            }
        };

        settle(status, body)
    }
}

/// Turn a received status and body into the pipeline result. Once a status
/// has arrived the failure is never a network one; an unreadable body is
/// reported as that status with an empty body.
fn settle(status: StatusCode, body: Option<String>) -> PipelineResult {
    match body {
        Some(body) if status.is_success() => Ok(RawResponse { status, body }),
        body => Err(HttpFailure::Status {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.unwrap_or_default(),
        }),
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, PipelineResult> {
        Box::pin(self.send(request))
    }
}
