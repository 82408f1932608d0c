//! Request pipeline: an ordered chain of middlewares in front of a transport.
//!
//! Each middleware receives the outbound request and a [`Next`] handle for the
//! rest of the chain. The first middleware registered is the outermost one, so
//! with `[AttachCredentials, ClassifyErrors]` the credential is attached before
//! anything else runs and error classification sits directly on top of the
//! transport.

mod credentials;
mod errors;
mod transport;

pub use credentials::{is_public_endpoint, AttachCredentials, CredentialSource, PUBLIC_MARKERS};
pub use errors::{
    ClassifiedError, ClassifyErrors, ErrorKind, FORBIDDEN, NOT_FOUND, Notifier, SESSION_EXPIRED,
    SessionTeardown,
};
pub use transport::ReqwestTransport;

use crate::error::ApiError;
use futures::future::BoxFuture;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use std::sync::Arc;

pub type PipelineResult = Result<RawResponse, HttpFailure>;

/// A single outbound call. Middlewares may add headers; nothing else is
/// rewritten on the way down.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<serde_json::Value>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpFailure {
    /// No response was received.
    #[error("Network error: {message}")]
    Network { message: String },

    #[error("HTTP {status}: {status_text}")]
    Status {
        status: StatusCode,
        status_text: String,
        body: String,
    },
}

impl HttpFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            HttpFailure::Network { .. } => None,
            HttpFailure::Status { status, .. } => Some(*status),
        }
    }

    /// The `message` field of a JSON error envelope, if the server sent one.
    pub fn server_message(&self) -> Option<String> {
        let HttpFailure::Status { body, .. } = self else {
            return None;
        };

        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }
}

pub trait Middleware: Send + Sync {
    fn handle<'a>(&'a self, request: OutboundRequest, next: Next<'a>)
    -> BoxFuture<'a, PipelineResult>;
}

/// The terminal stage of the chain.
pub trait Transport: Send + Sync {
    fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, PipelineResult>;
}

/// Continuation handed to a middleware: the remaining middlewares plus the
/// transport.
pub struct Next<'a> {
    middlewares: &'a [Arc<dyn Middleware>],
    transport: &'a dyn Transport,
}

impl<'a> Next<'a> {
    pub fn run(self, request: OutboundRequest) -> BoxFuture<'a, PipelineResult> {
        match self.middlewares.split_first() {
            Some((head, rest)) => head.handle(
                request,
                Next {
                    middlewares: rest,
                    transport: self.transport,
                },
            ),
            None => self.transport.execute(request),
        }
    }
}

pub struct Pipeline {
    middlewares: Vec<Arc<dyn Middleware>>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            middlewares: Vec::new(),
            transport: Arc::new(transport),
        }
    }

    /// Append a middleware. Middlewares run in the order they are added.
    pub fn with(mut self, middleware: impl Middleware + 'static) -> Self {
        self.middlewares.push(Arc::new(middleware));
        self
    }

    /// Run the chain in the current task.
    pub async fn run(&self, request: OutboundRequest) -> PipelineResult {
        Next {
            middlewares: &self.middlewares,
            transport: self.transport.as_ref(),
        }
        .run(request)
        .await
    }

    /// Run the chain on its own task.
    ///
    /// Dropping the returned future only abandons the result: the chain, and
    /// any session teardown it triggers, still completes once the network
    /// call settles.
    pub async fn dispatch(self: &Arc<Self>, request: OutboundRequest) -> Result<RawResponse, ApiError> {
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move { pipeline.run(request).await });

        match handle.await {
            Ok(result) => result.map_err(ApiError::Http),
            Err(e) => Err(ApiError::Aborted(e.to_string())),
        }
    }
}
