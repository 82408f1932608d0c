use super::{HttpFailure, Middleware, Next, OutboundRequest, PipelineResult};
use futures::future::BoxFuture;
use reqwest::StatusCode;
use std::sync::Arc;

pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const FORBIDDEN: &str = "You do not have permission to access this resource.";
pub const NOT_FOUND: &str = "Resource not found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ClientNetwork,
    Unauthorized,
    Forbidden,
    NotFound,
    ServerMessage,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ClassifiedError {
    /// First matching rule wins: network, 401, 403, 404, server-supplied
    /// message, then the generic status line.
    pub fn classify(failure: &HttpFailure) -> Self {
        let (kind, message) = match failure {
            HttpFailure::Network { message } => {
                (ErrorKind::ClientNetwork, format!("Error: {}", message))
            }
            HttpFailure::Status { status, .. } if *status == StatusCode::UNAUTHORIZED => {
                (ErrorKind::Unauthorized, SESSION_EXPIRED.to_string())
            }
            HttpFailure::Status { status, .. } if *status == StatusCode::FORBIDDEN => {
                (ErrorKind::Forbidden, FORBIDDEN.to_string())
            }
            HttpFailure::Status { status, .. } if *status == StatusCode::NOT_FOUND => {
                (ErrorKind::NotFound, NOT_FOUND.to_string())
            }
            HttpFailure::Status {
                status,
                status_text,
                ..
            } => match failure.server_message() {
                Some(message) => (ErrorKind::ServerMessage, message),
                None => (
                    ErrorKind::Generic,
                    format!("Error Code: {}\nMessage: {}", status.as_u16(), status_text),
                ),
            },
        };

        Self { kind, message }
    }
}

/// Transient, user-visible notification sink.
pub trait Notifier: Send + Sync {
    fn error(&self, title: &str, message: &str);
}

/// Invoked when the server rejects the credential.
pub trait SessionTeardown: Send + Sync {
    fn session_expired(&self);
}

/// Classifies every failed response, tears the session down on 401 and
/// notifies the user, then hands the original failure back unchanged.
pub struct ClassifyErrors {
    teardown: Arc<dyn SessionTeardown>,
    notifier: Arc<dyn Notifier>,
}

impl ClassifyErrors {
    pub fn new(teardown: Arc<dyn SessionTeardown>, notifier: Arc<dyn Notifier>) -> Self {
        Self { teardown, notifier }
    }
}

impl Middleware for ClassifyErrors {
    fn handle<'a>(
        &'a self,
        request: OutboundRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, PipelineResult> {
        Box::pin(async move {
            let method = request.method.clone();
            let url = request.url.clone();
            let result = next.run(request).await;

            if let Err(failure) = &result {
                let classified = ClassifiedError::classify(failure);
                tracing::warn!(
                    %method,
                    %url,
                    kind = ?classified.kind,
                    "Request failed: {}",
                    failure
                );

                if classified.kind == ErrorKind::Unauthorized {
                    self.teardown.session_expired();
                }
                self.notifier.error("Error", &classified.message);
            }

            result
        })
    }
}
