use super::{Middleware, Next, OutboundRequest, PipelineResult};
use futures::future::BoxFuture;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use std::sync::Arc;

/// URL fragments of endpoints that must never carry a credential: the
/// authentication exchange and public note links.
pub const PUBLIC_MARKERS: [&str; 2] = ["/auth/", "/p/"];

/// Plain substring match over the whole URL.
pub fn is_public_endpoint(url: &str) -> bool {
    PUBLIC_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Where the current access token comes from.
pub trait CredentialSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Adds `Authorization: Bearer <token>` to every non-public request while a
/// token is present. No refresh is attempted here.
pub struct AttachCredentials {
    source: Arc<dyn CredentialSource>,
}

impl AttachCredentials {
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }
}

impl Middleware for AttachCredentials {
    fn handle<'a>(
        &'a self,
        mut request: OutboundRequest,
        next: Next<'a>,
    ) -> BoxFuture<'a, PipelineResult> {
        if !is_public_endpoint(&request.url) {
            if let Some(token) = self.source.access_token().filter(|t| !t.is_empty()) {
                match HeaderValue::from_str(&format!("Bearer {}", token)) {
                    Ok(value) => {
                        request.headers.insert(AUTHORIZATION, value);
                    }
                    Err(e) => {
                        tracing::warn!("Stored access token is not a valid header value: {}", e);
                    }
                }
            }
        }

        next.run(request)
    }
}
