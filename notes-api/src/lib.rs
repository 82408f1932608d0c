pub mod endpoints;
mod error;
mod macros;
pub mod pipeline;
pub mod repositories;
mod request;

// Always expose testing module (downstream crates test against it)
pub mod testing;

pub use crate::error::ApiError;
pub use crate::request::{ApiRequest, RequestData};
pub use reqwest::{Method, StatusCode};
pub use secrecy::SecretString;

use pipeline::{OutboundRequest, Pipeline};
use repositories::*;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Typed entry point to the notes server. Every call goes through the
/// configured [`Pipeline`].
#[derive(Clone)]
pub struct Client {
    base_url: String,
    pipeline: Arc<Pipeline>,
}

impl Client {
    pub fn new(base_url: impl Into<String>, pipeline: Pipeline) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            pipeline: Arc::new(pipeline),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, ApiError>
    where
        R: ApiRequest,
    {
        let outbound = self.prepare(&request)?;
        tracing::debug!(method = %outbound.method, url = %outbound.url, "Dispatching request");

        let response = self.pipeline.dispatch(outbound).await?;
        serde_json::from_str(&response.body).map_err(ApiError::Decode)
    }

    fn prepare<R: ApiRequest>(&self, request: &R) -> Result<OutboundRequest, ApiError> {
        let raw_url = format!("{}{}", self.base_url, request.endpoint());
        let mut url = reqwest::Url::parse(&raw_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw_url, e)))?;

        let mut body = None;
        match request.data() {
            RequestData::Empty => {}
            RequestData::Query(data) => {
                let pairs = query_pairs(data)?;
                if !pairs.is_empty() {
                    url.query_pairs_mut().extend_pairs(pairs);
                }
            }
            RequestData::Json(data) => {
                body = Some(serde_json::to_value(data).map_err(ApiError::Encode)?);
            }
        }

        let mut outbound = OutboundRequest::new(R::METHOD, url.to_string());
        outbound.body = body;
        Ok(outbound)
    }
}

/// Flatten a serializable struct into query pairs, dropping absent values.
fn query_pairs<T: serde::Serialize>(data: &T) -> Result<Vec<(String, String)>, ApiError> {
    let value = serde_json::to_value(data).map_err(ApiError::Encode)?;
    let serde_json::Value::Object(map) = value else {
        return Ok(Vec::new());
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}

pub struct Request;

impl Request {
    pub fn auth() -> AuthRepository {
        AuthRepository::new()
    }

    pub fn notes() -> NoteRepository {
        NoteRepository::new()
    }

    pub fn shares() -> ShareRepository {
        ShareRepository::new()
    }

    pub fn public_links() -> PublicLinkRepository {
        PublicLinkRepository::new()
    }
}
