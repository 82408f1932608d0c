pub mod auth;
pub mod notes;
pub mod public_links;
pub mod shares;

use serde::{Deserialize, Serialize};

/// Envelope wrapping every server response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PageMetadata>,
}

/// Pagination details returned by list endpoints. `number` is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

impl PageMetadata {
    pub fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

/// Response of endpoints that only report a status and a message.
pub type EmptyResponse = ApiResponse<()>;

/// The `{}` body some POST endpoints expect.
#[derive(Debug, Default, Clone, Serialize)]
pub struct EmptyBody {}
