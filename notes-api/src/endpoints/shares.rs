use super::notes::NoteId;
use super::{ApiResponse, EmptyResponse};
use crate::request::{ApiRequest, RequestData};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

pub type ShareId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    Read,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub id: ShareId,
    pub note_id: NoteId,
    pub shared_with_email: String,
    pub permission: Permission,
}

pub type ShareResponse = ApiResponse<Share>;
pub type SharesResponse = ApiResponse<Vec<Share>>;

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct ShareWithUser {
    #[serde(skip)]
    note_id: NoteId,
    email: String,
}

impl ShareWithUser {
    pub fn new(note_id: NoteId, email: impl Into<String>) -> Self {
        Self {
            note_id,
            email: email.into(),
        }
    }
}

impl ApiRequest for ShareWithUser {
    type Data = Self;
    type Response = ShareResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}/share/user", self.note_id).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct ListShares {
    note_id: NoteId,
}

impl ListShares {
    pub fn new(note_id: NoteId) -> Self {
        Self { note_id }
    }
}

impl ApiRequest for ListShares {
    type Data = ();
    type Response = SharesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}/shares", self.note_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct RemoveShare {
    share_id: ShareId,
}

impl RemoveShare {
    pub fn new(share_id: ShareId) -> Self {
        Self { share_id }
    }
}

impl ApiRequest for RemoveShare {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/shares/{}", self.share_id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_with_user_body_omits_note_id() {
        let req = ShareWithUser::new(12, "friend@x.com");
        assert_eq!(req.endpoint(), "/notes/12/share/user");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"email": "friend@x.com"})
        );
    }

    #[test]
    fn test_share_from_wire() {
        let share: Share = serde_json::from_str(
            r#"{"id":3,"noteId":12,"sharedWithEmail":"friend@x.com","permission":"READ"}"#,
        )
        .unwrap();
        assert_eq!(share.permission, Permission::Read);
        assert_eq!(share.note_id, 12);
    }
}
