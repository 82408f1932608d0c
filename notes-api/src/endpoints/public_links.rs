use super::notes::{NoteId, NoteResponse};
use super::{ApiResponse, EmptyBody, EmptyResponse};
use crate::request::{ApiRequest, RequestData};
use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

// Common

pub type PublicLinkId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    pub id: PublicLinkId,
    pub note_id: NoteId,
    pub url_token: String,
    pub public_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<NaiveDateTime>,
}

pub type PublicLinkResponse = ApiResponse<PublicLink>;
pub type PublicLinksResponse = ApiResponse<Vec<PublicLink>>;

// Requests

#[derive(Debug, Clone)]
pub struct CreatePublicLink {
    note_id: NoteId,
    body: EmptyBody,
}

impl CreatePublicLink {
    pub fn new(note_id: NoteId) -> Self {
        Self {
            note_id,
            body: EmptyBody::default(),
        }
    }
}

impl ApiRequest for CreatePublicLink {
    type Data = EmptyBody;
    type Response = PublicLinkResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}/share/public", self.note_id).into()
    }

    fn data(&self) -> RequestData<&EmptyBody> {
        RequestData::Json(&self.body)
    }
}

#[derive(Debug, Clone)]
pub struct ListPublicLinks {
    note_id: NoteId,
}

impl ListPublicLinks {
    pub fn new(note_id: NoteId) -> Self {
        Self { note_id }
    }
}

impl ApiRequest for ListPublicLinks {
    type Data = ();
    type Response = PublicLinksResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}/public-links", self.note_id).into()
    }
}

#[derive(Debug, Clone)]
pub struct DeletePublicLink {
    link_id: PublicLinkId,
}

impl DeletePublicLink {
    pub fn new(link_id: PublicLinkId) -> Self {
        Self { link_id }
    }
}

impl ApiRequest for DeletePublicLink {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/public-links/{}", self.link_id).into()
    }
}

/// Read-only access to a note through its public token. Needs no session.
#[derive(Debug, Clone)]
pub struct GetPublicNote {
    url_token: String,
}

impl GetPublicNote {
    pub fn new(url_token: impl Into<String>) -> Self {
        Self {
            url_token: url_token.into(),
        }
    }
}

impl ApiRequest for GetPublicNote {
    type Data = ();
    type Response = NoteResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/p/{}", self.url_token).into()
    }
}
