use super::{ApiResponse, EmptyResponse};
use crate::macros::setter;
use crate::request::{ApiRequest, RequestData};
use chrono::NaiveDateTime;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;

// Common

pub type NoteId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    Private,
    Shared,
    Public,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Private => f.write_str("PRIVATE"),
            Self::Shared => f.write_str("SHARED"),
            Self::Public => f.write_str("PUBLIC"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PRIVATE" => Ok(Self::Private),
            "SHARED" => Ok(Self::Shared),
            "PUBLIC" => Ok(Self::Public),
            _ => Err(format!(
                "invalid visibility '{}': expected private, shared or public",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content_md: String,
    pub visibility: Visibility,
    pub owner_email: String,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

pub type NoteResponse = ApiResponse<Note>;
pub type NotesResponse = ApiResponse<Vec<Note>>;

// Requests

#[derive(Default, Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNotes {
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_direction: Option<String>,
}

impl SearchNotes {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(opt query: String);
    setter!(opt visibility: Visibility);
    setter!(opt tag: String);
    setter!(opt page: u32);
    setter!(opt size: u32);
    setter!(opt sort_by: String);
    setter!(opt sort_direction: String);
}

impl ApiRequest for SearchNotes {
    type Data = Self;
    type Response = NotesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/notes".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

/// Notes other users shared with the caller. Page and size are always sent.
#[derive(Debug, Clone, Serialize)]
pub struct ListSharedNotes {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
}

impl Default for ListSharedNotes {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            query: None,
            tag: None,
        }
    }
}

impl ListSharedNotes {
    pub fn new() -> Self {
        Self::default()
    }

    setter!(page: u32);
    setter!(size: u32);
    setter!(opt query: String);
    setter!(opt tag: String);
}

impl ApiRequest for ListSharedNotes {
    type Data = Self;
    type Response = NotesResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        "/notes/shared".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Query(self)
    }
}

#[derive(Debug, Clone)]
pub struct GetNote {
    id: NoteId,
}

impl GetNote {
    pub fn new(id: NoteId) -> Self {
        Self { id }
    }
}

impl ApiRequest for GetNote {
    type Data = ();
    type Response = NoteResponse;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}", self.id).into()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNote {
    title: String,
    content_md: String,
    tags: Vec<String>,
}

impl CreateNote {
    pub fn new(title: impl Into<String>, content_md: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content_md: content_md.into(),
            tags: Vec::new(),
        }
    }

    setter!(list tags: String);
}

impl ApiRequest for CreateNote {
    type Data = Self;
    type Response = NoteResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/notes".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

/// Partial update; only the fields that were set are sent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNote {
    #[serde(skip)]
    id: NoteId,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_md: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

impl UpdateNote {
    pub fn new(id: NoteId) -> Self {
        Self {
            id,
            title: None,
            content_md: None,
            visibility: None,
            tags: None,
        }
    }

    setter!(opt title: String);
    setter!(opt content_md: String);
    setter!(opt visibility: Visibility);
    setter!(opt list tags: String);
}

impl ApiRequest for UpdateNote {
    type Data = Self;
    type Response = NoteResponse;
    const METHOD: Method = Method::PUT;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}", self.id).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone)]
pub struct DeleteNote {
    id: NoteId,
}

impl DeleteNote {
    pub fn new(id: NoteId) -> Self {
        Self { id }
    }
}

impl ApiRequest for DeleteNote {
    type Data = ();
    type Response = EmptyResponse;
    const METHOD: Method = Method::DELETE;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/notes/{}", self.id).into()
    }
}
