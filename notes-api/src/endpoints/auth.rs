use super::ApiResponse;
use crate::request::{ApiRequest, RequestData};
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;

// Common

/// Tokens and identity returned by every auth exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub email: String,
}

pub type AuthResponse = ApiResponse<AuthPayload>;

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

// Requests

#[derive(Debug, Serialize)]
pub struct Credentials {
    email: String,
    #[serde(serialize_with = "expose")]
    password: SecretString,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<SecretString>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Register(Credentials);

impl Register {
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

impl ApiRequest for Register {
    type Data = Self;
    type Response = AuthResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/register".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct Login(Credentials);

impl Login {
    pub fn new(credentials: Credentials) -> Self {
        Self(credentials)
    }
}

impl ApiRequest for Login {
    type Data = Self;
    type Response = AuthResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/login".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Refresh {
    refresh_token: String,
}

impl Refresh {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
        }
    }
}

impl ApiRequest for Refresh {
    type Data = Self;
    type Response = AuthResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        "/auth/refresh".into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}
