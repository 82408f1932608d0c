use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;

/// Payload carried by a request: nothing, a query string, or a JSON body.
pub enum RequestData<T> {
    Empty,
    Query(T),
    Json(T),
}

/// A typed endpoint description.
///
/// Implementors describe where a call goes and what it carries; the
/// [`Client`](crate::Client) turns them into outbound requests and decodes
/// the response into [`ApiRequest::Response`].
pub trait ApiRequest {
    type Data: Serialize;
    type Response: DeserializeOwned;
    const METHOD: Method = Method::GET;

    fn endpoint(&self) -> Cow<'_, str>;

    fn data(&self) -> RequestData<&Self::Data> {
        RequestData::Empty
    }
}
