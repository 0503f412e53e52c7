//! Request wrapper: URL joining, per-call headers, dispatch.
//!
//! # Design
//! `Request` borrows its `Client` and owns nothing. Each operation is split
//! into a `build_*` method producing an `HttpRequest` and a dispatch through
//! the client's transport. Content types are set on the descriptor of the
//! call that needs them, never on shared state.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::error::Result;
use crate::http::{HttpMethod, HttpRequest};
use crate::response::Response;

/// Everything except RFC 3986 unreserved characters is encoded, `/` included.
const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Payload of a POST.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Body {
    #[default]
    Empty,
    /// Bytes sent as-is, with an optional content type
    Raw {
        content: Vec<u8>,
        content_type: Option<String>,
    },
    /// Fields sent as `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
}

impl Body {
    pub fn raw(content: impl Into<Vec<u8>>, content_type: &str) -> Self {
        Body::Raw {
            content: content.into(),
            content_type: Some(content_type.to_string()),
        }
    }

    pub fn form<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Body::Form(fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    fn into_parts(self) -> (Option<Vec<u8>>, Option<String>) {
        match self {
            Body::Empty => (None, None),
            Body::Raw { content, content_type } => (Some(content), content_type),
            Body::Form(fields) => {
                let encoded = url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(fields)
                    .finish();
                (Some(encoded.into_bytes()), Some(CONTENT_TYPE_FORM.to_string()))
            }
        }
    }
}

impl From<Vec<u8>> for Body {
    fn from(content: Vec<u8>) -> Self {
        Body::Raw { content, content_type: None }
    }
}

impl From<&[u8]> for Body {
    fn from(content: &[u8]) -> Self {
        content.to_vec().into()
    }
}

impl From<String> for Body {
    fn from(content: String) -> Self {
        content.into_bytes().into()
    }
}

impl From<&str> for Body {
    fn from(content: &str) -> Self {
        content.as_bytes().into()
    }
}

/// Issues calls against a client's base URL.
#[derive(Debug, Clone, Copy)]
pub struct Request<'c> {
    client: &'c Client,
}

impl<'c> Request<'c> {
    pub fn new(client: &'c Client) -> Self {
        Self { client }
    }

    /// Percent-encode each `/`-separated segment of `path` on its own.
    ///
    /// `"a b/c"` becomes `"a%20b/c"`; the separators are kept literally.
    pub fn path_encode(path: &str) -> String {
        path.split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT_ENCODE_SET).to_string())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn build_get(&self, path: &str) -> HttpRequest {
        self.build(HttpMethod::Get, path, Body::Empty)
    }

    pub fn build_post(&self, path: &str, body: impl Into<Body>) -> HttpRequest {
        self.build(HttpMethod::Post, path, body.into())
    }

    pub fn build_post_json<T: Serialize + ?Sized>(&self, path: &str, json: &T) -> Result<HttpRequest> {
        let content = serde_json::to_vec(json)?;
        Ok(self.build_post(path, Body::raw(content, CONTENT_TYPE_JSON)))
    }

    pub fn build_delete(&self, path: &str) -> HttpRequest {
        self.build(HttpMethod::Delete, path, Body::Empty)
    }

    pub fn get(&self, path: &str, error_map: &[(u16, &str)]) -> Result<Response> {
        self.send(self.build_get(path), error_map)
    }

    pub fn post(&self, path: &str, body: impl Into<Body>, error_map: &[(u16, &str)]) -> Result<Response> {
        self.send(self.build_post(path, body), error_map)
    }

    /// POST `json` serialized, with `Content-Type: application/json`.
    pub fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        json: &T,
        error_map: &[(u16, &str)],
    ) -> Result<Response> {
        self.send(self.build_post_json(path, json)?, error_map)
    }

    pub fn delete(&self, path: &str, error_map: &[(u16, &str)]) -> Result<Response> {
        self.send(self.build_delete(path), error_map)
    }

    /// Dispatch a prepared descriptor. HTTP failure statuses still yield `Ok`.
    pub fn send(&self, request: HttpRequest, error_map: &[(u16, &str)]) -> Result<Response> {
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let raw = self.client.transport().send(&request)?;
        let response = Response::new(raw, error_map);
        debug!(status = response.status_code(), "received response");
        Ok(response)
    }

    fn build(&self, method: HttpMethod, path: &str, body: Body) -> HttpRequest {
        let (body, content_type) = body.into_parts();

        let mut headers = vec![
            ("Authorization".to_string(), self.client.authorization().to_string()),
            ("User-Agent".to_string(), self.client.user_agent().to_string()),
        ];
        if let Some(content_type) = content_type {
            headers.push(("Content-Type".to_string(), content_type));
        }

        HttpRequest {
            method,
            url: format!("{}{}", self.client.base_url(), path),
            headers,
            body,
        }
    }
}
