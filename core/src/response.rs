//! Normalized API response.
//!
//! # Design
//! Every call returns exactly one `Response`, whatever the status. Callers
//! either inspect it (`is_error`, `error_details`) or convert it with
//! `into_result`, which turns a failure status into `Error::Api`.

use std::borrow::Cow;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::error_map::ErrorMap;
use crate::http::{find_header, HttpResponse};

/// Gateway header carrying the provider's own error code.
pub const API_EXCEPTION_HEADER: &str = "X-Mashery-Error-Code";

/// Status code and reason text of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    pub code: u16,
    pub text: String,
}

/// Structured description of a failed call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Body as received, decoded lossily as UTF-8
    pub raw_body: String,
    /// Body parsed as JSON, when it is JSON
    pub json_body: Option<serde_json::Value>,
    pub status: StatusInfo,
    /// Value of the `X-Mashery-Error-Code` header, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_exception: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Response {
    headers: Vec<(String, String)>,
    status_code: u16,
    body: Vec<u8>,
    error_map: ErrorMap,
}

impl Response {
    /// Wrap a transport response, applying per-call reason overrides.
    pub fn new(raw: HttpResponse, overrides: &[(u16, &str)]) -> Self {
        Self {
            headers: raw.headers,
            status_code: raw.status,
            body: raw.body,
            error_map: ErrorMap::with_overrides(overrides),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// True for any status >= 400.
    pub fn is_error(&self) -> bool {
        self.status_code >= 400
    }

    /// Body bytes verbatim. No decoding is applied.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Reason text for this response's status from its error map.
    pub fn reason(&self) -> &str {
        self.error_map.reason(self.status_code)
    }

    pub fn error_map(&self) -> &ErrorMap {
        &self.error_map
    }

    /// Details of a failed call.
    ///
    /// Returns `Error::NoErrorDetails` when the call succeeded.
    pub fn error_details(&self) -> Result<ErrorDetails> {
        if !self.is_error() {
            return Err(Error::NoErrorDetails(self.status_code));
        }

        Ok(ErrorDetails {
            raw_body: self.text().into_owned(),
            json_body: serde_json::from_slice(&self.body).ok(),
            status: StatusInfo {
                code: self.status_code,
                text: self.reason().to_string(),
            },
            api_exception: self.header(API_EXCEPTION_HEADER).map(str::to_string),
        })
    }

    /// Pass a successful response through, or turn a failed one into
    /// `Error::Api`.
    pub fn into_result(self) -> Result<Response> {
        if self.is_error() {
            let details = self.error_details()?;
            return Err(Error::Api(Box::new(details)));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn error_boundary_is_400() {
        assert!(!Response::new(raw(399, ""), &[]).is_error());
        assert!(Response::new(raw(400, ""), &[]).is_error());
        assert!(!Response::new(raw(200, ""), &[]).is_error());
        assert!(Response::new(raw(599, ""), &[]).is_error());
    }

    #[test]
    fn body_is_returned_verbatim() {
        let response = Response::new(raw(200, r#"{"is_folder":true}"#), &[]);
        assert_eq!(response.body(), br#"{"is_folder":true}"#);
        assert_eq!(response.text(), r#"{"is_folder":true}"#);
    }

    #[test]
    fn json_decodes_on_request() {
        let response = Response::new(raw(200, r#"{"name":"a.txt","size":3}"#), &[]);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "a.txt");
        assert_eq!(value["size"], 3);
    }

    #[test]
    fn json_decode_failure_is_an_error() {
        let response = Response::new(raw(200, "not json"), &[]);
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn caller_override_wins() {
        let response = Response::new(raw(403, ""), &[(403, "custom")]);
        let details = response.error_details().unwrap();
        assert_eq!(details.status.code, 403);
        assert_eq!(details.status.text, "custom");
    }

    #[test]
    fn default_reason_without_override() {
        let response = Response::new(raw(403, ""), &[]);
        assert_eq!(response.error_details().unwrap().status.text, "Forbidden");
    }

    #[test]
    fn unmapped_status_is_unknown_error() {
        let response = Response::new(raw(599, ""), &[]);
        assert_eq!(response.error_details().unwrap().status.text, "Unknown Error");
    }

    #[test]
    fn error_details_on_success_is_a_failure() {
        let response = Response::new(raw(201, ""), &[]);
        let err = response.error_details().unwrap_err();
        assert!(matches!(err, Error::NoErrorDetails(201)));
    }

    #[test]
    fn error_details_carry_raw_and_json_body() {
        let response = Response::new(raw(400, r#"{"errorMessage":"Invalid path"}"#), &[]);
        let details = response.error_details().unwrap();
        assert_eq!(details.raw_body, r#"{"errorMessage":"Invalid path"}"#);
        assert_eq!(details.json_body.unwrap()["errorMessage"], "Invalid path");
        assert!(details.api_exception.is_none());
    }

    #[test]
    fn non_json_error_body_has_no_json_body() {
        let response = Response::new(raw(502, "<html>bad gateway</html>"), &[]);
        let details = response.error_details().unwrap();
        assert_eq!(details.raw_body, "<html>bad gateway</html>");
        assert!(details.json_body.is_none());
        assert_eq!(details.status.text, "Bad Gateway");
    }

    #[test]
    fn gateway_error_code_is_surfaced() {
        let response = Response::new(
            HttpResponse {
                status: 403,
                headers: vec![("x-mashery-error-code".to_string(), "ERR_403_DEVELOPER_OVER_QPS".to_string())],
                body: Vec::new(),
            },
            &[],
        );
        let details = response.error_details().unwrap();
        assert_eq!(details.api_exception.as_deref(), Some("ERR_403_DEVELOPER_OVER_QPS"));
    }

    #[test]
    fn into_result_passes_success_through() {
        let response = Response::new(raw(200, "ok"), &[]).into_result().unwrap();
        assert_eq!(response.body(), b"ok");
    }

    #[test]
    fn into_result_converts_failure() {
        let err = Response::new(raw(405, ""), &[(405, "A directory with the same name already exists")])
            .into_result()
            .unwrap_err();
        match err {
            Error::Api(details) => {
                assert_eq!(details.status.code, 405);
                assert_eq!(details.status.text, "A directory with the same name already exists");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn error_details_serialize_without_empty_exception() {
        let details = Response::new(raw(404, ""), &[]).error_details().unwrap();
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["status"]["code"], 404);
        assert_eq!(json["status"]["text"], "Not Found");
        assert!(json.get("api_exception").is_none());
    }
}
