use std::borrow::Cow;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, SET_COOKIE};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Normalized result of one HTTP exchange.
///
/// Status and body are always populated (the body may be empty). Nothing here
/// judges success: a 500 is as valid a `Response` as a 200. Structured-body
/// access is on demand and failure-tolerant — [`Response::json`] returns
/// `None` for anything that does not parse, since plenty of exchanges
/// legitimately return HTML fragments or raw file bytes.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Drain a transport-level response into an owned `Response`. Body read
    /// failures are transport failures, not HTTP outcomes.
    pub(crate) async fn read(
        method: &'static str,
        url: &str,
        resp: reqwest::Response,
    ) -> Result<Self, ClientError> {
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| ClientError::transport(method, url, e))?
            .to_vec();
        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Assemble a `Response` directly. Meant for fakes in consumer tests.
    pub fn from_parts(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Raw body bytes, exactly as received.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text. Non-UTF-8 content is replaced rather than refused, so
    /// this never fails even on binary payloads.
    pub fn body(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Best-effort parsed JSON body; `None` when the body is not JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// Best-effort typed JSON body; `None` when parsing or shape fails.
    pub fn json_as<T: DeserializeOwned>(&self) -> Option<T> {
        serde_json::from_slice(&self.body).ok()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Declared content type, including any charset suffix.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// All `Set-Cookie` values on this exchange.
    pub fn set_cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn response_with(body: &[u8], content_type: Option<&str>) -> Response {
        let mut headers = HeaderMap::new();
        if let Some(ct) = content_type {
            headers.insert(CONTENT_TYPE, HeaderValue::from_str(ct).unwrap());
        }
        Response::from_parts(StatusCode::OK, headers, body.to_vec())
    }

    #[test]
    fn test_json_parses_structured_body() {
        let resp = response_with(br#"{"foo": "bar", "n": 3}"#, Some("application/json"));
        let body = resp.json().expect("body should parse");
        assert_eq!(body["foo"], "bar");
        assert_eq!(body["n"], 3);
    }

    #[test]
    fn test_json_returns_none_for_html() {
        let resp = response_with(b"<html><body>created</body></html>", Some("text/html"));
        assert!(resp.json().is_none());
        assert_eq!(resp.body(), "<html><body>created</body></html>");
    }

    #[test]
    fn test_body_tolerates_binary() {
        let resp = response_with(&[0xff, 0xfe, 0x00, 0x41], Some("application/octet-stream"));
        assert_eq!(resp.bytes(), &[0xff, 0xfe, 0x00, 0x41]);
        // Lossy text view still renders without failure.
        assert!(resp.body().contains('A'));
        assert!(resp.json().is_none());
    }

    #[test]
    fn test_empty_body_is_valid() {
        let resp = response_with(b"", None);
        assert_eq!(resp.bytes().len(), 0);
        assert_eq!(resp.body(), "");
        assert!(resp.json().is_none());
    }

    #[test]
    fn test_set_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2; HttpOnly"));
        let resp = Response::from_parts(StatusCode::OK, headers, Vec::new());
        assert_eq!(resp.set_cookies(), vec!["a=1; Path=/", "b=2; HttpOnly"]);
    }
}
