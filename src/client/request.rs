use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    multipart, Method,
};
use serde::Serialize;

use crate::Error;

/// Everything needed to send, and later replay, one backend call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Relative to the `/api/v1` prefix, e.g. `/wallet/balance`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    pub headers: HeaderMap,
    pub timeout: Option<Duration>,
    /// Set once the request has been replayed after a refresh.
    pub retried: bool,
    /// Bearer to send instead of the stored one.
    pub bearer: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    Json(serde_json::Value),
    Multipart(FilePart),
}

/// A single file upload, kept as bytes so the form can be rebuilt on replay.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl FilePart {
    pub(crate) fn to_form(&self) -> Result<multipart::Form, reqwest::Error> {
        let part = multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)?;
        Ok(multipart::Form::new().part(self.field.clone(), part))
    }
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            headers: HeaderMap::new(),
            timeout: None,
            retried: false,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, Error> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, part: FilePart) -> Self {
        self.body = Body::Multipart(part);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Treat a `401` as final; used for calls that establish credentials.
    pub fn without_refresh(mut self) -> Self {
        self.retried = true;
        self
    }

    pub fn is_upload(&self) -> bool {
        matches!(self.body, Body::Multipart(_))
    }

    /// Full URL under `api_base`, query string included.
    pub fn url(&self, api_base: &str) -> String {
        let mut url = format!(
            "{}/{}",
            api_base.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        );
        if !self.query.is_empty() {
            // Encoding a list of string pairs cannot fail.
            let query = serde_urlencoded::to_string(&self.query).unwrap_or_default();
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_prefix_and_encodes_query() {
        let req = RequestDescriptor::get("game/monthly/winners").query("month", "2024-05 & 06");
        assert_eq!(
            req.url("http://localhost:5000/api/v1/"),
            "http://localhost:5000/api/v1/game/monthly/winners?month=2024-05+%26+06"
        );
    }

    #[test]
    fn new_descriptor_is_not_retried() {
        let req = RequestDescriptor::post("/wallet/redeem");
        assert!(!req.retried);
        assert!(req.bearer.is_none());
        assert!(matches!(req.body, Body::Empty));
        assert!(!req.is_upload());
    }

    #[test]
    fn json_body_is_serialized_up_front() {
        let req = RequestDescriptor::post("/game/daily/play")
            .json(&serde_json::json!({ "numbers": [1, 2, 3] }))
            .unwrap();
        match req.body {
            Body::Json(value) => assert_eq!(value["numbers"][2], 3),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn file_part_rejects_bad_mime() {
        let part = FilePart {
            field: "avatar".into(),
            file_name: "me.png".into(),
            mime: "not a mime".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(part.to_form().is_err());
    }
}
