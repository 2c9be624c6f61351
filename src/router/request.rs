//! Transport-neutral request and response types

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::FixtureError;
use crate::multipart::FormField;

/// HTTP method
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// Anything the fixture API does not serve
    Other(String),
}

impl Method {
    /// Parse a method name (case-insensitive)
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            other => Self::Other(other.to_string()),
        }
    }

    /// Method name
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body
    Empty,
    /// Parsed JSON
    Json(Value),
    /// Multipart form parts, in order
    Form(Vec<FormField>),
    /// Body that was neither JSON nor a form
    Text(String),
}

/// A request to the fixture API
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Method
    pub method: Method,
    /// Path without query string
    pub path: String,
    /// Decoded query parameters
    pub query: HashMap<String, String>,
    /// Payload
    pub body: Body,
}

impl Request {
    /// Build a request from a method and `path?query` target
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self {
            method,
            path: path.to_string(),
            query: parse_query(query),
            body: Body::Empty,
        }
    }

    /// GET request
    pub fn get(target: &str) -> Self {
        Self::new(Method::Get, target)
    }

    /// POST request with a JSON body
    pub fn post_json(target: &str, body: Value) -> Self {
        Self::new(Method::Post, target).with_body(Body::Json(body))
    }

    /// POST request with a multipart body
    pub fn post_form(target: &str, fields: Vec<FormField>) -> Self {
        Self::new(Method::Post, target).with_body(Body::Form(fields))
    }

    /// Replace the body
    pub fn with_body(mut self, body: Body) -> Self {
        self.body = body;
        self
    }

    /// Query parameter
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Non-empty `cursor` parameter
    pub fn cursor(&self) -> Option<&str> {
        self.param("cursor").filter(|c| !c.is_empty())
    }

    /// Percent-decoded, non-empty path segments
    pub fn segments(&self) -> Vec<String> {
        self.path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(percent_decode)
            .collect()
    }
}

fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}

/// Query components also encode spaces as `+`
fn decode_component(raw: &str) -> String {
    percent_decode(&raw.replace('+', " "))
}

/// Parse `a=1&b=two` into a map; later keys win
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// A response from the fixture API
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status
    pub status: u16,
    /// JSON body
    pub body: Value,
}

impl Response {
    /// 200 with a serialized body
    pub fn ok<T: Serialize>(body: &T) -> Result<Self, FixtureError> {
        Ok(Self {
            status: 200,
            body: serde_json::to_value(body)?,
        })
    }

    /// Error status with a `{message}` body
    pub fn error(err: &FixtureError) -> Self {
        Self {
            status: err.status(),
            body: json!({ "message": err.to_string() }),
        }
    }

    /// 2xx
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// `message` field of an error body
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parsing() {
        let req = Request::get("/posts?type=following&cursor=123");
        assert_eq!(req.path, "/posts");
        assert_eq!(req.param("type"), Some("following"));
        assert_eq!(req.cursor(), Some("123"));
        assert_eq!(req.segments(), ["posts"]);
    }

    #[test]
    fn test_query_decoding() {
        let query = parse_query("q=John%20Doe&x=a+b&flag&cursor=");
        assert_eq!(query["q"], "John Doe");
        assert_eq!(query["x"], "a b");
        assert_eq!(query["flag"], "");
        assert!(Request::get("/search?cursor=").cursor().is_none());
    }

    #[test]
    fn test_segment_decoding() {
        let req = Request::get("/users/%40user0/threads");
        assert_eq!(req.segments(), ["users", "@user0", "threads"]);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("get"), Method::Get);
        assert_eq!(Method::parse("DELETE"), Method::Other("DELETE".to_string()));
    }
}
