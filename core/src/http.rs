//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. The core builds `HttpRequest`
//! values and classifies `HttpResponse` values; the host application owns the
//! `Transport` that signs and sends them. Pooling, timeouts and credentials
//! all live on the host side.

use url::form_urlencoded;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built once per operation and never mutated afterwards. `url` holds the
/// resolved endpoint without a query string; `query` keeps parameter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn get(url: String, query: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            query,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(url: String, query: Vec<(String, String)>) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(url, query)
        }
    }

    /// A POST whose parameters travel as a form-encoded body.
    pub fn post_form(url: String, form: &[(String, String)]) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            query: Vec::new(),
            headers: vec![(
                "content-type".to_string(),
                "application/x-www-form-urlencoded".to_string(),
            )],
            body: Some(encode_pairs(form)),
        }
    }

    /// Look up a query parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The endpoint URL with the encoded query string appended.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        format!("{}?{}", self.url, encode_pairs(&self.query))
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes requests on behalf of the core.
///
/// Implementations sign the request, send it, and hand back the raw status
/// and body. A non-2xx status is a successful transport round-trip; only
/// failures to obtain a response at all belong in `TransportError`.
pub trait Transport {
    fn issue(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn issue(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).issue(request)
    }
}

fn encode_pairs(pairs: &[(String, String)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
