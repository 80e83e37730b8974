//! The boundary between the API client and the network.

use crate::error::RestError;
use async_trait::async_trait;
use reqwest::Method;

/// Payload of an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// Form fields, sent as `multipart/form-data`.
    Form(Vec<(String, String)>),
    /// A raw string payload, sent as-is.
    Raw(String),
}

impl RequestBody {
    /// Returns true if there is nothing to send.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Form(fields) => fields.is_empty(),
            Self::Raw(text) => text.is_empty(),
        }
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<Vec<(String, String)>> for RequestBody {
    fn from(fields: Vec<(String, String)>) -> Self {
        Self::Form(fields)
    }
}

/// A fully built request, ready to go on the wire.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Full request URL, query string included.
    pub url: String,
    /// Payload, if any.
    pub body: Option<RequestBody>,
    /// `Content-Type` header value, if any.
    pub content_type: Option<String>,
}

impl HttpRequest {
    /// Create a request without body or content type.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
            content_type: None,
        }
    }

    /// Attach a body. Empty bodies are dropped.
    pub fn with_body(mut self, body: Option<RequestBody>) -> Self {
        self.body = body.filter(|b| !b.is_empty());
        self
    }

    /// Attach a `Content-Type`.
    pub fn with_content_type(mut self, content_type: Option<String>) -> Self {
        self.content_type = content_type;
        self
    }
}

/// Status code and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and raw body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the status code and raw body.
///
/// Implementations must not retry. Timeouts are theirs to enforce.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and wait for the complete response.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError>;
}
