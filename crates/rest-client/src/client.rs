//! Default transport built on reqwest.

use crate::error::RestError;
use crate::transport::{HttpRequest, HttpResponse, RequestBody, Transport};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::Client;
use std::time::Duration;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default total request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// reqwest-backed [`Transport`].
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
}

impl RestClient {
    /// Create a new REST client with explicit timeouts.
    ///
    /// # Arguments
    /// * `connect_timeout` - Time allowed to establish the connection
    /// * `timeout` - Time allowed for the whole exchange
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(connect_timeout: Duration, timeout: Duration) -> Result<Self, RestError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| RestError::RequestBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Create a new REST client with the default 10s connect / 60s total timeouts.
    pub fn with_default_timeout() -> Result<Self, RestError> {
        Self::new(DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT)
    }
}

/// Encode form fields as `multipart/form-data`.
fn multipart_form(fields: Vec<(String, String)>) -> Form {
    fields
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

#[async_trait]
impl Transport for RestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
        let HttpRequest {
            method,
            url,
            body,
            content_type,
        } = request;

        let raw_len = match &body {
            Some(RequestBody::Raw(text)) => Some(text.len()),
            _ => None,
        };

        let builder = self.client.request(method, &url);
        let builder = match body {
            Some(RequestBody::Form(fields)) => builder.multipart(multipart_form(fields)),
            Some(RequestBody::Raw(text)) => builder.body(text),
            None => builder,
        };

        let mut http_request = builder.build()?;

        // The caller's Content-Type wins, including over the multipart boundary header.
        if let Some(content_type) = content_type {
            let value = HeaderValue::from_str(&content_type)
                .map_err(|e| RestError::RequestBuild(e.to_string()))?;
            let headers = http_request.headers_mut();
            headers.insert(CONTENT_TYPE, value);

            if let Some(len) = raw_len {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
            }
        }

        let response = self.client.execute(http_request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(status = status, bytes = body.len(), "Response received");

        Ok(HttpResponse { status, body })
    }
}
