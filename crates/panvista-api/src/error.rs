//! Panvista API error types.

use auth::AuthError;
use rest_client::RestError;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when calling the Panvista API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("Transport error: {0}")]
    Transport(#[from] RestError),

    /// The client was configured without usable credentials.
    #[error("Configuration error: {0}")]
    Config(#[from] AuthError),

    /// 400: the request was rejected, usually a validation failure.
    #[error("Bad request ({status}): {message}")]
    BadRequest { message: String, status: u16 },

    /// 403: token, signature, nonce or timestamp was not accepted.
    #[error("Authentication failed ({status}): {message}")]
    AuthenticationFailed { message: String, status: u16 },

    /// 404
    #[error("Not found ({status}): {message}")]
    NotFound { message: String, status: u16 },

    /// 503: the service is inactive for this client.
    #[error("Service unavailable ({status}): {message}")]
    ServiceUnavailable { message: String, status: u16 },

    /// Any other non-2xx status.
    #[error("API error {status}: {message}")]
    Unclassified { message: String, status: u16 },

    /// A success body did not match the requested type.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build the error for a non-2xx response.
    ///
    /// The message is the body's `detail` field, else its `errors` field
    /// (joined with `, ` when it is a list), else the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::classify_status(status, extract_message(body))
    }

    /// Map a status code to its error variant.
    fn classify_status(status: u16, message: String) -> Self {
        match status {
            400 => Self::BadRequest { message, status },
            403 => Self::AuthenticationFailed { message, status },
            404 => Self::NotFound { message, status },
            503 => Self::ServiceUnavailable { message, status },
            _ => Self::Unclassified { message, status },
        }
    }

    /// HTTP status code, if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::BadRequest { status, .. }
            | Self::AuthenticationFailed { status, .. }
            | Self::NotFound { status, .. }
            | Self::ServiceUnavailable { status, .. }
            | Self::Unclassified { status, .. } => Some(*status),
            Self::Transport(_) | Self::Config(_) | Self::Decode(_) => None,
        }
    }

    /// Human-readable message without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            Self::BadRequest { message, .. }
            | Self::AuthenticationFailed { message, .. }
            | Self::NotFound { message, .. }
            | Self::ServiceUnavailable { message, .. }
            | Self::Unclassified { message, .. } => message.clone(),
            Self::Transport(err) => err.to_string(),
            Self::Config(err) => err.to_string(),
            Self::Decode(msg) => msg.clone(),
        }
    }
}

fn extract_message(body: &str) -> String {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match (fields.get("detail"), fields.get("errors")) {
        (Some(detail), _) if !detail.is_null() => value_text(detail),
        (_, Some(Value::Array(errors))) => {
            errors.iter().map(value_text).collect::<Vec<_>>().join(", ")
        }
        (_, Some(errors)) if !errors.is_null() => value_text(errors),
        _ => body.to_string(),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
