//! Panvista API client.
//!
//! This crate provides a signed client for the Panvista HTTP API with:
//!
//! - **Request signing**: every authenticated call carries a fresh nonce,
//!   a timestamp, the client token and an HMAC-SHA1 signature
//! - **Unsigned mode**: a client without credentials calls bare endpoints
//! - **Error handling**: status codes map to typed `ApiError` variants, with
//!   the message taken from the JSON error body
//! - **Pluggable transport**: any `rest_client::Transport` can carry the
//!   requests
//!
//! # Example
//!
//! ```rust,ignore
//! use panvista_api::{ApiClient, Method};
//!
//! let client = ApiClient::authenticated("CLIENT_TOKEN", "CLIENT_SECRET")?;
//!
//! let users = client.get("/users/list/").await?;
//!
//! let created = client
//!     .call(
//!         "/articles/",
//!         Method::POST,
//!         Some(r#"{"title":"Hello"}"#.into()),
//!         Some("application/json"),
//!     )
//!     .await?;
//! ```

mod client;
mod config;
mod error;

pub use client::ApiClient;
pub use config::{
    ApiConfig, API_URL_VAR, API_VERSION_VAR, DEFAULT_API_URL, DEFAULT_API_VERSION,
};
pub use error::ApiError;

pub use auth::{AuthError, ClientCredentials};
pub use rest_client::{Method, RequestBody, RestError, Transport};
