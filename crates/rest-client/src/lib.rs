//! HTTP transport for the Panvista API client.
//!
//! This crate provides the seam between request signing and the network:
//!
//! - The [`Transport`] trait: one request in, status code and raw body out
//! - [`RestClient`], a reqwest implementation with 10s connect / 60s total timeouts
//! - Consistent error handling via `RestError`
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_client::{HttpRequest, Method, RestClient, Transport};
//!
//! let client = RestClient::with_default_timeout()?;
//! let response = client
//!     .send(HttpRequest::new(Method::GET, "https://api.panvistamobile.com/v1/status"))
//!     .await?;
//! println!("{} {}", response.status, response.body);
//! ```

mod client;
mod error;
mod transport;

pub use client::{RestClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use error::RestError;
pub use reqwest::Method;
pub use transport::{HttpRequest, HttpResponse, RequestBody, Transport};
