//! Authentication and signing for the Panvista API.
//!
//! This crate provides client credential management and the HMAC-SHA1
//! request-signing scheme used by every authenticated Panvista call.
//!
//! # Features
//!
//! - **Secure Credentials**: the client secret is wrapped in `SecretString` to
//!   prevent accidental logging and ensure memory is zeroed on drop.
//! - **HMAC-SHA1 Signing**: nonce, timestamp and signature embedded in the URL.
//! - **Environment Loading**: credentials can be loaded from environment
//!   variables or a `.env` file.
//!
//! # Example
//!
//! ```rust,ignore
//! use auth::{build_request_url, ClientCredentials};
//!
//! let credentials = ClientCredentials::from_env()?;
//! let url = build_request_url(
//!     "https://api.panvistamobile.com",
//!     "v1",
//!     "/users/list/",
//!     "GET",
//!     Some(&credentials),
//! );
//! ```

mod credentials;
mod error;
mod signer;

pub use credentials::{ClientCredentials, CLIENT_SECRET_VAR, CLIENT_TOKEN_VAR};
pub use error::AuthError;
pub use signer::{
    build_request_url, build_signature, generate_nonce, normalize_endpoint, unix_timestamp,
    RequestSigner,
};
