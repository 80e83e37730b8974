//! HMAC-SHA1 request signing for the Panvista API.
//!
//! A signed request carries four extra query parameters, always in this
//! order: `nonce`, `timestamp`, `access_token`, `signature`. The signature
//! covers the method, the token, the nonce, the timestamp and the request
//! path (version, endpoint and the nonce/timestamp query), joined with `&`.

use crate::credentials::ClientCredentials;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Digest, Sha512};

type HmacSha1 = Hmac<Sha1>;

/// Number of random bytes hashed into a nonce (256 bits).
const NONCE_ENTROPY_BYTES: usize = 32;

/// Number of hex characters kept from the nonce digest.
const NONCE_LEN: usize = 12;

/// Generate a one-time nonce.
///
/// Hashes 256 random bits with SHA-512 and keeps the first 12 hex
/// characters. Uniqueness is statistical only.
pub fn generate_nonce() -> String {
    let bytes: [u8; NONCE_ENTROPY_BYTES] = rand::random();
    let digest = hex::encode(Sha512::digest(bytes));
    digest[..NONCE_LEN].to_string()
}

/// Current Unix timestamp in seconds.
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Strip a single leading `/` from an endpoint.
pub fn normalize_endpoint(endpoint: &str) -> &str {
    endpoint.strip_prefix('/').unwrap_or(endpoint)
}

/// Compute the hex-encoded HMAC-SHA1 signature of a request.
///
/// The canonical string is `method&token&nonce&timestamp&request_path`.
pub fn build_signature(
    method: &str,
    token: &str,
    nonce: &str,
    timestamp: i64,
    request_path: &str,
    secret: &str,
) -> String {
    hmac_sha1_hex(
        secret,
        &canonical_string(method, token, nonce, timestamp, request_path),
    )
}

/// `method&token&nonce&timestamp&request_path`, the string that gets signed.
fn canonical_string(
    method: &str,
    token: &str,
    nonce: &str,
    timestamp: i64,
    request_path: &str,
) -> String {
    format!("{}&{}&{}&{}&{}", method, token, nonce, timestamp, request_path)
}

/// Build the URL for a call, signing it when credentials are present.
///
/// Without credentials this is just `base_url/version/endpoint`. With
/// credentials a fresh nonce and the current timestamp are drawn and the
/// auth parameters are appended.
pub fn build_request_url(
    base_url: &str,
    version: &str,
    endpoint: &str,
    method: &str,
    credentials: Option<&ClientCredentials>,
) -> String {
    match credentials {
        None => format!("{}/{}/{}", base_url, version, normalize_endpoint(endpoint)),
        Some(creds) => RequestSigner::new(creds).signed_url_at(
            base_url,
            version,
            endpoint,
            method,
            &generate_nonce(),
            unix_timestamp(),
        ),
    }
}

fn hmac_sha1_hex(key: &str, message: &str) -> String {
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");

    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Request signer for authenticated Panvista API calls.
pub struct RequestSigner<'a> {
    credentials: &'a ClientCredentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer with the given credentials.
    pub fn new(credentials: &'a ClientCredentials) -> Self {
        Self { credentials }
    }

    /// Sign a canonical string with the client secret and return the hex digest.
    pub fn sign(&self, message: &str) -> String {
        hmac_sha1_hex(self.credentials.expose_secret(), message)
    }

    /// Build the signed URL with a caller-supplied nonce and timestamp.
    ///
    /// The separator before `nonce` is `&` when the endpoint already carries
    /// a query string, `?` otherwise.
    pub fn signed_url_at(
        &self,
        base_url: &str,
        version: &str,
        endpoint: &str,
        method: &str,
        nonce: &str,
        timestamp: i64,
    ) -> String {
        let endpoint = normalize_endpoint(endpoint);
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        let request_path = format!(
            "/{}/{}{}nonce={}&timestamp={}",
            version, endpoint, separator, nonce, timestamp
        );

        let token = self.credentials.token();
        let signature = self.sign(&canonical_string(
            method,
            token,
            nonce,
            timestamp,
            &request_path,
        ));

        tracing::trace!(method = %method, request_path = %request_path, "Signed request path");

        format!(
            "{}{}&access_token={}&signature={}",
            base_url, request_path, token, signature
        )
    }
}
