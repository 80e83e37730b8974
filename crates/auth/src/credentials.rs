//! Secure client credential management.
//!
//! Uses the `secrecy` crate to prevent accidental logging of the client
//! secret and ensures memory is zeroed on drop.

use crate::error::AuthError;
use secrecy::{ExposeSecret, SecretString};

/// Environment variable holding the client token.
pub const CLIENT_TOKEN_VAR: &str = "PANVISTA_CLIENT_TOKEN";

/// Environment variable holding the client secret.
pub const CLIENT_SECRET_VAR: &str = "PANVISTA_CLIENT_SECRET";

/// Client token and secret for signed Panvista requests.
///
/// The secret is wrapped in `SecretString` which:
/// - Prevents accidental Debug/Display printing
/// - Zeros memory on drop via zeroize
#[derive(Clone)]
pub struct ClientCredentials {
    token: String,
    secret: SecretString,
}

impl ClientCredentials {
    /// Create credentials from explicit values.
    ///
    /// # Errors
    /// Returns `AuthError::MissingCredentials` if either value is empty.
    pub fn new(token: impl Into<String>, secret: impl Into<String>) -> Result<Self, AuthError> {
        let token = token.into();
        let secret = secret.into();

        if token.is_empty() || secret.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        Ok(Self {
            token,
            secret: SecretString::from(secret),
        })
    }

    /// Load credentials from environment variables.
    ///
    /// Looks for:
    /// - `PANVISTA_CLIENT_TOKEN` - The client token (public)
    /// - `PANVISTA_CLIENT_SECRET` - The client secret (private)
    ///
    /// # Errors
    /// Returns `AuthError::MissingEnvVar` if either variable is not set, or
    /// `AuthError::MissingCredentials` if either is set but empty.
    pub fn from_env() -> Result<Self, AuthError> {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        let token = std::env::var(CLIENT_TOKEN_VAR)
            .map_err(|_| AuthError::MissingEnvVar(CLIENT_TOKEN_VAR.into()))?;

        let secret = std::env::var(CLIENT_SECRET_VAR)
            .map_err(|_| AuthError::MissingEnvVar(CLIENT_SECRET_VAR.into()))?;

        Self::new(token, secret)
    }

    /// Get the client token (sent as `access_token`, safe to log).
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expose the client secret for signing.
    ///
    /// **WARNING**: Only use this as the HMAC key.
    /// Never log or display the return value.
    pub fn expose_secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("token", &self.token)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
