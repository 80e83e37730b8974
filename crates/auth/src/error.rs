use thiserror::Error;

/// Errors that can occur while setting up authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// The client token or client secret is empty.
    #[error("Please enter in a client and secret token")]
    MissingCredentials,
}
