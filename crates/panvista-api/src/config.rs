//! Panvista API target configuration.

/// Production API base URL.
pub const DEFAULT_API_URL: &str = "https://api.panvistamobile.com";

/// API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Environment variable overriding the base URL.
pub const API_URL_VAR: &str = "PANVISTA_API_URL";

/// Environment variable overriding the API version.
pub const API_VERSION_VAR: &str = "PANVISTA_API_VERSION";

/// Where requests are sent: base URL plus API version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    version: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL, DEFAULT_API_VERSION)
    }
}

impl ApiConfig {
    /// Create a configuration. A trailing `/` on the base URL is dropped.
    pub fn new(base_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            version: version.into(),
        }
    }

    /// Load configuration from `PANVISTA_API_URL` and `PANVISTA_API_VERSION`.
    ///
    /// Unset variables fall back to the production defaults.
    pub fn from_env() -> Self {
        // Load .env file if present (ignores errors if file doesn't exist)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from a variable lookup, e.g. a parsed config map.
    ///
    /// Missing variables fall back to the production defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.into());
        let version = lookup(API_VERSION_VAR).unwrap_or_else(|| DEFAULT_API_VERSION.into());

        Self::new(base_url, version)
    }

    /// Replace the base URL. A trailing `/` is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = trim_base_url(base_url.into());
        self
    }

    /// Replace the API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API version, e.g. "v1".
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn trim_base_url(mut base_url: String) -> String {
    if base_url.ends_with('/') {
        base_url.pop();
    }
    base_url
}
