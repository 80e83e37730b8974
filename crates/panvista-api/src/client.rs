//! Panvista API client.

use crate::config::ApiConfig;
use crate::error::ApiError;
use auth::{build_request_url, normalize_endpoint, ClientCredentials};
use rest_client::{HttpRequest, Method, RequestBody, RestClient, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Client for the Panvista API.
///
/// Holds the target and the optional credentials. Every call draws a fresh
/// nonce and timestamp, so the client carries no state between calls and
/// can be shared across tasks. Without credentials, calls go out unsigned.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    config: ApiConfig,
    credentials: Option<ClientCredentials>,
}

impl ApiClient {
    /// Create a client using the default reqwest transport.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        config: ApiConfig,
        credentials: Option<ClientCredentials>,
    ) -> Result<Self, ApiError> {
        let transport = RestClient::with_default_timeout()?;
        Ok(Self::with_transport(config, credentials, transport))
    }

    /// Create a signed client for the production API.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the token or secret is empty. Nothing
    /// is sent over the network.
    pub fn authenticated(
        token: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let credentials = ClientCredentials::new(token, secret)?;
        Self::new(ApiConfig::default(), Some(credentials))
    }

    /// Create a client that sends unsigned requests to the production API.
    pub fn unauthenticated() -> Result<Self, ApiError> {
        Self::new(ApiConfig::default(), None)
    }

    /// Create a signed client from `PANVISTA_*` environment variables.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the token or secret variable is missing.
    pub fn from_env() -> Result<Self, ApiError> {
        let credentials = ClientCredentials::from_env()?;
        Self::new(ApiConfig::from_env(), Some(credentials))
    }

    /// Create a client over any [`Transport`].
    pub fn with_transport(
        config: ApiConfig,
        credentials: Option<ClientCredentials>,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            transport: Arc::new(transport),
            config,
            credentials,
        }
    }

    /// Get the client token, if any.
    pub fn client_token(&self) -> Option<&str> {
        self.credentials.as_ref().map(ClientCredentials::token)
    }

    /// Get the credentials used for signing, if any.
    pub fn credentials(&self) -> Option<&ClientCredentials> {
        self.credentials.as_ref()
    }

    /// Returns true if calls are signed.
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Get the API base URL.
    pub fn api_url(&self) -> &str {
        self.config.base_url()
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        self.config.version()
    }

    /// Get the full API target configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Replace (or clear) the credentials used for signing.
    pub fn set_credentials(&mut self, credentials: Option<ClientCredentials>) {
        self.credentials = credentials;
    }

    /// Point the client at another base URL.
    pub fn set_api_url(&mut self, base_url: impl Into<String>) {
        self.config = self.config.clone().with_base_url(base_url);
    }

    /// Switch to another API version.
    pub fn set_api_version(&mut self, version: impl Into<String>) {
        self.config = self.config.clone().with_version(version);
    }

    /// Build the URL a call to `endpoint` would use right now.
    ///
    /// Signed URLs carry a fresh nonce and timestamp on every invocation.
    pub fn request_url(&self, endpoint: &str, method: &Method) -> String {
        build_request_url(
            self.config.base_url(),
            self.config.version(),
            endpoint,
            method.as_str(),
            self.credentials.as_ref(),
        )
    }

    /// Call the API.
    ///
    /// # Arguments
    /// * `endpoint` - API endpoint, e.g. "/users/list/" (leading `/` optional)
    /// * `method` - HTTP method
    /// * `data` - Optional payload; empty payloads are not sent
    /// * `content_type` - Optional `Content-Type` header
    ///
    /// # Returns
    /// The decoded JSON body for 2xx responses (`Value::Null` if the body is
    /// not JSON).
    ///
    /// # Errors
    /// `ApiError::Transport` when no response arrives, otherwise the variant
    /// matching the status code.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        data: Option<RequestBody>,
        content_type: Option<&str>,
    ) -> Result<Value, ApiError> {
        let url = self.request_url(endpoint, &method);
        let endpoint = normalize_endpoint(endpoint);

        tracing::debug!(
            method = %method,
            endpoint = %endpoint,
            authenticated = self.is_authenticated(),
            "Calling Panvista API"
        );

        let request = HttpRequest::new(method.clone(), url)
            .with_body(data)
            .with_content_type(content_type.map(str::to_string));

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(method = %method, endpoint = %endpoint, error = %e, "Transport failure");
            ApiError::from(e)
        })?;

        if response.is_success() {
            return Ok(serde_json::from_str(&response.body).unwrap_or_else(|e| {
                tracing::debug!(
                    endpoint = %endpoint,
                    error = %e,
                    "Success body is not JSON"
                );
                Value::Null
            }));
        }

        let err = ApiError::from_response(response.status, &response.body);

        tracing::warn!(
            method = %method,
            endpoint = %endpoint,
            status = response.status,
            error = %err,
            "Panvista API call failed"
        );

        Err(err)
    }

    /// `GET` an endpoint without payload.
    pub async fn get(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.call(endpoint, Method::GET, None, None).await
    }

    /// Like [`call`](Self::call), deserialising the success body into `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        data: Option<RequestBody>,
        content_type: Option<&str>,
    ) -> Result<T, ApiError> {
        let value = self.call(endpoint, method, data, content_type).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url())
            .field("version", &self.config.version())
            .field("credentials", &self.credentials)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use auth::build_signature;
    use rest_client::{HttpResponse, RestError};
    use serde::Deserialize;
    use std::sync::Mutex;

    const CLIENT_TOKEN: &str = "CLIENT_TOKEN";
    const CLIENT_SECRET: &str = "CLIENT_SECRET";

    /// Transport that records requests and replays a canned outcome.
    #[derive(Clone)]
    struct FakeTransport {
        status: u16,
        body: String,
        fail: bool,
        sent: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl FakeTransport {
        fn responding(status: u16, body: impl Into<String>) -> Self {
            Self {
                status,
                body: body.into(),
                fail: false,
                sent: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::responding(0, "")
            }
        }

        fn sent(&self) -> Vec<HttpRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, RestError> {
            self.sent.lock().unwrap().push(request);

            if self.fail {
                return Err(RestError::Connection("connection reset by peer".into()));
            }

            Ok(HttpResponse::new(self.status, self.body.clone()))
        }
    }

    fn signed_client(transport: FakeTransport) -> ApiClient {
        let credentials = ClientCredentials::new(CLIENT_TOKEN, CLIENT_SECRET).unwrap();
        ApiClient::with_transport(ApiConfig::default(), Some(credentials), transport)
    }

    #[test]
    fn test_setup() {
        let client = ApiClient::authenticated(CLIENT_TOKEN, CLIENT_SECRET).unwrap();
        assert_eq!(client.client_token(), Some(CLIENT_TOKEN));
        assert_eq!(client.credentials().unwrap().expose_secret(), CLIENT_SECRET);
        assert_eq!(client.api_url(), "https://api.panvistamobile.com");
        assert_eq!(client.api_version(), "v1");
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let err = ApiClient::authenticated("", CLIENT_SECRET).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));

        let err = ApiClient::authenticated(CLIENT_TOKEN, "").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiClient>();
    }

    #[test]
    fn test_debug_redacts_secret() {
        let client = signed_client(FakeTransport::responding(200, "{}"));
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains(CLIENT_TOKEN));
        assert!(!debug_str.contains(CLIENT_SECRET));
    }

    #[test]
    fn test_request_url() {
        let mut client = signed_client(FakeTransport::responding(200, "{}"));
        client.set_api_url("http://test.com");

        assert_eq!(client.api_url(), "http://test.com");
        let url = client.request_url("/test/endpoint/", &Method::GET);
        assert_eq!(url.find("test.com"), Some(7));
        assert!(url.starts_with("http://test.com/v1/test/endpoint/?nonce="));
    }

    #[test]
    fn test_unauthenticated_request_url() {
        let client = ApiClient::with_transport(
            ApiConfig::default(),
            None,
            FakeTransport::responding(200, "{}"),
        );

        assert_eq!(
            client.request_url("/test/endpoint/", &Method::GET),
            "https://api.panvistamobile.com/v1/test/endpoint/"
        );
    }

    #[test]
    fn test_clearing_credentials_disables_signing() {
        let mut client = signed_client(FakeTransport::responding(200, "{}"));
        client.set_credentials(None);

        assert!(!client.is_authenticated());
        assert_eq!(client.client_token(), None);
        assert!(!client.request_url("items", &Method::GET).contains("signature="));
    }

    #[tokio::test]
    async fn test_valid_call() {
        let client = signed_client(FakeTransport::responding(200, r#"{"success": true}"#));

        let result = client.get("/test/endpoint/").await.unwrap();
        assert_eq!(result, serde_json::json!({ "success": true }));
    }

    #[tokio::test]
    async fn test_success_with_non_json_body() {
        let client = signed_client(FakeTransport::responding(204, ""));

        let result = client.get("/test/endpoint/").await.unwrap();
        assert_eq!(result, Value::Null);
    }

    #[tokio::test]
    async fn test_service_inactive_call() {
        let client = signed_client(FakeTransport::responding(
            503,
            r#"{"detail": "Service Inactive"}"#,
        ));

        let err = client.get("/test/endpoint/").await.unwrap_err();
        assert!(matches!(err, ApiError::ServiceUnavailable { status: 503, .. }));
        assert_eq!(err.message(), "Service Inactive");
    }

    #[tokio::test]
    async fn test_authentication_failed_call() {
        let client = signed_client(FakeTransport::responding(
            403,
            r#"{"detail": "Authentication Failed"}"#,
        ));

        let err = client.get("/test/endpoint/").await.unwrap_err();
        assert!(matches!(err, ApiError::AuthenticationFailed { status: 403, .. }));
        assert_eq!(err.message(), "Authentication Failed");
    }

    #[tokio::test]
    async fn test_bad_request_call() {
        let client = signed_client(FakeTransport::responding(
            400,
            r#"{"errors": ["Please Enter in a title"]}"#,
        ));

        let err = client
            .call("/test/endpoint/", Method::POST, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest { status: 400, .. }));
        assert_eq!(err.message(), "Please Enter in a title");
    }

    #[tokio::test]
    async fn test_not_found_call() {
        let client = signed_client(FakeTransport::responding(404, r#"{"detail": "Not Found"}"#));

        let err = client.get("/test/endpoint/").await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_invalid_call() {
        let client = signed_client(FakeTransport::responding(
            500,
            r#"{"detail": "Unknown Error"}"#,
        ));

        let err = client.get("/test/endpoint/").await.unwrap_err();
        assert!(matches!(err, ApiError::Unclassified { status: 500, .. }));
        assert_eq!(err.message(), "Unknown Error");
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = signed_client(FakeTransport::failing());

        let err = client.get("/test/endpoint/").await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(RestError::Connection(_))));
        assert_eq!(err.status_code(), None);
        assert!(err.message().contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn test_leading_slash_is_irrelevant() {
        let transport = FakeTransport::responding(200, "{}");
        let client = signed_client(transport.clone());

        client.get("/test/endpoint/").await.unwrap();
        client.get("test/endpoint/").await.unwrap();

        let sent = transport.sent();
        let prefix = "https://api.panvistamobile.com/v1/test/endpoint/?nonce=";
        assert!(sent[0].url.starts_with(prefix));
        assert!(sent[1].url.starts_with(prefix));
    }

    #[tokio::test]
    async fn test_request_is_signed() {
        let transport = FakeTransport::responding(200, "{}");
        let client = signed_client(transport.clone());

        client
            .call("users/list/?page=2", Method::PUT, None, None)
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::PUT);

        let (rest, signature) = sent[0].url.rsplit_once("&signature=").unwrap();
        let (signed_url, token) = rest.rsplit_once("&access_token=").unwrap();
        assert_eq!(token, CLIENT_TOKEN);

        let request_path = signed_url
            .strip_prefix("https://api.panvistamobile.com")
            .unwrap();
        assert!(request_path.starts_with("/v1/users/list/?page=2&nonce="));

        let (_, auth_query) = request_path.split_once("&nonce=").unwrap();
        let (nonce, timestamp) = auth_query.split_once("&timestamp=").unwrap();
        assert_eq!(nonce.len(), 12);

        let expected = build_signature(
            "PUT",
            CLIENT_TOKEN,
            nonce,
            timestamp.parse().unwrap(),
            request_path,
            CLIENT_SECRET,
        );
        assert_eq!(signature, expected);
    }

    #[tokio::test]
    async fn test_nonce_changes_between_calls() {
        let transport = FakeTransport::responding(200, "{}");
        let client = signed_client(transport.clone());

        client.get("items").await.unwrap();
        client.get("items").await.unwrap();

        let sent = transport.sent();
        assert_ne!(sent[0].url, sent[1].url);
    }

    #[tokio::test]
    async fn test_payload_and_content_type_forwarded() {
        let transport = FakeTransport::responding(201, r#"{"id": 7}"#);
        let client = signed_client(transport.clone());

        client
            .call(
                "items",
                Method::POST,
                Some(r#"{"title":"Hi"}"#.into()),
                Some("application/json"),
            )
            .await
            .unwrap();

        let sent = transport.sent();
        assert_eq!(sent[0].body, Some(RequestBody::Raw(r#"{"title":"Hi"}"#.into())));
        assert_eq!(sent[0].content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_empty_payload_not_sent() {
        let transport = FakeTransport::responding(200, "{}");
        let client = signed_client(transport.clone());

        client
            .call("items", Method::POST, Some(RequestBody::Form(Vec::new())), None)
            .await
            .unwrap();

        assert!(transport.sent()[0].body.is_none());
    }

    #[tokio::test]
    async fn test_call_json() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Created {
            id: u64,
        }

        let client = signed_client(FakeTransport::responding(201, r#"{"id": 7}"#));
        let created: Created = client
            .call_json("items", Method::POST, None, None)
            .await
            .unwrap();
        assert_eq!(created, Created { id: 7 });

        let client = signed_client(FakeTransport::responding(200, r#"{"name": "x"}"#));
        let err = client
            .call_json::<Created>("items", Method::GET, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
