use crate::api::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::auth::client::validate_https_url;
use crate::auth::{ANALYTICS_READONLY_SCOPE, JwtConfig, OAuthClient, read_key_file};
use crate::config::ApiSettings;
use crate::error::GaError;
use crate::utils::{debug_log, time_track};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// API client context with optional authentication
/// NOTE: Debug intentionally redacts the bearer token
#[derive(Clone)]
pub struct ApiContext {
    /// Base URL for the API (e.g., `https://analyticsreporting.googleapis.com`)
    pub base_url: String,
    /// Optional bearer token
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let auth_token = self.auth_token.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("ApiContext")
            .field("base_url", &self.base_url)
            .field("auth_token", &auth_token)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ApiContext {
    /// Create a context explicitly without authentication
    pub fn without_auth(settings: &ApiSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            auth_token: None,
            timeout_secs: settings.timeout_secs,
        }
    }

    /// Create a context that sends `auth_token` as a bearer token
    pub fn with_auth(settings: &ApiSettings, auth_token: String) -> Self {
        Self {
            auth_token: Some(auth_token),
            ..Self::without_auth(settings)
        }
    }

    /// Check that the base URL can host API endpoints
    pub fn validate(&self) -> Result<(), GaError> {
        if let Err(e) = validate_https_url(&self.base_url) {
            return Err(GaError::ServiceInit(e));
        }
        self.build_url("/").map(|_| ())
    }

    /// Build the full URL for an endpoint. The endpoint is always resolved below the
    /// base URL's path, so `https://proxy/ga` + `/v4/x` gives `https://proxy/ga/v4/x`.
    pub(crate) fn build_url(&self, endpoint: &str) -> Result<String, GaError> {
        let mut base = Url::parse(&self.base_url)
            .map_err(|e| GaError::ServiceInit(format!("Invalid base URL: {}", e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let url = base
            .join(endpoint.trim_start_matches('/'))
            .map_err(|e| GaError::ServiceInit(format!("Invalid endpoint URL: {}", e)))?;
        Ok(url.to_string())
    }

    /// Build a POST request with JSON body and the bearer header when present
    pub fn post_json_request<T: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<HttpRequest, GaError> {
        let url = self.build_url(endpoint)?;
        let body_json = serde_json::to_string(body)?;

        let mut request = HttpRequest::post(&url)
            .with_header("Content-Type", "application/json")
            .with_body(body_json)
            .with_timeout(self.timeout_secs);

        // Add authentication header if token is present
        if let Some(token) = &self.auth_token {
            request = request.with_header("Authorization", format!("Bearer {}", token));
        }

        Ok(request)
    }
}

/// Authenticated client for the reporting API
#[derive(Clone)]
pub struct ApiClient {
    context: ApiContext,
    transport: Arc<dyn HttpTransport>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("context", &self.context)
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl ApiClient {
    /// Create a new API client with the given context
    pub fn new(context: ApiContext, transport: Arc<dyn HttpTransport>) -> Self {
        Self { context, transport }
    }

    /// Load the key file, exchange it for an access token and return a client that
    /// attaches the token to every request.
    ///
    /// Steps run in order and the first failure aborts: reading the key file
    /// (`CredentialRead`), parsing it (`CredentialParse`), checking the API base URL
    /// (`ServiceInit`), then the token exchange (`Transport`). Nothing touches the
    /// network until the first three succeed.
    pub fn bootstrap(
        key_file: &Path,
        settings: &ApiSettings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GaError> {
        time_track("Make reporting service", || -> Result<Self, GaError> {
            let data = read_key_file(key_file).inspect_err(|_| {
                debug_log("Failed to load credentials for Google Analytics");
            })?;
            debug_log(&format!("keyfile {}", key_file.display()));

            let jwt = JwtConfig::from_json(&data, &[ANALYTICS_READONLY_SCOPE])?;
            debug_log("Created jwt config");

            let unauthenticated = ApiContext::without_auth(settings);
            unauthenticated.validate()?;

            let oauth = OAuthClient::new(transport.clone(), settings.timeout_secs);
            let token = oauth.exchange(&jwt)?;
            debug_log("Created authentication capable HTTP client");

            let context = ApiContext::with_auth(settings, token.token);
            Ok(Self::new(context, transport))
        })
    }

    /// Make a POST request with JSON body
    pub fn post_json<T: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<HttpResponse, GaError> {
        let request = self.context.post_json_request(endpoint, body)?;
        self.transport.send(&request).map_err(GaError::Transport)
    }
}
