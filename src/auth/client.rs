use crate::api::transport::{HttpRequest, HttpTransport};
use crate::auth::credentials::JwtConfig;
use crate::auth::types::{AccessToken, OAuthError, TokenResponse};
use crate::error::GaError;
use crate::utils::{debug_log, redact};
use std::sync::Arc;

/// Grant type for the service-account JWT-bearer flow (RFC 7523)
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// OAuth client for the JWT-bearer grant
pub struct OAuthClient {
    transport: Arc<dyn HttpTransport>,
    timeout_secs: Option<u64>,
}

/// Validate that a URL uses HTTPS (security requirement for OAuth)
/// Only enforced in release builds - HTTP allowed in debug mode for local dev
pub(crate) fn validate_https_url(url: &str) -> Result<(), String> {
    #[cfg(not(debug_assertions))]
    {
        if !url.starts_with("https://") {
            return Err(format!(
                "Security error: HTTPS is required. URL '{}' is not secure.",
                url
            ));
        }
    }
    #[cfg(debug_assertions)]
    {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(format!("Invalid URL scheme: {}", url));
        }
    }
    Ok(())
}

impl OAuthClient {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout_secs: Option<u64>) -> Self {
        Self {
            transport,
            timeout_secs,
        }
    }

    /// Exchange a freshly signed assertion for an access token.
    ///
    /// Connection failures and rejected grants are reported as transport errors:
    /// they surface while talking to the network, not while reading the key.
    pub fn exchange(&self, config: &JwtConfig) -> Result<AccessToken, GaError> {
        validate_https_url(&config.token_url).map_err(GaError::ServiceInit)?;

        let now = chrono::Utc::now().timestamp();
        let assertion = config.assertion(now)?;

        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT_TYPE)
            .append_pair("assertion", &assertion)
            .finish();

        let request = HttpRequest::post(&config.token_url)
            .with_header("Content-Type", "application/x-www-form-urlencoded")
            .with_body(body)
            .with_timeout(self.timeout_secs);

        debug_log(&format!(
            "Requesting access token for {} via {} ({})",
            config.email,
            config.token_url,
            self.transport.name()
        ));

        let response = self
            .transport
            .send(&request)
            .map_err(|e| {
                GaError::Transport(format!("Failed to connect to token endpoint: {}", e))
            })?;

        if response.status_code != 200 {
            let error: OAuthError = serde_json::from_str(&response.body).unwrap_or(OAuthError {
                error: "unknown_error".to_string(),
                error_description: None,
            });

            let msg = error
                .error_description
                .unwrap_or_else(|| error.error.clone());
            return Err(GaError::Transport(format!(
                "Token exchange failed ({}): {}",
                response.status_code, msg
            )));
        }

        let token_response: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| GaError::Transport(format!("Invalid token response: {}", e)))?;

        let expires_in = token_response
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);

        debug_log(&format!(
            "Obtained access token {} (expires in {}s)",
            redact(&token_response.access_token),
            expires_in
        ));

        Ok(AccessToken {
            token: token_response.access_token,
            expires_at: now + expires_in as i64,
        })
    }
}
