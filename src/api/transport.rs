/// A fully-built outgoing POST request. Both the token and the reporting endpoint
/// take POST only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl HttpRequest {
    pub fn post(url: &str) -> Self {
        Self {
            url: url.to_string(),
            headers: vec![(
                "User-Agent".to_string(),
                format!("ga-report/{}", env!("CARGO_PKG_VERSION")),
            )],
            body: None,
            timeout_secs: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: impl Into<String>) -> Self {
        self.headers.push((key.to_string(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status_code: i32,
    pub body: String,
}

/// Trait for the HTTP layer. Errors are plain strings describing the transport
/// failure; callers wrap them in the error variant that fits their step.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String>;

    /// Transport name for logging/debugging
    fn name(&self) -> &'static str;
}

/// Default transport backed by `minreq`
#[derive(Debug, Default, Clone, Copy)]
pub struct MinreqTransport;

impl MinreqTransport {
    pub fn new() -> Self {
        Self
    }
}

impl HttpTransport for MinreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
        let mut req = minreq::post(&request.url);

        for (key, value) in &request.headers {
            req = req.with_header(key.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            req = req.with_body(body.as_str());
        }

        if let Some(timeout) = request.timeout_secs {
            req = req.with_timeout(timeout);
        }

        let response = req
            .send()
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        let body = response
            .as_str()
            .map_err(|e| format!("Invalid response encoding: {}", e))?
            .to_string();

        Ok(HttpResponse {
            status_code: response.status_code,
            body,
        })
    }

    fn name(&self) -> &'static str {
        "minreq"
    }
}

#[cfg(any(test, feature = "test-support"))]
pub mod mock {
    use super::{HttpRequest, HttpResponse, HttpTransport};
    use std::sync::Mutex;

    /// Canned answer for requests whose URL contains `url_fragment`
    #[derive(Debug, Clone)]
    struct Route {
        url_fragment: String,
        outcome: Result<HttpResponse, String>,
    }

    /// Mock transport for testing - answers from canned routes and records every
    /// request it sees
    #[derive(Debug, Default)]
    pub struct MockTransport {
        routes: Mutex<Vec<Route>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer requests to URLs containing `url_fragment` with `status_code` and `body`
        pub fn respond(self, url_fragment: &str, status_code: i32, body: &str) -> Self {
            self.push_route(
                url_fragment,
                Ok(HttpResponse {
                    status_code,
                    body: body.to_string(),
                }),
            );
            self
        }

        /// Fail requests to URLs containing `url_fragment` with a transport error
        pub fn fail(self, url_fragment: &str, msg: &str) -> Self {
            self.push_route(url_fragment, Err(msg.to_string()));
            self
        }

        fn push_route(&self, url_fragment: &str, outcome: Result<HttpResponse, String>) {
            if let Ok(mut routes) = self.routes.lock() {
                routes.push(Route {
                    url_fragment: url_fragment.to_string(),
                    outcome,
                });
            }
        }

        /// All requests sent so far, in order
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        pub fn request_count(&self) -> usize {
            self.requests().len()
        }
    }

    impl HttpTransport for MockTransport {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, String> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }

            let routes = self
                .routes
                .lock()
                .map_err(|_| "mock transport poisoned".to_string())?;

            routes
                .iter()
                .find(|route| request.url.contains(&route.url_fragment))
                .map(|route| route.outcome.clone())
                .unwrap_or_else(|| Err(format!("no mock route for {}", request.url)))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTransport;
    use super::*;

    #[test]
    fn test_post_request_has_user_agent() {
        let req = HttpRequest::post("https://example.com");
        let ua = req.header("user-agent").unwrap();
        assert!(ua.starts_with("ga-report/"));
    }

    #[test]
    fn test_request_builder() {
        let req = HttpRequest::post("https://example.com/token")
            .with_header("Content-Type", "application/json")
            .with_body("{}")
            .with_timeout(Some(10));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("{}"));
        assert_eq!(req.timeout_secs, Some(10));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn test_mock_routes_by_url_fragment() {
        let transport = MockTransport::new()
            .respond("/token", 200, "token-body")
            .respond("reports:batchGet", 500, "oops");

        let token = transport
            .send(&HttpRequest::post("https://oauth2.example.com/token"))
            .unwrap();
        assert_eq!(token.status_code, 200);
        assert_eq!(token.body, "token-body");

        let report = transport
            .send(&HttpRequest::post("https://api.example.com/v4/reports:batchGet"))
            .unwrap();
        assert_eq!(report.status_code, 500);

        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_mock_failure_and_unrouted() {
        let transport = MockTransport::new().fail("/token", "connection refused");

        let err = transport
            .send(&HttpRequest::post("https://oauth2.example.com/token"))
            .unwrap_err();
        assert_eq!(err, "connection refused");

        let err = transport
            .send(&HttpRequest::post("https://elsewhere.example.com"))
            .unwrap_err();
        assert!(err.contains("no mock route"));
        assert_eq!(transport.request_count(), 2);
    }
}
