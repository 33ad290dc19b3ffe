//! Reports API endpoint

use crate::api::client::ApiClient;
use crate::api::types::{ApiErrorResponse, GetReportsRequest, GetReportsResponse};
use crate::error::GaError;
use crate::utils::{debug_log, time_track};

pub const BATCH_GET_ENDPOINT: &str = "/v4/reports:batchGet";

/// Reports API endpoints
impl ApiClient {
    /// Fetch reports in a single batch request
    ///
    /// # Returns
    /// * `Ok(GetReportsResponse)` - 200 response with a decodable body
    /// * `Err(GaError::UnexpectedStatus)` - any other status; the body is discarded
    /// * `Err(GaError::Transport)` - network failure or undecodable body
    pub fn batch_get(&self, request: &GetReportsRequest) -> Result<GetReportsResponse, GaError> {
        debug_log("Doing batchGet request from analytics reporting");

        let response = time_track("GET Analytics Report", || {
            self.post_json(BATCH_GET_ENDPOINT, request)
        })?;

        if response.status_code != 200 {
            let detail = serde_json::from_str::<ApiErrorResponse>(&response.body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| response.body.clone());
            debug_log(&format!(
                "batchGet returned {}: {}",
                response.status_code, detail
            ));
            return Err(GaError::UnexpectedStatus {
                status_code: response.status_code,
            });
        }

        serde_json::from_str::<GetReportsResponse>(&response.body)
            .map_err(|e| GaError::Transport(format!("Failed to parse batchGet response: {}", e)))
    }
}
