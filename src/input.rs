//! The Google Analytics input: one gather cycle is "authenticate, fetch, flatten,
//! emit", run synchronously.

use crate::api::transport::{HttpTransport, MinreqTransport};
use crate::api::{ApiClient, GetReportsRequest};
use crate::config::{ApiSettings, Config, ReportQuery};
use crate::error::GaError;
use crate::metrics::{Accumulator, Metric, flatten_response};
use crate::utils::debug_log;
use std::path::PathBuf;
use std::sync::Arc;

const DESCRIPTION: &str = "Read metrics about google analytics";

const SAMPLE_CONFIG: &str = r#"## Path to the service-account key file (JSON).
key_file = "/etc/ga-report/service-account.json"
## Reporting view to query.
view_id = "ga:155849743"

## Optional query settings; the defaults give sessions by country over the last week.
# start_date = "7daysAgo"
# end_date = "today"
# metric = "ga:sessions"
# dimension = "ga:country"

## Optional API settings.
# api_base_url = "https://analyticsreporting.googleapis.com"
# timeout_secs = 30
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleAnalyticsInput {
    pub key_file: PathBuf,
    pub query: ReportQuery,
    pub api: ApiSettings,
}

impl From<Config> for GoogleAnalyticsInput {
    fn from(config: Config) -> Self {
        Self {
            key_file: config.key_file,
            query: config.query,
            api: config.api,
        }
    }
}

impl GoogleAnalyticsInput {
    pub fn new(config: Config) -> Self {
        config.into()
    }

    pub fn description() -> &'static str {
        DESCRIPTION
    }

    pub fn sample_config() -> &'static str {
        SAMPLE_CONFIG
    }

    /// Run one collection cycle against the real API
    pub fn gather(&self, acc: &mut dyn Accumulator) -> Result<usize, GaError> {
        self.gather_with(Arc::new(MinreqTransport::new()), acc)
    }

    /// Run one collection cycle over `transport`.
    ///
    /// Returns the number of records emitted. On failure the error is reported to
    /// the accumulator as well as returned, and no record is emitted.
    pub fn gather_with(
        &self,
        transport: Arc<dyn HttpTransport>,
        acc: &mut dyn Accumulator,
    ) -> Result<usize, GaError> {
        match self.collect(transport) {
            Ok(metrics) => {
                let count = metrics.len();
                for metric in metrics {
                    acc.add_metric(metric);
                }
                debug_log(&format!("Emitted {} record(s)", count));
                Ok(count)
            }
            Err(e) => {
                acc.add_error(&e);
                Err(e)
            }
        }
    }

    fn collect(&self, transport: Arc<dyn HttpTransport>) -> Result<Vec<Metric>, GaError> {
        self.validate()?;

        let client = ApiClient::bootstrap(&self.key_file, &self.api, transport)?;
        let request = GetReportsRequest::for_query(&self.query);
        let response = client.batch_get(&request)?;

        let now = chrono::Utc::now();
        Ok(flatten_response(&response, now))
    }

    fn validate(&self) -> Result<(), GaError> {
        if self.key_file.as_os_str().is_empty() {
            return Err(GaError::ConfigError("key_file must be set".to_string()));
        }
        if self.query.view_id.trim().is_empty() {
            return Err(GaError::ConfigError("view_id must be set".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::mock::MockTransport;
    use crate::config::FileConfig;
    use crate::metrics::MemoryAccumulator;

    #[test]
    fn test_description() {
        assert_eq!(
            GoogleAnalyticsInput::description(),
            "Read metrics about google analytics"
        );
    }

    #[test]
    fn test_sample_config_parses_and_validates() {
        let sample = GoogleAnalyticsInput::sample_config();
        let cfg = FileConfig::from_toml(sample).unwrap();
        let config = Config::from_file_config(cfg).unwrap();
        assert_eq!(config.query.view_id, "ga:155849743");
        assert_eq!(config.query, ReportQuery::new("ga:155849743"));
    }

    #[test]
    fn test_empty_view_id_fails_before_any_request() {
        let mut config = Config::new("key.json", "ga:1");
        config.query.view_id = String::new();
        let input = GoogleAnalyticsInput::new(config);
        let transport = Arc::new(MockTransport::new());
        let mut acc = MemoryAccumulator::new();

        let err = input.gather_with(transport.clone(), &mut acc).unwrap_err();
        assert!(matches!(err, GaError::ConfigError(_)));
        assert_eq!(transport.request_count(), 0);
        assert_eq!(acc.errors().len(), 1);
        assert!(acc.is_empty());
    }
}
