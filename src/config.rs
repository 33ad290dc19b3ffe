use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GaError;
use crate::utils::debug_log;

/// Default reporting API base URL
pub const DEFAULT_API_BASE_URL: &str = "https://analyticsreporting.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_START_DATE: &str = "7daysAgo";
pub const DEFAULT_END_DATE: &str = "today";
pub const DEFAULT_METRIC: &str = "ga:sessions";
pub const DEFAULT_DIMENSION: &str = "ga:country";

/// Prefix for environment overrides (`GA_REPORT_KEY_FILE`, `GA_REPORT_VIEW_ID`, ...)
pub const ENV_PREFIX: &str = "GA_REPORT_";

/// The one report this collector asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub view_id: String,
    pub start_date: String,
    pub end_date: String,
    /// Metric expression, e.g. `ga:sessions`
    pub metric: String,
    /// Dimension name, e.g. `ga:country`
    pub dimension: String,
}

impl ReportQuery {
    /// Sessions by country over the trailing seven days
    pub fn new(view_id: &str) -> Self {
        Self {
            view_id: view_id.to_string(),
            start_date: DEFAULT_START_DATE.to_string(),
            end_date: DEFAULT_END_DATE.to_string(),
            metric: DEFAULT_METRIC.to_string(),
            dimension: DEFAULT_DIMENSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Resolved configuration for one collector instance. Passed by value into every
/// gather cycle; nothing here lives in process-wide state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub key_file: PathBuf,
    pub query: ReportQuery,
    pub api: ApiSettings,
}

/// On-disk / environment shape. Every field is optional so layers can be merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Overlay `other` on top of `self`; values set in `other` win.
    pub fn merge(self, other: FileConfig) -> FileConfig {
        FileConfig {
            key_file: other.key_file.or(self.key_file),
            view_id: other.view_id.or(self.view_id),
            start_date: other.start_date.or(self.start_date),
            end_date: other.end_date.or(self.end_date),
            metric: other.metric.or(self.metric),
            dimension: other.dimension.or(self.dimension),
            api_base_url: other.api_base_url.or(self.api_base_url),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
        }
    }

    pub fn from_toml(data: &str) -> Result<FileConfig, GaError> {
        toml::from_str(data)
            .map_err(|e| GaError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// Read overrides from `GA_REPORT_*` environment variables
    pub fn from_env() -> Result<FileConfig, GaError> {
        envy::prefixed(ENV_PREFIX)
            .from_env::<FileConfig>()
            .map_err(|e| GaError::ConfigError(format!("Invalid environment override: {}", e)))
    }
}

impl Config {
    /// Build a config with the default query for `view_id`
    pub fn new(key_file: impl Into<PathBuf>, view_id: &str) -> Self {
        Self {
            key_file: key_file.into(),
            query: ReportQuery::new(view_id),
            api: ApiSettings::default(),
        }
    }

    /// Resolve the layered configuration: defaults, then the config file, then the
    /// environment, then `overrides` (CLI flags).
    ///
    /// An explicit `path` must exist. Without one the default path is used when
    /// present and skipped otherwise.
    pub fn load(path: Option<&Path>, overrides: FileConfig) -> Result<Config, GaError> {
        let file_cfg = match path {
            Some(path) => load_file_config(path)?,
            None => match config_file_path() {
                Some(default_path) if default_path.exists() => load_file_config(&default_path)?,
                _ => FileConfig::default(),
            },
        };

        let merged = file_cfg.merge(FileConfig::from_env()?).merge(overrides);
        Config::from_file_config(merged)
    }

    /// Validate a merged [`FileConfig`] and fill in defaults
    pub fn from_file_config(cfg: FileConfig) -> Result<Config, GaError> {
        let key_file = cfg
            .key_file
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GaError::ConfigError("key_file must be set".to_string()))?;
        let view_id = cfg
            .view_id
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| GaError::ConfigError("view_id must be set".to_string()))?;

        let mut query = ReportQuery::new(&view_id);
        if let Some(start_date) = cfg.start_date {
            query.start_date = start_date;
        }
        if let Some(end_date) = cfg.end_date {
            query.end_date = end_date;
        }
        if let Some(metric) = cfg.metric {
            query.metric = metric;
        }
        if let Some(dimension) = cfg.dimension {
            query.dimension = dimension;
        }

        let mut api = ApiSettings::default();
        if let Some(base_url) = cfg.api_base_url {
            api.base_url = base_url;
        }
        if let Some(timeout_secs) = cfg.timeout_secs {
            api.timeout_secs = Some(timeout_secs);
        }

        Ok(Config {
            key_file: PathBuf::from(key_file),
            query,
            api,
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig, GaError> {
    debug_log(&format!("Loading config from {}", path.display()));
    let data = fs::read_to_string(path).map_err(|e| {
        GaError::ConfigError(format!(
            "Failed to read config file {}: {}",
            path.display(),
            e
        ))
    })?;
    FileConfig::from_toml(&data)
}

/// Default config location (~/.ga-report/config.toml)
pub fn config_file_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".ga-report").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: [&str; 8] = [
        "GA_REPORT_KEY_FILE",
        "GA_REPORT_VIEW_ID",
        "GA_REPORT_START_DATE",
        "GA_REPORT_END_DATE",
        "GA_REPORT_METRIC",
        "GA_REPORT_DIMENSION",
        "GA_REPORT_API_BASE_URL",
        "GA_REPORT_TIMEOUT_SECS",
    ];

    unsafe fn clear_env() {
        for var in ENV_VARS {
            unsafe { std::env::remove_var(var) };
        }
    }

    #[test]
    fn test_report_query_defaults() {
        let query = ReportQuery::new("ga:155849743");
        assert_eq!(query.view_id, "ga:155849743");
        assert_eq!(query.start_date, "7daysAgo");
        assert_eq!(query.end_date, "today");
        assert_eq!(query.metric, "ga:sessions");
        assert_eq!(query.dimension, "ga:country");
    }

    #[test]
    fn test_parse_toml() {
        let cfg = FileConfig::from_toml(
            r#"
key_file = "/etc/ga/key.json"
view_id = "ga:1"
timeout_secs = 5
"#,
        )
        .unwrap();
        assert_eq!(cfg.key_file.as_deref(), Some("/etc/ga/key.json"));
        assert_eq!(cfg.view_id.as_deref(), Some("ga:1"));
        assert_eq!(cfg.timeout_secs, Some(5));
        assert!(cfg.metric.is_none());
    }

    #[test]
    fn test_parse_toml_invalid() {
        let result = FileConfig::from_toml("key_file = [");
        assert!(matches!(result, Err(GaError::ConfigError(_))));
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let base = FileConfig {
            key_file: Some("base.json".to_string()),
            view_id: Some("ga:1".to_string()),
            metric: Some("ga:users".to_string()),
            ..Default::default()
        };
        let overlay = FileConfig {
            view_id: Some("ga:2".to_string()),
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.key_file.as_deref(), Some("base.json"));
        assert_eq!(merged.view_id.as_deref(), Some("ga:2"));
        assert_eq!(merged.metric.as_deref(), Some("ga:users"));
    }

    #[test]
    fn test_from_file_config_requires_key_file() {
        let cfg = FileConfig {
            view_id: Some("ga:1".to_string()),
            ..Default::default()
        };
        let err = Config::from_file_config(cfg).unwrap_err();
        assert!(err.to_string().contains("key_file"));
    }

    #[test]
    fn test_from_file_config_rejects_blank_view_id() {
        let cfg = FileConfig {
            key_file: Some("key.json".to_string()),
            view_id: Some("   ".to_string()),
            ..Default::default()
        };
        let err = Config::from_file_config(cfg).unwrap_err();
        assert!(err.to_string().contains("view_id"));
    }

    #[test]
    fn test_from_file_config_applies_query_overrides() {
        let cfg = FileConfig {
            key_file: Some("key.json".to_string()),
            view_id: Some("ga:1".to_string()),
            start_date: Some("30daysAgo".to_string()),
            dimension: Some("ga:city".to_string()),
            api_base_url: Some("http://localhost:8080".to_string()),
            timeout_secs: Some(3),
            ..Default::default()
        };
        let config = Config::from_file_config(cfg).unwrap();
        assert_eq!(config.key_file, PathBuf::from("key.json"));
        assert_eq!(config.query.start_date, "30daysAgo");
        assert_eq!(config.query.end_date, "today");
        assert_eq!(config.query.dimension, "ga:city");
        assert_eq!(config.query.metric, "ga:sessions");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, Some(3));
    }

    #[test]
    #[serial]
    fn test_load_layers_env_over_file_and_overrides_over_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "key_file = \"file.json\"\nview_id = \"ga:file\"\nmetric = \"ga:users\"\n",
        )
        .unwrap();

        // SAFETY: tests are serialized via #[serial], so mutating process env is safe.
        unsafe {
            std::env::set_var("GA_REPORT_START_DATE", "2020-01-01");
            std::env::set_var("GA_REPORT_API_BASE_URL", "http://stray.example.com");
            clear_env();
            std::env::set_var("GA_REPORT_VIEW_ID", "ga:env");
            std::env::set_var("GA_REPORT_KEY_FILE", "env.json");
        }

        let overrides = FileConfig {
            key_file: Some("cli.json".to_string()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), overrides);

        // SAFETY: tests are serialized via #[serial], so restoring process env is safe.
        unsafe { clear_env() };

        let config = config.unwrap();
        assert_eq!(config.key_file, PathBuf::from("cli.json"));
        assert_eq!(config.query.view_id, "ga:env");
        assert_eq!(config.query.metric, "ga:users");
        assert_eq!(config.query.start_date, DEFAULT_START_DATE);
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    #[serial]
    fn test_load_explicit_missing_file_fails() {
        // SAFETY: tests are serialized via #[serial], so mutating process env is safe.
        unsafe { clear_env() };
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")), FileConfig::default());
        assert!(matches!(result, Err(GaError::ConfigError(_))));
    }

    #[test]
    #[serial]
    fn test_invalid_env_timeout_is_config_error() {
        // SAFETY: tests are serialized via #[serial], so mutating process env is safe.
        unsafe {
            clear_env();
            std::env::set_var("GA_REPORT_TIMEOUT_SECS", "soon");
        }
        let result = FileConfig::from_env();
        // SAFETY: tests are serialized via #[serial], so restoring process env is safe.
        unsafe { clear_env() };
        assert!(matches!(result, Err(GaError::ConfigError(_))));
    }
}
