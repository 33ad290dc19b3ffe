//! Wire types for the Analytics Reporting API v4 `reports:batchGet` endpoint.
//!
//! Only the parts of the schema the collector reads or writes are modeled. Every
//! response field defaults when absent so a sparse report still decodes.

use crate::config::ReportQuery;
use serde::{Deserialize, Serialize};

/// Request body for `reports:batchGet`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GetReportsRequest {
    pub report_requests: Vec<ReportRequest>,
}

impl GetReportsRequest {
    /// The single-report request issued every gather cycle
    pub fn for_query(query: &ReportQuery) -> Self {
        Self {
            report_requests: vec![ReportRequest {
                view_id: query.view_id.clone(),
                date_ranges: vec![DateRange {
                    start_date: query.start_date.clone(),
                    end_date: query.end_date.clone(),
                }],
                metrics: vec![ReportMetric {
                    expression: query.metric.clone(),
                }],
                dimensions: vec![ReportDimension {
                    name: query.dimension.clone(),
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub view_id: String,
    pub date_ranges: Vec<DateRange>,
    pub metrics: Vec<ReportMetric>,
    pub dimensions: Vec<ReportDimension>,
}

/// Inclusive date range; accepts `YYYY-MM-DD` or relative forms like `7daysAgo`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetric {
    pub expression: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportDimension {
    pub name: String,
}

/// Response body from `reports:batchGet`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct GetReportsResponse {
    pub reports: Vec<Report>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Report {
    pub column_header: ColumnHeader,
    pub data: ReportData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnHeader {
    pub dimensions: Vec<String>,
    pub metric_header: MetricHeader,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricHeader {
    pub metric_header_entries: Vec<MetricHeaderEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MetricHeaderEntry {
    pub name: String,
    /// Value type reported by the API, e.g. `INTEGER`, `PERCENT`, `TIME`
    #[serde(rename = "type")]
    pub metric_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportData {
    pub rows: Vec<ReportRow>,
    pub totals: Vec<DateRangeValues>,
    pub minimums: Vec<DateRangeValues>,
    pub maximums: Vec<DateRangeValues>,
    pub row_count: i64,
    /// True once the API considers the figures final
    pub is_data_golden: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportRow {
    pub dimensions: Vec<String>,
    pub metrics: Vec<DateRangeValues>,
}

/// Metric values for one date range, one value per requested metric
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DateRangeValues {
    pub values: Vec<String>,
}

impl DateRangeValues {
    pub fn new(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

/// Error body returned by Google APIs on failure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiErrorDetail {
    pub code: i32,
    pub message: String,
    pub status: String,
}
