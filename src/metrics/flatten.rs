//! Turn reporting API responses into flat metric records.

use super::types::{Fields, Metric, MetricKind, Tags};
use crate::api::types::{DateRangeValues, GetReportsResponse, Report};
use crate::utils::debug_log;
use chrono::{DateTime, Utc};

/// Measurement name of every emitted record
pub const MEASUREMENT: &str = "gatype";

/// Field and tag keys
pub mod keys {
    pub const NAME: &str = "name";
    pub const GATYPE: &str = "gatype";
    pub const IS_GOLDEN: &str = "is_golden";
    pub const MAX_VAL: &str = "max_val";
    pub const MIN_VAL: &str = "min_val";
    pub const ROW_COUNT: &str = "row_count";
    pub const TOTALS: &str = "totals";
    pub const ROW_METRICS: &str = "row_metrics";
}

/// First value of the first date range, or an empty string when the API left the
/// aggregate out
fn first_value(values: &[DateRangeValues]) -> String {
    values
        .first()
        .and_then(|range| range.values.first())
        .cloned()
        .unwrap_or_default()
}

/// Row values in row order. For each row and each of its date-range value lists,
/// the j-th value is kept only while j is below both the header entry count and
/// the list length.
pub fn row_metrics(report: &Report) -> Vec<String> {
    let entries = &report.column_header.metric_header.metric_header_entries;
    let header_count = entries.len();

    report
        .data
        .rows
        .iter()
        .flat_map(|row| row.metrics.iter())
        .flat_map(|metric| metric.values.iter().take(header_count))
        .cloned()
        .collect()
}

/// Flatten one report. Returns `None` for a report without any metric header
/// entry, since it has no name or type to describe it.
pub fn flatten_report(report: &Report, timestamp: DateTime<Utc>) -> Option<Metric> {
    let entries = &report.column_header.metric_header.metric_header_entries;
    let Some(entry) = entries.first() else {
        debug_log("Skipping report without metric header entries");
        return None;
    };
    let data = &report.data;

    let mut tags = Tags::new();
    tags.insert(keys::GATYPE.to_string(), entry.metric_type.clone());

    let mut fields = Fields::new();
    fields.insert(keys::NAME.to_string(), entry.name.clone().into());
    fields.insert(keys::GATYPE.to_string(), entry.metric_type.clone().into());
    fields.insert(keys::IS_GOLDEN.to_string(), data.is_data_golden.into());
    let max_val = first_value(&data.maximums);
    let min_val = first_value(&data.minimums);
    let totals = first_value(&data.totals);

    fields.insert(keys::MAX_VAL.to_string(), max_val.into());
    fields.insert(keys::MIN_VAL.to_string(), min_val.into());
    fields.insert(keys::ROW_COUNT.to_string(), data.row_count.into());
    fields.insert(keys::TOTALS.to_string(), totals.into());
    fields.insert(keys::ROW_METRICS.to_string(), row_metrics(report).into());

    Some(Metric::new(
        MEASUREMENT,
        MetricKind::Counter,
        fields,
        tags,
        timestamp,
    ))
}

/// Flatten every report of a response, all stamped with the same `timestamp`
pub fn flatten_response(response: &GetReportsResponse, timestamp: DateTime<Utc>) -> Vec<Metric> {
    response
        .reports
        .iter()
        .filter_map(|report| flatten_report(report, timestamp))
        .collect()
}
