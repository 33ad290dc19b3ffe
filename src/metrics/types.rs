//! Core types for emitted metric records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag set of a record, ordered by key
pub type Tags = BTreeMap<String, String>;

/// Field set of a record, ordered by key
pub type Fields = BTreeMap<String, FieldValue>;

/// A single field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Integer(i64),
    String(String),
    StringList(Vec<String>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::StringList(list) => Some(list),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::StringList(value)
    }
}

/// How a downstream sink should interpret the record's values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
}

/// One emitted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub measurement: String,
    pub kind: MetricKind,
    pub tags: Tags,
    pub fields: Fields,
    pub timestamp: DateTime<Utc>,
}

impl Metric {
    pub fn new(
        measurement: &str,
        kind: MetricKind,
        fields: Fields,
        tags: Tags,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            measurement: measurement.to_string(),
            kind,
            tags,
            fields,
            timestamp,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(|s| s.as_str())
    }

    /// Equal in everything but the timestamp
    pub fn same_values(&self, other: &Metric) -> bool {
        self.measurement == other.measurement
            && self.kind == other.kind
            && self.tags == other.tags
            && self.fields == other.fields
    }
}
