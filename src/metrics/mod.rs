//! Metric records and the accumulators that receive them.
//!
//! A gather cycle flattens each report into one [`Metric`] and hands it to an
//! [`Accumulator`]. What happens next (printing, forwarding, storing) is up to the
//! accumulator.

pub mod accumulator;
pub mod flatten;
pub mod types;

pub use accumulator::{Accumulator, JsonLinesAccumulator, MemoryAccumulator};
pub use flatten::{MEASUREMENT, flatten_report, flatten_response};
pub use types::{FieldValue, Fields, Metric, MetricKind, Tags};
