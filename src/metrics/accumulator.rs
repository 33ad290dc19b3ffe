use super::types::Metric;
use crate::error::GaError;
use std::io::Write;

/// Receiver for emitted records
pub trait Accumulator {
    fn add_metric(&mut self, metric: Metric);

    /// Report a failed collection cycle
    fn add_error(&mut self, err: &GaError);
}

/// Keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryAccumulator {
    metrics: Vec<Metric>,
    errors: Vec<String>,
}

impl MemoryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn into_metrics(self) -> Vec<Metric> {
        self.metrics
    }
}

impl Accumulator for MemoryAccumulator {
    fn add_metric(&mut self, metric: Metric) {
        self.metrics.push(metric);
    }

    fn add_error(&mut self, err: &GaError) {
        self.errors.push(err.to_string());
    }
}

/// Writes each record as one JSON object per line
pub struct JsonLinesAccumulator<W: Write> {
    writer: W,
    written: usize,
    errors: Vec<String>,
    write_error: Option<std::io::Error>,
}

impl<W: Write> JsonLinesAccumulator<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            errors: Vec::new(),
            write_error: None,
        }
    }

    /// Number of records written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Flush the writer and surface the first write failure, if any
    pub fn finish(mut self) -> Result<W, GaError> {
        if let Some(e) = self.write_error.take() {
            return Err(GaError::IoError(e));
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_metric(&mut self, metric: &Metric) -> Result<(), std::io::Error> {
        let line = serde_json::to_string(metric)?;
        writeln!(self.writer, "{}", line)
    }
}

impl<W: Write> Accumulator for JsonLinesAccumulator<W> {
    fn add_metric(&mut self, metric: Metric) {
        if self.write_error.is_some() {
            return;
        }
        match self.write_metric(&metric) {
            Ok(()) => self.written += 1,
            Err(e) => self.write_error = Some(e),
        }
    }

    fn add_error(&mut self, err: &GaError) {
        self.errors.push(err.to_string());
    }
}
