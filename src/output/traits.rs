//! Output sink traits and types

use crate::crawler::ProductRecord;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(String),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for the records of one pipeline run
///
/// Called exactly once per run, after every extractor has finished, with
/// the records in aggregation order.
pub trait RecordSink {
    /// Persists all records
    fn write_records(&mut self, records: &[ProductRecord]) -> OutputResult<()>;

    /// Human-readable destination, used in log messages
    fn describe(&self) -> String;
}

/// Sink that keeps records in memory
impl RecordSink for Vec<ProductRecord> {
    fn write_records(&mut self, records: &[ProductRecord]) -> OutputResult<()> {
        self.extend_from_slice(records);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_records() {
        let mut sink: Vec<ProductRecord> = Vec::new();
        let record = ProductRecord::new(
            "Lamp".to_string(),
            String::new(),
            "899".to_string(),
            String::new(),
            String::new(),
        );

        sink.write_records(&[record.clone()]).unwrap();
        assert_eq!(sink, vec![record]);
        assert_eq!(sink.describe(), "memory");
    }

    #[test]
    fn test_error_display() {
        let err = OutputError::Write("disk full".to_string());
        assert_eq!(err.to_string(), "Failed to write output: disk full");
    }
}
