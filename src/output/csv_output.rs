//! CSV export of product records

use crate::crawler::ProductRecord;
use crate::output::traits::{OutputError, OutputResult, RecordSink};
use std::io;
use std::path::{Path, PathBuf};

/// Header row, in column order
pub const CSV_HEADER: [&str; 5] = [
    "Product Name",
    "Product Price",
    "Product Rating",
    "Product Total Ratings",
    "Product Image",
];

/// Writes the header and one row per record to `writer`
///
/// Columns follow [`CSV_HEADER`]. Fields are quoted only where CSV requires it.
pub fn write_products<W: io::Write>(writer: W, records: &[ProductRecord]) -> OutputResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(CSV_HEADER)?;
    for record in records {
        csv_writer.write_record([
            record.name(),
            record.price(),
            record.rating(),
            record.total_ratings(),
            record.image_url(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Sink that writes records to a CSV file
///
/// The parent directory is created if missing; an existing file is replaced.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn write_records(&mut self, records: &[ProductRecord]) -> OutputResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(OutputError::Write("empty output path".to_string()));
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::File::create(&self.path)?;
        write_products(io::BufWriter::new(file), records)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
