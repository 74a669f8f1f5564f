//! Output module for exporting harvested products
//!
//! This module handles:
//! - The sink interface the pipeline hands its records to
//! - CSV export of product records
//! - Printing a run summary

mod csv_output;
pub mod stats;
mod traits;

pub use csv_output::{write_products, CsvSink, CSV_HEADER};
pub use stats::{format_report, print_report};
pub use traits::{OutputError, OutputResult, RecordSink};
