//! Shared collection of extracted records
//!
//! Extractor tasks append concurrently; the pipeline reads the result once,
//! after every task has been joined.
//!
//! Snapshot order is completion order, which is not discovery order. Callers
//! must not assume row N of the output came from link N.

use crate::crawler::record::ProductRecord;
use std::sync::{Mutex, PoisonError};

/// Thread-safe, append-only result set
#[derive(Debug, Default)]
pub struct Aggregator {
    records: Mutex<Vec<ProductRecord>>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record if it is present
    ///
    /// Returns `false` (and stores nothing) for records with empty name,
    /// price and rating.
    pub fn append(&self, record: ProductRecord) -> bool {
        if !record.is_present() {
            return false;
        }

        // Appends never leave the vector half-written, so a poisoned lock is still usable.
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
        true
    }

    /// Copies the current records
    ///
    /// Only complete once every extractor has finished.
    pub fn snapshot(&self) -> Vec<ProductRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
