//! Query log export
//!
//! Appends one record per completed query to a CSV file: serial number,
//! query text, winning method, its score, and the final generated answer.
//! The header is written only when the file is created; serial numbers
//! continue from the existing row count.

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::Result;

/// One completed-query record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    pub sl: usize,
    pub query: String,
    pub top_method: String,
    pub top_score: f64,
    pub final_answer: String,
}

/// Append-only CSV log of completed queries
#[derive(Debug, Clone)]
pub struct QueryLog {
    path: PathBuf,
}

impl QueryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, assigning the next serial number
    pub fn append(
        &self,
        query: &str,
        top_method: &str,
        top_score: f64,
        final_answer: &str,
    ) -> Result<QueryRecord> {
        let existing = self.count_records()?;
        let record = QueryRecord {
            sl: existing + 1,
            query: query.to_string(),
            top_method: top_method.to_string(),
            top_score,
            final_answer: final_answer.to_string(),
        };

        let file_exists = self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(!file_exists)
            .from_writer(file);
        writer.serialize(&record)?;
        writer.flush()?;

        info!(sl = record.sl, top_method = %record.top_method, "query record appended");
        Ok(record)
    }

    /// Number of records currently in the log
    pub fn count_records(&self) -> Result<usize> {
        if !self.path.exists() {
            return Ok(0);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        Ok(reader.records().filter_map(|r| r.ok()).count())
    }
}
