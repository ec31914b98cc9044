//! Extraction log entries handed to the persistence layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::record::ExtractedRecord;

/// Processing outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Completed,
    Failed,
}

/// One row of extraction history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionLogEntry {
    /// Original file name.
    pub filename: String,

    /// File size in bytes.
    pub file_size: u64,

    /// Document type tag as stored in the record.
    pub document_type: String,

    /// The record serialized as JSON text.
    pub extracted_data: String,

    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Completed unless the record carries an error.
    pub status: ExtractionStatus,

    /// When the entry was created.
    pub timestamp: DateTime<Utc>,
}

impl ExtractionLogEntry {
    /// Build a log entry. The timestamp is supplied by the caller.
    pub fn new(
        filename: impl Into<String>,
        file_size: u64,
        record: &ExtractedRecord,
        processing_time_ms: u64,
        timestamp: DateTime<Utc>,
    ) -> serde_json::Result<Self> {
        let status = if record.is_error() {
            ExtractionStatus::Failed
        } else {
            ExtractionStatus::Completed
        };

        Ok(Self {
            filename: filename.into(),
            file_size,
            document_type: record.document_type().to_string(),
            extracted_data: record.to_json()?,
            processing_time_ms,
            status,
            timestamp,
        })
    }

    /// Render as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
