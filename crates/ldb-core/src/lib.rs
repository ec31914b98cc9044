//! Core library for Indonesian immigration document field extraction.
//!
//! This crate provides:
//! - Rule-based field extractors for SKTT, EVLN, ITAS, ITK, notification
//!   and DKPTKA documents
//! - A dispatcher that never fails, reporting errors inside the record
//! - Advisory validation of extracted records
//! - File naming and CSV export helpers
//! - PDF text extraction (feature `pdf`)

pub mod document;
pub mod error;
pub mod export;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod validator;

pub use document::{extract_document_data, DocumentExtractor, DocumentParser};
pub use error::{ExtractionError, LdbError, PdfError, Result};
pub use export::{generate_filename, FilenameOptions, TableExporter, TableRow};
pub use models::config::LdbConfig;
pub use models::document::DocumentType;
pub use models::log::{ExtractionLogEntry, ExtractionStatus};
pub use models::record::{ExtractedRecord, Field};
pub use models::validation::{ValidationReport, ValidationStatus};
#[cfg(feature = "pdf")]
pub use pdf::{extract_document_text, PdfExtractor, PdfProcessor};
pub use validator::validate;
