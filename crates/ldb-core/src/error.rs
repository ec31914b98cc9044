//! Error types for the ldb-core library.

use thiserror::Error;

/// Main error type for the ldb library.
#[derive(Error, Debug)]
pub enum LdbError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Document field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The file exceeds the configured size limit.
    #[error("file size {size} exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
}

/// Errors raised inside an extractor.
///
/// These never escape [`crate::extract_document_data`]; the dispatcher turns
/// them into an error record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The document type tag is not one of the supported types.
    #[error("unsupported document type: {0}")]
    UnsupportedDocumentType(String),

    /// A pattern matched but the expected capture group was absent.
    #[error("missing capture group {group} for {field}")]
    Capture { field: String, group: usize },

    /// The input text exceeds the configured limit.
    #[error("input too large: {size} bytes (limit {limit})")]
    InputTooLarge { size: usize, limit: usize },

    /// An extractor panicked while matching.
    #[error("extractor panicked: {0}")]
    Panicked(String),
}

/// Result type for the ldb library.
pub type Result<T> = std::result::Result<T, LdbError>;
