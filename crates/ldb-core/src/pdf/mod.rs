//! PDF text source.
//!
//! Turns a PDF into the single plain-text string the extractors consume:
//! page texts in order, empty pages skipped, joined with newlines.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF text sources.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;
}

/// Load `data` and return its text, enforcing the configured limits.
pub fn extract_document_text(data: &[u8], config: &PdfConfig) -> Result<String> {
    let size = data.len() as u64;
    if size > config.max_file_size {
        return Err(PdfError::TooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    let mut extractor = PdfExtractor::new();
    extractor.load(data)?;
    let text = extractor.extract_text()?;

    if text.trim().chars().count() < config.min_text_length {
        return Err(PdfError::TextExtraction(
            "no text extracted from PDF".to_string(),
        ));
    }
    Ok(text)
}
