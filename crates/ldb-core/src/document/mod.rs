//! Document field extraction: one rule-based extractor per document type.

mod dkptka;
mod evln;
mod notification;
mod parser;
mod permit;
pub mod rules;
mod sktt;

use std::panic::{self, AssertUnwindSafe};

pub use dkptka::DkptkaExtractor;
pub use evln::EvlnExtractor;
pub use notification::NotificationExtractor;
pub use parser::{extract_document_data, DocumentParser};
pub use permit::PermitExtractor;
pub use sktt::SkttExtractor;

use crate::error::ExtractionError;
use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for document field extractors.
///
/// Implementations are stateless: the same text always yields the same record.
pub trait DocumentExtractor {
    /// Document type this extractor produces records for.
    fn document_type(&self) -> DocumentType;

    /// Extract the document's fields from plain text.
    fn extract(&self, text: &str) -> Result<ExtractedRecord>;
}

/// Run an extraction body, turning a panic into [`ExtractionError::Panicked`].
pub(crate) fn contain<F>(body: F) -> Result<ExtractedRecord>
where
    F: FnOnce() -> Result<ExtractedRecord>,
{
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ExtractionError::Panicked(message))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contain_passes_results_through() {
        let record = contain(|| Ok(ExtractedRecord::new(DocumentType::Sktt))).unwrap();
        assert_eq!(record.document_type(), "SKTT");

        let err = contain(|| Err(ExtractionError::UnsupportedDocumentType("X".into())));
        assert_eq!(err, Err(ExtractionError::UnsupportedDocumentType("X".into())));
    }

    #[test]
    fn test_contain_catches_panics() {
        let result = contain(|| panic!("boom"));
        assert_eq!(result, Err(ExtractionError::Panicked("boom".to_string())));
    }
}
