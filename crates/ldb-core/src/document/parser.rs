//! Dispatcher resolving a document type tag to its extractor.

use std::time::Instant;

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::{
    contain, DkptkaExtractor, DocumentExtractor, EvlnExtractor, NotificationExtractor,
    PermitExtractor, Result, SkttExtractor,
};

/// Dispatches text to the extractor for its document type.
///
/// Failures never escape: unsupported types, oversized input, extractor
/// errors and panics all come back as error records.
#[derive(Debug, Clone)]
pub struct DocumentParser {
    /// Texts longer than this are not scanned.
    max_text_bytes: usize,
    sktt: SkttExtractor,
    evln: EvlnExtractor,
    itas: PermitExtractor,
    itk: PermitExtractor,
    notification: NotificationExtractor,
    dkptka: DkptkaExtractor,
}

impl DocumentParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::with_config(&ExtractionConfig::default())
    }

    /// Create a parser from extraction settings.
    pub fn with_config(config: &ExtractionConfig) -> Self {
        Self {
            max_text_bytes: config.max_text_bytes,
            sktt: SkttExtractor,
            evln: EvlnExtractor::from_config(config),
            itas: PermitExtractor::itas(),
            itk: PermitExtractor::itk(),
            notification: NotificationExtractor,
            dkptka: DkptkaExtractor,
        }
    }

    /// Set the input size limit.
    pub fn with_max_text_bytes(mut self, limit: usize) -> Self {
        self.max_text_bytes = limit;
        self
    }

    /// The extractor handling `document_type`.
    pub fn extractor(&self, document_type: DocumentType) -> &dyn DocumentExtractor {
        match document_type {
            DocumentType::Sktt => &self.sktt,
            DocumentType::Evln => &self.evln,
            DocumentType::Itas => &self.itas,
            DocumentType::Itk => &self.itk,
            DocumentType::Notification => &self.notification,
            DocumentType::Dkptka => &self.dkptka,
        }
    }

    /// Extract fields for a document type tag, matched case-insensitively.
    ///
    /// An unsupported tag yields `{document_type: <tag>, error: ...}`.
    pub fn extract(&self, text: &str, document_type: &str) -> ExtractedRecord {
        match document_type.parse::<DocumentType>() {
            Ok(doc_type) => self.extract_typed(text, doc_type),
            Err(e) => {
                warn!("{}", e);
                ExtractedRecord::failed(document_type, e.to_string())
            }
        }
    }

    /// Extract fields for a resolved document type.
    pub fn extract_typed(&self, text: &str, document_type: DocumentType) -> ExtractedRecord {
        self.run(text, self.extractor(document_type))
    }

    /// Run one extractor under the size limit and panic guard.
    fn run(&self, text: &str, extractor: &dyn DocumentExtractor) -> ExtractedRecord {
        let document_type = extractor.document_type();
        let start = Instant::now();

        match self.try_extract(text, extractor) {
            Ok(record) => {
                debug!(
                    "{} extracted in {:?} ({} fields populated)",
                    document_type,
                    start.elapsed(),
                    record.populated_count()
                );
                record
            }
            Err(e) => {
                warn!("{} extraction failed: {}", document_type, e);
                ExtractedRecord::failed(
                    document_type.as_str(),
                    format!("failed to extract {} document: {}", document_type, e),
                )
            }
        }
    }

    fn try_extract(
        &self,
        text: &str,
        extractor: &dyn DocumentExtractor,
    ) -> Result<ExtractedRecord> {
        if text.len() > self.max_text_bytes {
            return Err(ExtractionError::InputTooLarge {
                size: text.len(),
                limit: self.max_text_bytes,
            });
        }

        contain(|| extractor.extract(text))
    }
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a document's fields with default settings.
///
/// This is the engine's single entry point: it never panics and never
/// returns an error, failures are reported in the record's `error` field.
pub fn extract_document_data(text: &str, document_type: &str) -> ExtractedRecord {
    DocumentParser::new().extract(text, document_type)
}
