//! File names built from a record's holder name and passport number.

use std::path::Path;

use crate::models::config::OutputConfig;
use crate::models::record::ExtractedRecord;

/// Fields holding the document holder's name, in lookup order.
const NAME_FIELDS: &[&str] = &["Name", "Nama TKA"];

/// Fields holding the passport number, in lookup order.
const PASSPORT_FIELDS: &[&str] = &["Passport Number", "Nomor Paspor", "Passport No"];

/// Options controlling generated file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameOptions {
    pub use_name: bool,
    pub use_passport: bool,
    /// Maximum length in characters, extension included.
    pub max_len: usize,
}

impl Default for FilenameOptions {
    fn default() -> Self {
        Self::from(&OutputConfig::default())
    }
}

impl From<&OutputConfig> for FilenameOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            use_name: config.use_name,
            use_passport: config.use_passport,
            max_len: config.max_filename_len,
        }
    }
}

fn first_value<'a>(record: &'a ExtractedRecord, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|field| record.get(field))
}

/// Keep alphanumerics, spaces, hyphens and underscores; spaces become underscores.
fn sanitize_name(name: &str) -> Option<String> {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let kept = kept.split_whitespace().collect::<Vec<_>>().join("_");
    (!kept.is_empty()).then_some(kept)
}

fn sanitize_passport(passport: &str) -> Option<String> {
    let kept: String = passport.chars().filter(|c| c.is_alphanumeric()).collect();
    (!kept.is_empty()).then_some(kept)
}

/// Build `<TYPE>_<NAME>_<PASSPORT><.ext>` for a processed file.
///
/// Falls back to `original_filename` when neither a name nor a passport
/// number is available. Long names are truncated, keeping the extension.
pub fn generate_filename(
    record: &ExtractedRecord,
    original_filename: &str,
    options: &FilenameOptions,
) -> String {
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let mut parts = vec![record.document_type().to_string()];

    if options.use_name {
        if let Some(name) = first_value(record, NAME_FIELDS).and_then(sanitize_name) {
            parts.push(name);
        }
    }
    if options.use_passport {
        if let Some(passport) = first_value(record, PASSPORT_FIELDS).and_then(sanitize_passport) {
            parts.push(passport);
        }
    }

    if parts.len() == 1 {
        return original_filename.to_string();
    }

    let stem = parts.join("_");
    let ext_len = extension.chars().count();
    let stem: String = if stem.chars().count() + ext_len > options.max_len {
        stem.chars()
            .take(options.max_len.saturating_sub(ext_len))
            .collect()
    } else {
        stem
    };

    format!("{}{}", stem, extension)
}
