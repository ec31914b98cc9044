//! The extracted record: an ordered field-name to value mapping.

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::document::DocumentType;

/// A single extracted field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as it appears in exports (e.g. "Nomor Paspor").
    pub name: String,
    /// Normalized value, `None` when no pattern matched.
    pub value: Option<String>,
}

/// Result of one extraction call for one document.
///
/// Absent values are kept as explicit `None` entries so consumers can render
/// a fixed column set. When `error` is set the other fields should not be
/// trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    document_type: String,
    fields: Vec<Field>,
    error: Option<String>,
}

impl ExtractedRecord {
    /// Create a record for a supported type with every expected field null.
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type: document_type.as_str().to_string(),
            fields: document_type
                .expected_fields()
                .iter()
                .map(|name| Field {
                    name: (*name).to_string(),
                    value: None,
                })
                .collect(),
            error: None,
        }
    }

    /// Create an error record carrying only the type tag and a description.
    pub fn failed(document_type: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            document_type: document_type.into(),
            fields: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// The document type tag. Immutable after construction.
    pub fn document_type(&self) -> &str {
        &self.document_type
    }

    /// Error description if extraction failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether extraction failed for this document.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Ordered fields.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Value of a field, `None` when absent, empty or unknown.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.value.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    /// Set a field value. Unknown names are appended to keep the record total.
    pub(crate) fn set(&mut self, name: &str, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(Field {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Set a field only if it is still null. First match wins.
    pub(crate) fn set_if_absent(&mut self, name: &str, value: Option<String>) -> bool {
        if self.get(name).is_some() {
            return false;
        }
        let populated = value.as_deref().is_some_and(|v| !v.trim().is_empty());
        if populated {
            self.set(name, value);
        }
        populated
    }

    /// Number of populated fields.
    pub fn populated_count(&self) -> usize {
        self.fields.iter().filter(|f| f.value.is_some()).count()
    }

    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Serialize for ExtractedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + self.fields.len() + usize::from(self.error.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("document_type", &self.document_type)?;
        for field in &self.fields {
            map.serialize_entry(&field.name, &field.value)?;
        }
        if let Some(error) = &self.error {
            map.serialize_entry("error", error)?;
        }
        map.end()
    }
}
