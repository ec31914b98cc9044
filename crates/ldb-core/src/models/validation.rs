//! Advisory validation report derived from an extracted record.

use serde::{Deserialize, Serialize};

/// Overall completeness of a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// All required fields are present.
    #[default]
    Valid,
    /// At least one required field is missing.
    Incomplete,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Incomplete => "incomplete",
        }
    }
}

/// Computed on demand; never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Completeness status.
    pub status: ValidationStatus,
    /// Required fields that are absent, in required-list order.
    pub missing_fields: Vec<String>,
    /// Non-blocking format warnings.
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Whether the report carries neither missing fields nor warnings.
    pub fn is_clean(&self) -> bool {
        self.missing_fields.is_empty() && self.warnings.is_empty()
    }
}
