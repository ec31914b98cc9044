//! Advisory completeness and format checks on extracted records.

use lazy_static::lazy_static;
use regex::Regex;

use crate::document::rules::patterns::{CURRENCY, HAS_DIGIT};
use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;
use crate::models::validation::{ValidationReport, ValidationStatus};

lazy_static! {
    static ref BILLING_CODE: Regex = Regex::new(r"^\d{10,}$").unwrap();
}

/// A format check on one optional field; runs only when the field is present.
struct FormatCheck {
    field: &'static str,
    accepts: fn(&str) -> bool,
    warning: &'static str,
}

fn has_at_sign(value: &str) -> bool {
    value.contains('@')
}

fn has_digit(value: &str) -> bool {
    HAS_DIGIT.is_match(value)
}

fn is_billing_code(value: &str) -> bool {
    BILLING_CODE.is_match(value)
}

fn has_currency(value: &str) -> bool {
    CURRENCY.is_match(value)
}

const FORMAT_CHECKS: &[FormatCheck] = &[
    FormatCheck {
        field: "Email",
        accepts: has_at_sign,
        warning: "email format may be invalid",
    },
    FormatCheck {
        field: "No Telepon",
        accepts: has_digit,
        warning: "phone number format may be invalid",
    },
    FormatCheck {
        field: "Kode Billing Pembayaran",
        accepts: is_billing_code,
        warning: "billing code format may be invalid (expected at least 10 digits)",
    },
    FormatCheck {
        field: "DKPTKA",
        accepts: has_currency,
        warning: "DKPTKA amount format may be invalid (no US$, USD or $ marker)",
    },
];

/// Validate a record against its type's required fields and format checks.
///
/// Never fails: a record of an unknown type has no required fields, and an
/// error record is reported incomplete with every required field missing.
pub fn validate(record: &ExtractedRecord) -> ValidationReport {
    let required = record
        .document_type()
        .parse::<DocumentType>()
        .map(|t| t.required_fields())
        .unwrap_or(&[]);

    let missing_fields: Vec<String> = required
        .iter()
        .filter(|field| record.get(field).is_none())
        .map(|field| field.to_string())
        .collect();

    let mut warnings: Vec<String> = FORMAT_CHECKS
        .iter()
        .filter(|check| record.get(check.field).is_some_and(|v| !(check.accepts)(v)))
        .map(|check| check.warning.to_string())
        .collect();

    if let Some(error) = record.error() {
        warnings.insert(0, format!("extraction failed: {}", error));
    }

    let status = if missing_fields.is_empty() && !record.is_error() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Incomplete
    };

    ValidationReport {
        status,
        missing_fields,
        warnings,
    }
}
