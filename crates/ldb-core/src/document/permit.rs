//! Stay permit extractor shared by ITAS and ITK.
//!
//! Both permits are printed from the same template, so one rule table serves
//! both; only the record's type tag differs.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::rules::dates::{compose_date, ENGLISH_FIRST};
use super::rules::normalize::{clean_name, date, trimmed};
use super::rules::patterns::{DATE_TOKEN, SIGNATURE_DATE};
use super::rules::{first_success, FieldRule, Pattern, RuleSet, Strategy};
use super::{DocumentExtractor, Result};

lazy_static! {
    static ref RULES: RuleSet = RuleSet::new(vec![
        FieldRule::new("Permit Number", vec![
            Pattern::new(r"PERMIT NUMBER\s*:[ \t]*([A-Z0-9-]+)"),
        ]),
        FieldRule::new("Stay Permit Expiry", vec![
            Pattern::new(r"STAY PERMIT EXPIRY\s*:[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})").post(date),
        ]),
        FieldRule::new("Passport Number", vec![
            Pattern::new(r"Passport Number\s*:[ \t]*([A-Z0-9]+)"),
        ]),
        FieldRule::new("Passport Expiry", vec![
            Pattern::new(r"Passport Expiry\s*:[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})").post(date),
        ]),
        FieldRule::new("Nationality", vec![
            Pattern::new(r"Nationality\s*:[ \t]*([A-Z]+(?:[ \t]+[A-Z]+)*)"),
        ]),
        FieldRule::new("Gender", vec![
            Pattern::new(r"Gender\s*:[ \t]*([A-Z]+)"),
        ]),
        FieldRule::new("Address", vec![
            Pattern::new(r"Address\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Occupation", vec![
            Pattern::new(r"Occupation\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Guarantor", vec![
            Pattern::new(r"Guarantor\s*:[ \t]*([^\n]+)").per_line(),
        ]),
    ]);

    static ref PERMIT_NUMBER_LINE: Regex = Regex::new(r"PERMIT NUMBER").unwrap();
    static ref TRAILING_UPPERCASE: Regex = Regex::new(r"([A-Z][A-Z \t]*)$").unwrap();

    static ref PLACE_DATE_OF_BIRTH: Regex = Regex::new(
        r"Place / Date of Birth[^:\n]*:[ \t]*([A-Za-z][A-Za-z \t]*?)[ \t]*/[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})"
    ).unwrap();
}

/// Issue date strategies: the signature block first, then any numeric date.
const ISSUE_DATE_STRATEGIES: [Strategy<()>; 2] = [
    ("signature block", issue_from_signature),
    ("first numeric date", issue_from_numeric),
];

/// `"<City>, <day> <Month> <year>"`; an unknown month token is kept literally.
fn issue_from_signature(text: &str, _: &()) -> Option<String> {
    let caps = SIGNATURE_DATE.captures(text)?;
    compose_date(&caps[2], &caps[3], &caps[4], &ENGLISH_FIRST)
}

fn issue_from_numeric(text: &str, _: &()) -> Option<String> {
    date(DATE_TOKEN.find(text)?.as_str())
}

/// Extractor for ITAS and ITK stay permits.
#[derive(Debug, Clone, Copy)]
pub struct PermitExtractor {
    document_type: DocumentType,
}

impl PermitExtractor {
    /// Extractor tagging records as ITAS.
    pub fn itas() -> Self {
        Self {
            document_type: DocumentType::Itas,
        }
    }

    /// Extractor tagging records as ITK.
    pub fn itk() -> Self {
        Self {
            document_type: DocumentType::Itk,
        }
    }

    /// The holder's name is the uppercase text right above "PERMIT NUMBER".
    fn name(text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        let idx = lines.iter().position(|line| PERMIT_NUMBER_LINE.is_match(line))?;
        let previous = lines.get(idx.checked_sub(1)?)?;
        let caps = TRAILING_UPPERCASE.captures(previous.trim_end())?;
        trimmed(&caps[1])
    }

    /// `"PLACE, DD/MM/YYYY"`, or just the place when the date is unreadable.
    fn place_and_date_of_birth(text: &str) -> Option<String> {
        let caps = PLACE_DATE_OF_BIRTH.captures(text)?;
        let place = clean_name(&caps[1])?;
        match date(&caps[2]) {
            Some(birth_date) => Some(format!("{}, {}", place, birth_date)),
            None => Some(place),
        }
    }
}

impl DocumentExtractor for PermitExtractor {
    fn document_type(&self) -> DocumentType {
        self.document_type
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        let mut record = ExtractedRecord::new(self.document_type);

        record.set("Name", Self::name(text));
        RULES.apply(text, &mut record)?;
        record.set("Place & Date of Birth", Self::place_and_date_of_birth(text));
        record.set("Date Issue", first_success(&ISSUE_DATE_STRATEGIES, text, &()));

        debug!(
            "{}: {} fields populated",
            self.document_type,
            record.populated_count()
        );
        Ok(record)
    }
}
