//! SKTT (Surat Keterangan Tempat Tinggal) extractor.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::rules::dates::{find_date, BILINGUAL};
use super::rules::normalize::{clean_name, clean_text, date, split_birth_place_date, upper};
use super::rules::{FieldRule, Pattern, RuleSet};
use super::{DocumentExtractor, Result};

lazy_static! {
    static ref RULES: RuleSet = RuleSet::new(vec![
        FieldRule::new("NIK", vec![
            Pattern::new(r"NIK/Number of Population Identity\s*:[ \t]*(\d+)"),
            Pattern::new(r"(?i)\bNIK\s*:[ \t]*(\d+)"),
        ]),
        FieldRule::new("Name", vec![
            Pattern::new(r"Nama/Name\s*:[ \t]*([^\n]+)").post(clean_name),
            Pattern::new(r"(?im)^[ \t]*(?:Nama|Name)[ \t]*:[ \t]*([^\n]+)").post(clean_name),
        ]),
        FieldRule::new("Jenis Kelamin", vec![
            Pattern::new(r"(?i)(?:Jenis Kelamin|Sex)[^:\n]*:[ \t]*(MALE|FEMALE|LAKI-LAKI|PEREMPUAN)\b").post(upper),
        ]),
        FieldRule::new("Nationality", vec![
            Pattern::new(r"(?i)Kewarganegaraan(?:/Nationality)?\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Occupation", vec![
            Pattern::new(r"(?i)Pekerjaan(?:/Occupation)?\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Address", vec![
            Pattern::new(r"(?i)Alamat(?:/Address)?\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("KITAS/KITAP", vec![
            Pattern::new(r"(?i)Nomor KITAP/KITAS(?: Number)?\s*:[ \t]*([\w-]+)"),
            Pattern::new(r"(?i)KITA[SP] Number\s*:[ \t]*([\w-]+)"),
        ]),
        FieldRule::new("Passport Expiry", vec![
            Pattern::new(r"(?i)Berlaku Hingga s\.?d\.?(?:/Expired date)?\s*:[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}|\d{1,2}[ \t]+[A-Za-z]+\.?[ \t]+\d{4})").post(date),
            Pattern::new(r"(?i)Expired date\s*:[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}|\d{1,2}[ \t]+[A-Za-z]+\.?[ \t]+\d{4})").post(date),
        ]),
    ]);

    static ref BIRTH: Regex = Regex::new(
        r"(?i)Tempat/Tgl Lahir(?:/Place(?: and |/)Date of Birth)?\s*:[ \t]*([^\n]+)"
    ).unwrap();

    static ref ISSUER_MARKER: Regex = Regex::new(r"(?i)KEPALA\s+DINAS").unwrap();
}

/// Extractor for residence certificates.
///
/// Labels are bilingual (`Nama/Name`); the issue date is printed on the line
/// right above the signing official's title.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkttExtractor;

impl SkttExtractor {
    /// Date from the line preceding the first "KEPALA DINAS" marker.
    fn issue_date(text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().collect();
        let marker = lines.iter().position(|line| ISSUER_MARKER.is_match(line))?;
        let previous = lines.get(marker.checked_sub(1)?)?;
        find_date(previous, &BILINGUAL)
    }
}

impl DocumentExtractor for SkttExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Sktt
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        let mut record = ExtractedRecord::new(DocumentType::Sktt);
        RULES.apply(text, &mut record)?;

        if let Some(caps) = BIRTH.captures(text) {
            let (place, birth_date) = split_birth_place_date(&caps[1]);
            record.set("Place of Birth", place.as_deref().and_then(clean_name));
            record.set("Date of Birth", birth_date.as_deref().and_then(date));
        }

        record.set("Date Issue", Self::issue_date(text));

        debug!("SKTT: {} fields populated", record.populated_count());
        Ok(record)
    }
}
