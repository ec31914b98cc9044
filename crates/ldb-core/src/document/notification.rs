//! Foreign worker notification (notifikasi) extractor.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::rules::normalize::{date, date_indonesian, trimmed};
use super::rules::{FieldRule, Pattern, RuleSet};
use super::{DocumentExtractor, Result};

/// Decree numbers always carry at least one digit; this rejects label words
/// such as the "Paspor" in "Nomor Paspor".
fn decree_number(raw: &str) -> Option<String> {
    trimmed(raw).filter(|value| value.chars().any(|c| c.is_ascii_digit()))
}

lazy_static! {
    static ref RULES: RuleSet = RuleSet::new(vec![
        FieldRule::new("Nomor Keputusan", vec![
            Pattern::new(r"(?i)\bNOMOR[ \t]*:?[ \t]*([A-Z0-9./-]+)").per_line().post(decree_number),
        ]),
        FieldRule::new("Nama TKA", vec![
            Pattern::new(r"(?i)Nama TKA\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Tempat/Tanggal Lahir", vec![
            Pattern::new(r"(?i)Tempat\s*/\s*Tanggal Lahir\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Kewarganegaraan", vec![
            Pattern::new(r"(?i)Kewarganegaraan\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Alamat Tempat Tinggal", vec![
            Pattern::new(r"(?i)Alamat Tempat Tinggal\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Nomor Paspor", vec![
            Pattern::new(r"(?i)Nomor Paspor\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Jabatan", vec![
            Pattern::new(r"(?i)Jabatan\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Lokasi Kerja", vec![
            Pattern::new(r"(?i)Lokasi Kerja\s*:[ \t]*([^\n]+)").per_line(),
        ]),
        FieldRule::new("Date Issue", vec![
            Pattern::new(r"(?i)Pada tanggal\s*:?[ \t]*(\d{1,2}[ \t]+[A-Za-z]+[ \t]+\d{4})").post(date_indonesian),
            Pattern::new(r"(?i)Pada tanggal\s*:?[ \t]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})").post(date),
        ]),
    ]);

    static ref VALIDITY: Regex = Regex::new(
        r"(?i)Berlaku[ \t]*:?[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})[ \t]*(?:s[ \t]*/[ \t]*d|s\.?[ \t]*d\.?|sampai[ \t]+dengan|-)?[ \t]*(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4})"
    ).unwrap();
}

/// Extractor for foreign worker notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct NotificationExtractor;

impl NotificationExtractor {
    /// `"D1 - D2"` from `Berlaku: D1 s.d. D2` or `s/d`; both ends must be real dates.
    fn validity(text: &str) -> Option<String> {
        let caps = VALIDITY.captures(text)?;
        let start = date(&caps[1])?;
        let end = date(&caps[2])?;
        Some(format!("{} - {}", start, end))
    }
}

impl DocumentExtractor for NotificationExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Notification
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        let mut record = ExtractedRecord::new(DocumentType::Notification);
        RULES.apply(text, &mut record)?;
        record.set("Berlaku", Self::validity(text));

        debug!("NOTIFICATION: {} fields populated", record.populated_count());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
KEPUTUSAN DIREKTUR PENGENDALIAN PENGGUNAAN TENAGA KERJA ASING
NOMOR : B.3/12345/PK.04.01/IX/2023
Nama TKA : CHEN MING
Tempat/Tanggal Lahir : FUJIAN, 02 Juli 1979
Kewarganegaraan : REPUBLIK RAKYAT CHINA
Alamat Tempat Tinggal : Kawasan Industri Morowali
Nomor Paspor : EG7654321
Jabatan : Maintenance Manager
Lokasi Kerja : Kabupaten Morowali
Berlaku : 01-10-2023 s.d. 30-09-2024
Ditetapkan di Jakarta
Pada tanggal : 28 September 2023
";

    #[test]
    fn test_extract_sample() {
        let record = NotificationExtractor.extract(SAMPLE).unwrap();

        assert_eq!(record.document_type(), "NOTIFICATION");
        assert_eq!(record.get("Nomor Keputusan"), Some("B.3/12345/PK.04.01/IX/2023"));
        assert_eq!(record.get("Nama TKA"), Some("CHEN MING"));
        assert_eq!(record.get("Tempat/Tanggal Lahir"), Some("FUJIAN, 02 Juli 1979"));
        assert_eq!(record.get("Kewarganegaraan"), Some("REPUBLIK RAKYAT CHINA"));
        assert_eq!(record.get("Alamat Tempat Tinggal"), Some("Kawasan Industri Morowali"));
        assert_eq!(record.get("Nomor Paspor"), Some("EG7654321"));
        assert_eq!(record.get("Jabatan"), Some("Maintenance Manager"));
        assert_eq!(record.get("Lokasi Kerja"), Some("Kabupaten Morowali"));
        assert_eq!(record.get("Berlaku"), Some("01/10/2023 - 30/09/2024"));
        assert_eq!(record.get("Date Issue"), Some("28/09/2023"));
    }

    #[test]
    fn test_passport_label_is_not_a_decree_number() {
        let record = NotificationExtractor.extract("Nomor Paspor : EG7654321").unwrap();
        assert_eq!(record.get("Nomor Keputusan"), None);
        assert_eq!(record.get("Nomor Paspor"), Some("EG7654321"));
    }

    #[test]
    fn test_issue_date_uses_indonesian_months_only() {
        let record = NotificationExtractor
            .extract("Pada tanggal : 12 May 2024")
            .unwrap();
        assert_eq!(record.get("Date Issue"), None);

        let record = NotificationExtractor
            .extract("Pada tanggal : 12-05-2024")
            .unwrap();
        assert_eq!(record.get("Date Issue"), Some("12/05/2024"));
    }

    #[test]
    fn test_validity_needs_two_valid_dates() {
        let record = NotificationExtractor
            .extract("Berlaku : 01-10-2023 s.d. 31-02-2024")
            .unwrap();
        assert_eq!(record.get("Berlaku"), None);
    }

    #[test]
    fn test_validity_slash_separator() {
        let record = NotificationExtractor
            .extract("Berlaku : 01-10-2023 s/d 30-09-2024")
            .unwrap();
        assert_eq!(record.get("Berlaku"), Some("01/10/2023 - 30/09/2024"));
    }
}
