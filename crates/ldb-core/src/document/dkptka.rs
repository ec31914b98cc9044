//! DKPTKA (foreign worker compensation fund) letter extractor.
//!
//! Two layouts are seen in practice: a tabular export where one line holds
//! employer, worker, passport, nationality, job title and amount as columns,
//! and the numbered `Label : value` letter. The tabular pass runs first; the
//! labeled pass only runs when the tabular pass found nothing.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::rules::normalize::{alphabetic_text, clean_text, date, phone};
use super::rules::patterns::{CURRENCY, HAS_DIGIT, LONG_DIGITS};
use super::rules::{first_success, FieldRule, Pattern, RuleSet, Strategy};
use super::{contain, DocumentExtractor, Result};

/// Minimum length of a billing code.
const BILLING_CODE_MIN_DIGITS: usize = 12;

lazy_static! {
    // Tabular layout
    static ref TABULAR_HINT: Regex = Regex::new(
        r"(?i)\b(?:CHINA|INDONESIA|ENGINEER|MANAGER|USD|PT|CV)\b|US\$"
    ).unwrap();
    static ref COLUMN_GAP: Regex = Regex::new(r"\s{2,}").unwrap();
    static ref COMPANY: Regex = Regex::new(
        r"(?i)\b(?:PT|CV|COMPANY|CORP|LTD|INDUSTRY|NICKEL|STEEL|MINING)\b"
    ).unwrap();
    static ref PERSON_NAME: Regex = Regex::new(r"^[A-Z]+(?:[ \t]+[A-Z]+)+$").unwrap();
    static ref PASSPORT: Regex = Regex::new(r"^[A-Z0-9]{6,12}$").unwrap();
    static ref COUNTRY: Regex = Regex::new(
        r"(?i)\b(?:CHINA|INDONESIA|MALAYSIA|SINGAPORE|THAILAND|VIETNAM|PHILIPPINES|INDIA|BANGLADESH|MYANMAR|KOREA|JAPAN)\b"
    ).unwrap();
    static ref JOB_TITLE: Regex = Regex::new(
        r"(?i)\b(?:ENGINEER|MANAGER|SUPERVISOR|DIRECTOR|TECHNICIAN|OPERATOR|SPECIALIST|COORDINATOR|ASSISTANT|MECHANICAL|ELECTRICAL|CIVIL|CHEMICAL|INDUSTRIAL)\b"
    ).unwrap();

    // Labeled layout, used only when the table yields nothing
    static ref LABELED_RULES: RuleSet = RuleSet::new(vec![
        FieldRule::new("Nama Pemberi Kerja", vec![
            Pattern::new(r"(?i)Nama\s+Pemberi\s+Kerja\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Nama TKA", vec![
            Pattern::new(r"(?i)Nama\s+TKA\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.|Tempat)")
                .post(alphabetic_text),
            Pattern::new(r"(?i)Nama\s+TKA\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Nomor Paspor", vec![
            Pattern::new(r"(?i)Nomor\s+Paspor\s*:[ \t]*([A-Z0-9]+)"),
            Pattern::new(r"(?i)Paspor\s*:[ \t]*([A-Z0-9]+)"),
        ]),
        FieldRule::new("Kewarganegaraan", vec![
            Pattern::new(r"(?i)Kewarganegaraan\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.|Jabatan)")
                .post(alphabetic_text),
            Pattern::new(r"(?i)Kewarganegaraan\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Jabatan", vec![
            Pattern::new(r"(?i)Jabatan\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.|Kanim)")
                .post(alphabetic_text),
            Pattern::new(r"(?i)Jabatan\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("DKPTKA", vec![
            Pattern::new(r"(?i)DKPTKA\s+yang\s+dibayarkan\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:Setelah|V\.|\*)"),
            Pattern::new(r"(?i)DKPTKA[^:\n]*:[ \t]*(US\$[^\n]+)"),
        ]),
    ]);

    // Fields common to both layouts
    static ref COMMON_RULES: RuleSet = RuleSet::new(vec![
        FieldRule::new("Alamat", vec![
            Pattern::new(r"(?i)\bAlamat\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.\s*Nomor\s+Telepon|3\.)")
                .post(clean_text),
            Pattern::new(r"(?i)\bAlamat\s*:[ \t]*")
                .until(r"(?i)Nomor\s+Telepon|E-?mail")
                .post(clean_text),
        ]),
        FieldRule::new("No Telepon", vec![
            Pattern::new(r"(?i)Nomor\s+Telepon\s*:[ \t]*([0-9+()\- \t]+)").post(phone),
            Pattern::new(r"(?i)Telepon\s*:[ \t]*([0-9+()\- \t]+)").post(phone),
        ]),
        FieldRule::new("Email", vec![
            Pattern::new(r"(?i)\bE-?mail\s*:[ \t]*([a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,})"),
        ]),
        FieldRule::new("Tempat/Tanggal Lahir", vec![
            Pattern::new(r"(?i)Tempat\s*/\s*Tgl\s+Lahir\s*:[ \t]*([^,\n]+,[ \t]*\d{1,2}[ \t]+[A-Za-z]+[ \t]+\d{4})")
                .post(clean_text),
            Pattern::new(r"(?i)Tempat[^:\n]*Lahir\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Kanim", vec![
            Pattern::new(r"(?i)Kanim\s+Perpanjangan\s+ITAS/ITAP\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.|Lokasi)")
                .post(alphabetic_text),
            Pattern::new(r"(?i)Kanim[^:\n]*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Lokasi Kerja", vec![
            Pattern::new(r"(?i)Lokasi\s+Kerja\s*:[ \t]*")
                .until(r"(?i)\n\s*(?:\d+\.|Jangka)")
                .post(alphabetic_text),
            Pattern::new(r"(?i)Lokasi\s+Kerja\s*:[ \t]*([^\n]+)").post(clean_text),
        ]),
        FieldRule::new("Jangka Waktu", vec![
            Pattern::new(r"(?i)Jangka\s+Waktu\s*:[ \t]*").until(r"\n\s*III\."),
            Pattern::new(r"(?i)Jangka\s+Waktu\s*:[ \t]*([^\n]+)"),
        ]),
        FieldRule::new("Tanggal Penerbitan", vec![
            Pattern::new(r"(?i)Tanggal\s+Penerbitan\s*:[ \t]*(\d{1,2}[ \t]+[A-Za-z]+[ \t]+\d{4})").post(date),
            Pattern::new(r"(?i)Tanggal\s+Penerbitan\s*:[ \t]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})").post(date),
        ]),
        FieldRule::new("No Rekening", vec![
            Pattern::new(r"(?i)No\.?\s+Rekening\s*:[ \t]*([0-9]+)"),
            Pattern::new(r"(?i)Rekening\s*:[ \t]*([0-9]+)"),
        ]),
    ]);

    static ref COMPANY_LINE: Regex = Regex::new(r"^[A-Z][A-Z .,]*$").unwrap();
    static ref PT_WORD: Regex = Regex::new(r"\bPT\b").unwrap();
    static ref ADDRESS_LABEL: Regex = Regex::new(r"(?i)Alamat").unwrap();

    // Billing code search, most specific first
    static ref BILLING_LABELED: Regex = Regex::new(
        r"(?i)(?:Kode\s+Billing|Billing\s+Code|Code\s+Billing)[^\d]{0,80}(\d{12,})"
    ).unwrap();
    static ref BILLING_PAYMENT: Regex = Regex::new(
        r"(?i)pembayaran\s+DKPTKA[^\d]{0,80}(\d{12,})"
    ).unwrap();
    static ref BILLING_PAYMENT_CODE: Regex = Regex::new(
        r"(?i)kode\s+pembayaran[^\d]{0,80}(\d{12,})"
    ).unwrap();
    static ref VERY_LONG_NUMBER: Regex = Regex::new(r"(\d{15,})").unwrap();
}

/// Billing code strategies in order of increasing generality.
const BILLING_CODE_STRATEGIES: [Strategy<()>; 5] = [
    ("billing code label", billing_from_label),
    ("payment phrase", billing_from_payment),
    ("payment code phrase", billing_from_payment_code),
    ("very long number", billing_from_very_long_number),
    ("long number on any line", billing_from_lines),
];

fn billing_from_label(text: &str, _: &()) -> Option<String> {
    billing_capture(&BILLING_LABELED, text)
}

fn billing_from_payment(text: &str, _: &()) -> Option<String> {
    billing_capture(&BILLING_PAYMENT, text)
}

fn billing_from_payment_code(text: &str, _: &()) -> Option<String> {
    billing_capture(&BILLING_PAYMENT_CODE, text)
}

fn billing_from_very_long_number(text: &str, _: &()) -> Option<String> {
    billing_capture(&VERY_LONG_NUMBER, text)
}

fn is_billing_code(value: &str) -> bool {
    value.len() >= BILLING_CODE_MIN_DIGITS && value.chars().all(|c| c.is_ascii_digit())
}

fn billing_capture(regex: &Regex, text: &str) -> Option<String> {
    let caps = regex.captures(text)?;
    let code = caps.get(1)?.as_str();
    is_billing_code(code).then(|| code.to_string())
}

fn billing_from_lines(text: &str, _: &()) -> Option<String> {
    text.lines()
        .flat_map(|line| LONG_DIGITS.find_iter(line))
        .map(|m| m.as_str())
        .find(|code| is_billing_code(code))
        .map(str::to_string)
}

/// Whether a line looks like a row of the tabular layout.
fn is_tabular_line(line: &str) -> bool {
    line.contains('\t') || (line.split_whitespace().count() >= 4 && TABULAR_HINT.is_match(line))
}

fn columns(line: &str) -> Vec<&str> {
    if line.contains('\t') {
        line.split('\t').collect()
    } else {
        COLUMN_GAP.split(line.trim()).collect()
    }
}

/// Classify one column by its content. Earlier checks take precedence.
fn classify_column(index: usize, column: &str) -> Option<&'static str> {
    if index == 0 && COMPANY.is_match(column) {
        Some("Nama Pemberi Kerja")
    } else if index == 1 && PERSON_NAME.is_match(column) {
        Some("Nama TKA")
    } else if PASSPORT.is_match(column) && HAS_DIGIT.is_match(column) {
        Some("Nomor Paspor")
    } else if COUNTRY.is_match(column) {
        Some("Kewarganegaraan")
    } else if JOB_TITLE.is_match(column) {
        Some("Jabatan")
    } else if CURRENCY.is_match(column) && HAS_DIGIT.is_match(column) {
        Some("DKPTKA")
    } else {
        None
    }
}

/// Extractor for DKPTKA payment letters.
#[derive(Debug, Default, Clone, Copy)]
pub struct DkptkaExtractor;

impl DkptkaExtractor {
    /// Scan tab or multi-space separated rows. Returns the number of fields set.
    fn extract_tabular(text: &str, record: &mut ExtractedRecord) -> usize {
        let mut populated = 0;
        for line in text.lines().filter(|line| is_tabular_line(line)) {
            let parts = columns(line);
            if parts.len() < 4 {
                continue;
            }
            for (index, part) in parts.iter().enumerate() {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                if let Some(field) = classify_column(index, part) {
                    if record.set_if_absent(field, clean_text(part)) {
                        populated += 1;
                    }
                }
            }
        }
        populated
    }

    /// An uppercase company line (containing "PT") directly above an address label.
    fn company_above_address(text: &str) -> Option<String> {
        let lines: Vec<&str> = text.lines().map(str::trim).collect();
        lines
            .windows(2)
            .find(|pair| {
                COMPANY_LINE.is_match(pair[0])
                    && PT_WORD.is_match(pair[0])
                    && ADDRESS_LABEL.is_match(pair[1])
            })
            .and_then(|pair| clean_text(pair[0]))
    }

    fn extract_fields(text: &str) -> Result<ExtractedRecord> {
        let mut record = ExtractedRecord::new(DocumentType::Dkptka);

        let tabular = Self::extract_tabular(text, &mut record);
        if tabular == 0 {
            LABELED_RULES.apply(text, &mut record)?;
            record.set_if_absent("Nama Pemberi Kerja", Self::company_above_address(text));
        }
        debug!("DKPTKA: tabular pass populated {} fields", tabular);

        COMMON_RULES.apply(text, &mut record)?;
        record.set_if_absent(
            "Kode Billing Pembayaran",
            first_success(&BILLING_CODE_STRATEGIES, text, &()),
        );

        debug!("DKPTKA: {} fields populated", record.populated_count());
        Ok(record)
    }
}

impl DocumentExtractor for DkptkaExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Dkptka
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        Ok(guarded(|| DkptkaExtractor::extract_fields(text)))
    }
}

/// Run a DKPTKA extraction body, reporting any failure as an error record.
fn guarded<F>(body: F) -> ExtractedRecord
where
    F: FnOnce() -> Result<ExtractedRecord>,
{
    match contain(body) {
        Ok(record) => record,
        Err(e) => {
            warn!("DKPTKA extraction failed: {}", e);
            ExtractedRecord::failed(
                DocumentType::Dkptka.as_str(),
                format!("failed to extract DKPTKA data: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use pretty_assertions::assert_eq;

    const LABELED: &str = "\
I. Pemberi Kerja TKA
1. Nama Pemberi Kerja : PT SULAWESI MINING INDONESIA
2. Alamat : Jl. Trans Sulawesi KM 5,
   Bahodopi, Morowali
3. Nomor Telepon : (0411) 123-456
4. Email : hrd@sulawesimining.co.id
II. Tenaga Kerja Asing
5. Nama TKA : LIU
   YANG
6. Tempat/Tgl Lahir : HUNAN, 14 Mei 1982
7. Nomor Paspor : EH1122334
8. Kewarganegaraan : REPUBLIK RAKYAT CHINA
9. Jabatan : MECHANICAL ENGINEER
10. Kanim Perpanjangan ITAS/ITAP : Kanim Palu
11. Lokasi Kerja : Kabupaten Morowali
12. Jangka Waktu : 12 bulan
    (01-01-2024 s.d. 31-12-2024)
III. Pembayaran
Tanggal Penerbitan : 05 Januari 2024
Kode Billing : 820240105123456
No Rekening : 1234567890
DKPTKA yang dibayarkan : US$ 1,200
   (seribu dua ratus dolar)
Setelah pembayaran dilakukan
";

    #[test]
    fn test_tabular_line() {
        let text = "PT NICKEL INDUSTRY\tJOHN DOE\tAB1234567\tCHINA\tENGINEER\tUS$500";
        let record = DkptkaExtractor.extract(text).unwrap();

        assert_eq!(record.get("Nama Pemberi Kerja"), Some("PT NICKEL INDUSTRY"));
        assert_eq!(record.get("Nama TKA"), Some("JOHN DOE"));
        assert_eq!(record.get("Nomor Paspor"), Some("AB1234567"));
        assert!(record.get("Kewarganegaraan").unwrap().contains("CHINA"));
        assert!(record.get("Jabatan").unwrap().contains("ENGINEER"));
        assert!(record.get("DKPTKA").unwrap().contains("US$500"));
    }

    #[test]
    fn test_multi_space_columns() {
        let text = "PT MAJU STEEL   LI MING   X9876543   INDONESIA   SITE MANAGER   USD 750";
        let record = DkptkaExtractor.extract(text).unwrap();

        assert_eq!(record.get("Nama Pemberi Kerja"), Some("PT MAJU STEEL"));
        assert_eq!(record.get("Nama TKA"), Some("LI MING"));
        assert_eq!(record.get("Nomor Paspor"), Some("X9876543"));
        assert_eq!(record.get("Kewarganegaraan"), Some("INDONESIA"));
        assert_eq!(record.get("Jabatan"), Some("SITE MANAGER"));
        assert_eq!(record.get("DKPTKA"), Some("USD 750"));
    }

    #[test]
    fn test_labeled_layout() {
        let record = DkptkaExtractor.extract(LABELED).unwrap();

        assert_eq!(record.get("Nama Pemberi Kerja"), Some("PT SULAWESI MINING INDONESIA"));
        assert_eq!(record.get("Alamat"), Some("Jl. Trans Sulawesi KM 5, Bahodopi, Morowali"));
        assert_eq!(record.get("No Telepon"), Some("(0411)123-456"));
        assert_eq!(record.get("Email"), Some("hrd@sulawesimining.co.id"));
        assert_eq!(record.get("Nama TKA"), Some("LIU YANG"));
        assert_eq!(record.get("Tempat/Tanggal Lahir"), Some("HUNAN, 14 Mei 1982"));
        assert_eq!(record.get("Nomor Paspor"), Some("EH1122334"));
        assert_eq!(record.get("Kewarganegaraan"), Some("REPUBLIK RAKYAT CHINA"));
        assert_eq!(record.get("Jabatan"), Some("MECHANICAL ENGINEER"));
        assert_eq!(record.get("Kanim"), Some("Kanim Palu"));
        assert_eq!(record.get("Lokasi Kerja"), Some("Kabupaten Morowali"));
        assert_eq!(record.get("Jangka Waktu"), Some("12 bulan (01-01-2024 s.d. 31-12-2024)"));
        assert_eq!(record.get("Tanggal Penerbitan"), Some("05/01/2024"));
        assert_eq!(record.get("Kode Billing Pembayaran"), Some("820240105123456"));
        assert_eq!(record.get("No Rekening"), Some("1234567890"));
        assert_eq!(record.get("DKPTKA"), Some("US$ 1,200 (seribu dua ratus dolar)"));
    }

    #[test]
    fn test_billing_code_strategies() {
        let strategies = &BILLING_CODE_STRATEGIES;
        assert_eq!(
            first_success(strategies, "Kode Billing Pembayaran : 820240105123456", &()),
            Some("820240105123456".to_string())
        );
        assert_eq!(
            first_success(strategies, "kode pembayaran no. 123456789012", &()),
            Some("123456789012".to_string())
        );
        assert_eq!(
            first_success(strategies, "ref\n999988887777\n", &()),
            Some("999988887777".to_string())
        );
        assert_eq!(first_success(strategies, "Kode Billing : 12345", &()), None);
    }

    #[test]
    fn test_company_above_address() {
        let text = "PT ANGIN TIMUR\nAlamat : Jl. Merdeka 1\nNama TKA : SATO KEN";
        let record = DkptkaExtractor.extract(text).unwrap();
        assert_eq!(record.get("Nama Pemberi Kerja"), Some("PT ANGIN TIMUR"));
        assert_eq!(record.get("Nama TKA"), Some("SATO KEN"));
    }

    #[test]
    fn test_empty_text() {
        let record = DkptkaExtractor.extract("").unwrap();
        assert_eq!(record.document_type(), "DKPTKA");
        assert_eq!(record.fields().len(), 16);
        assert_eq!(record.populated_count(), 0);
        assert!(!record.is_error());
    }

    #[test]
    fn test_aligned_labeled_line_takes_tabular_path() {
        // A double-spaced labeled line with a country name reads as a table
        // row, which suppresses the labeled pass for the whole letter.
        let text = "\
5. Nama TKA : LIU YANG
7. Nomor Paspor : EH1122334
8. Kewarganegaraan  :  REPUBLIK  RAKYAT CHINA
";
        let record = DkptkaExtractor.extract(text).unwrap();

        assert_eq!(record.get("Kewarganegaraan"), Some("RAKYAT CHINA"));
        assert_eq!(record.get("Nama TKA"), None);
        assert_eq!(record.get("Nomor Paspor"), None);
    }

    #[test]
    fn test_guarded_reports_panic() {
        let record = guarded(|| panic!("bad column"));

        assert_eq!(record.document_type(), "DKPTKA");
        assert_eq!(
            record.error(),
            Some("failed to extract DKPTKA data: extractor panicked: bad column")
        );
        assert!(record.fields().is_empty());
    }

    #[test]
    fn test_guarded_reports_error() {
        let record = guarded(|| {
            Err(ExtractionError::Capture {
                field: "Nama TKA".to_string(),
                group: 1,
            })
        });

        assert_eq!(
            record.error(),
            Some("failed to extract DKPTKA data: missing capture group 1 for Nama TKA")
        );
    }
}
