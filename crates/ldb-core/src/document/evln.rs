//! EVLN (electronic visa approval letter) extractor.

use std::ops::RangeInclusive;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::document::DocumentType;
use crate::models::record::ExtractedRecord;

use super::rules::dates::{find_date, numeric_dates, year_of, BILINGUAL};
use super::rules::normalize::{clean_name, date};
use super::rules::{first_success, Strategy};
use super::{DocumentExtractor, Result};

lazy_static! {
    static ref GREETING: Regex = Regex::new(r"(?i)\bDear\b").unwrap();

    static ref NAME_LABEL: Regex = Regex::new(r"(?i)\b(?:Name|Nama)\b").unwrap();
    static ref BIRTH_PLACE_LABEL: Regex = Regex::new(r"(?i)\b(?:Place of Birth|Tempat Lahir)\b").unwrap();
    static ref BIRTH_DATE_LABEL: Regex = Regex::new(r"(?i)\b(?:Date of Birth|Tanggal Lahir)\b").unwrap();
    static ref PASSPORT_LABEL: Regex = Regex::new(r"(?i)\bPassport No\b").unwrap();
    static ref EXPIRY_LABEL: Regex = Regex::new(r"(?i)\bPassport Expiry\b").unwrap();
    static ref ISSUE_LABEL: Regex = Regex::new(r"(?i)\b(?:Date of issue|Tanggal Penerbitan)\b").unwrap();

    static ref VISA_TYPE_SUFFIX: Regex = Regex::new(r"(?i)\s*Visa\s*Type.*$").unwrap();
    static ref PASSPORT_TOKEN: Regex = Regex::new(r"\b[A-Z0-9]+\b").unwrap();

    static ref ISSUE_PHRASE: Regex = Regex::new(
        r"(?i)(?:Date\s+of\s+Issue|Issue\s+Date|Issued\s+on|Tanggal\s+Penerbitan)\s*:?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})"
    ).unwrap();
    static ref ISSUED: Regex = Regex::new(
        r"(?i)(?:Issued|Diterbitkan)\s*:?\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{4})"
    ).unwrap();
}

/// Name candidates after a greeting must be within this length range.
const GREETING_NAME_LEN: RangeInclusive<usize> = 4..=49;

/// Values already known when resolving the issue date.
#[derive(Debug)]
struct IssueContext {
    birth: Option<String>,
    expiry: Option<String>,
    years: RangeInclusive<i32>,
}

/// Issue date strategies, most explicit first.
const ISSUE_DATE_STRATEGIES: [Strategy<IssueContext>; 4] = [
    ("labeled line", issue_from_labeled_line),
    ("issue phrase", issue_from_phrase),
    ("issued", issue_from_issued),
    ("plausible year", issue_from_plausible_year),
];

fn issue_from_labeled_line(text: &str, _: &IssueContext) -> Option<String> {
    labeled_lines(text, &ISSUE_LABEL).find_map(first_date)
}

fn issue_from_phrase(text: &str, _: &IssueContext) -> Option<String> {
    ISSUE_PHRASE.captures(text).and_then(|caps| date(&caps[1]))
}

fn issue_from_issued(text: &str, _: &IssueContext) -> Option<String> {
    ISSUED.captures(text).and_then(|caps| date(&caps[1]))
}

fn issue_from_plausible_year(text: &str, ctx: &IssueContext) -> Option<String> {
    numeric_dates(text).find(|candidate| {
        year_of(candidate).is_some_and(|year| ctx.years.contains(&year))
            && ctx.birth.as_deref() != Some(candidate.as_str())
            && ctx.expiry.as_deref() != Some(candidate.as_str())
    })
}

/// Lines carrying `label`.
fn labeled_lines<'a>(text: &'a str, label: &'a Regex) -> impl Iterator<Item = &'a str> + 'a {
    text.lines().filter(move |line| label.is_match(line))
}

/// The value segment of a `Label : value` line, up to any following colon.
fn after_colon(line: &str) -> Option<&str> {
    line.split(':').nth(1)
}

/// Earliest numeric or month-name date on the line.
fn first_date(line: &str) -> Option<String> {
    find_date(line, &BILINGUAL)
}

/// Extractor for electronic visa approval letters.
#[derive(Debug, Clone)]
pub struct EvlnExtractor {
    issue_years: RangeInclusive<i32>,
}

impl EvlnExtractor {
    /// Create an extractor with the default plausible issue years.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create an extractor using the configured issue year range.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            issue_years: config.issue_year_min..=config.issue_year_max,
        }
    }

    /// Set the year range accepted by the last-resort issue date scan.
    pub fn with_issue_years(mut self, years: RangeInclusive<i32>) -> Self {
        self.issue_years = years;
        self
    }

    /// Name from the line following a "Dear ..." greeting.
    fn greeting_name(text: &str) -> Option<String> {
        let mut lines = text.lines();
        lines.by_ref().find(|line| GREETING.is_match(line))?;
        let candidate = lines.next()?.trim();
        if GREETING_NAME_LEN.contains(&candidate.chars().count()) {
            clean_name(candidate)
        } else {
            None
        }
    }

    fn labeled_name(text: &str) -> Option<String> {
        labeled_lines(text, &NAME_LABEL)
            .filter_map(after_colon)
            .find_map(clean_name)
    }

    fn birth_place(text: &str) -> Option<String> {
        labeled_lines(text, &BIRTH_PLACE_LABEL)
            .filter_map(after_colon)
            .find_map(|value| clean_name(&VISA_TYPE_SUFFIX.replace(value.trim(), "")))
    }

    fn passport_no(text: &str) -> Option<String> {
        labeled_lines(text, &PASSPORT_LABEL).find_map(|line| {
            let value = line.find(':').map_or(line, |idx| &line[idx + 1..]);
            PASSPORT_TOKEN
                .find_iter(value)
                .map(|m| m.as_str())
                .find(|token| token.chars().any(|c| c.is_ascii_digit()))
                .map(str::to_string)
        })
    }
}

impl Default for EvlnExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for EvlnExtractor {
    fn document_type(&self) -> DocumentType {
        DocumentType::Evln
    }

    fn extract(&self, text: &str) -> Result<ExtractedRecord> {
        let mut record = ExtractedRecord::new(DocumentType::Evln);

        let name = Self::greeting_name(text).or_else(|| Self::labeled_name(text));
        record.set("Name", name);
        record.set("Place of Birth", Self::birth_place(text));

        let birth = labeled_lines(text, &BIRTH_DATE_LABEL).find_map(first_date);
        let expiry = labeled_lines(text, &EXPIRY_LABEL).find_map(first_date);
        record.set("Date of Birth", birth.clone());
        record.set("Passport No", Self::passport_no(text));
        record.set("Passport Expiry", expiry.clone());

        let ctx = IssueContext {
            birth,
            expiry,
            years: self.issue_years.clone(),
        };
        record.set("Date Issue", first_success(&ISSUE_DATE_STRATEGIES, text, &ctx));

        debug!("EVLN: {} fields populated", record.populated_count());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
VISA APPROVAL
Dear Mr.
ZHANG WEI
Your visa application has been approved.
Place of Birth : SHANGHAI Visa Type : C312
Date of Birth : 12/04/1988
Passport No : EA1234567
Passport Expiry : 01-06-2030
Date of issue : 03/02/2024
";

    #[test]
    fn test_extract_sample() {
        let record = EvlnExtractor::new().extract(SAMPLE).unwrap();

        assert_eq!(record.get("Name"), Some("ZHANG WEI"));
        assert_eq!(record.get("Place of Birth"), Some("SHANGHAI"));
        assert_eq!(record.get("Date of Birth"), Some("12/04/1988"));
        assert_eq!(record.get("Passport No"), Some("EA1234567"));
        assert_eq!(record.get("Passport Expiry"), Some("01/06/2030"));
        assert_eq!(record.get("Date Issue"), Some("03/02/2024"));
    }

    #[test]
    fn test_labeled_name_when_greeting_line_is_implausible() {
        let text = "Dear\nX\nName : li-na chen\n";
        let record = EvlnExtractor::new().extract(text).unwrap();
        assert_eq!(record.get("Name"), Some("LI-NA CHEN"));
    }

    #[test]
    fn test_issue_date_from_issued_phrase() {
        let text = "Passport Expiry : 01/06/2030\nIssued on 15-08-2023\n";
        let record = EvlnExtractor::new().extract(text).unwrap();
        assert_eq!(record.get("Date Issue"), Some("15/08/2023"));
    }

    #[test]
    fn test_issue_date_plausible_year_fallback() {
        let text = "\
Date of Birth : 12/04/1988
Passport Expiry : 01/06/2030
Reference 07/09/2022
";
        let record = EvlnExtractor::new().extract(text).unwrap();
        assert_eq!(record.get("Date Issue"), Some("07/09/2022"));
    }

    #[test]
    fn test_plausible_year_skips_known_dates() {
        let text = "Passport Expiry : 01/06/2024\nprinted 01/06/2024\n";
        let record = EvlnExtractor::new().extract(text).unwrap();
        assert_eq!(record.get("Date Issue"), None);

        let wide = EvlnExtractor::new().with_issue_years(2020..=2035);
        let record = wide.extract("valid until 01/06/2031").unwrap();
        assert_eq!(record.get("Date Issue"), Some("01/06/2031"));
    }

    #[test]
    fn test_empty_text() {
        let record = EvlnExtractor::new().extract("").unwrap();
        assert_eq!(record.document_type(), "EVLN");
        assert_eq!(record.populated_count(), 0);
    }

    #[test]
    fn test_greeting_name_length_bounds() {
        let cases = [
            (3, "FALLBACK NAME".to_string()),
            (4, "A".repeat(4)),
            (49, "A".repeat(49)),
            (50, "FALLBACK NAME".to_string()),
        ];
        for (len, expected) in cases {
            let text = format!("Dear Sir\n{}\nName : FALLBACK NAME", "A".repeat(len));
            let record = EvlnExtractor::new().extract(&text).unwrap();
            assert_eq!(record.get("Name"), Some(expected.as_str()), "length {}", len);
        }
    }

    #[test]
    fn test_month_name_dates() {
        let text = "\
Date of Birth : 12 April 1988
Passport Expiry : 10 December 2030
";
        let record = EvlnExtractor::new().extract(text).unwrap();
        assert_eq!(record.get("Date of Birth"), Some("12/04/1988"));
        assert_eq!(record.get("Passport Expiry"), Some("10/12/2030"));
    }
}
