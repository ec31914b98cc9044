//! Common regex patterns shared by the document extractors.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Whole-string date shapes (input already isolated)
    pub static ref DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[./\-](\d{1,2})[./\-](\d{4})$"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"^(\d{4})-(\d{1,2})-(\d{1,2})$"
    ).unwrap();

    pub static ref DATE_LONG: Regex = Regex::new(
        r"^(\d{1,2})[ \t]+([A-Za-z]+)\.?,?[ \t]+(\d{4})$"
    ).unwrap();

    // Date tokens embedded in running text
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"\b\d{1,2}[/\-]\d{1,2}[/\-]\d{4}\b"
    ).unwrap();

    pub static ref DATE_LONG_TOKEN: Regex = Regex::new(
        r"\b\d{1,2}[ \t]+[A-Za-z]{3,9}\.?[ \t]+\d{4}\b"
    ).unwrap();

    // "BEIJING, 05-03-1985" style place/date pairs without a comma
    pub static ref TRAILING_DATE: Regex = Regex::new(
        r"^(.*?)[ \t]+(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{4}|\d{1,2}[ \t]+[A-Za-z]+[ \t]+\d{4})$"
    ).unwrap();

    // Signature block: "Jakarta, 12 March 2024"
    pub static ref SIGNATURE_DATE: Regex = Regex::new(
        r"([A-Za-z]+),[ \t]*(\d{1,2})[ \t]+([A-Za-z]+)[ \t]+(\d{4})"
    ).unwrap();

    // Contact details
    pub static ref EMAIL: Regex = Regex::new(
        r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}"
    ).unwrap();

    pub static ref HAS_DIGIT: Regex = Regex::new(r"\d").unwrap();

    // Long numeric payment references
    pub static ref LONG_DIGITS: Regex = Regex::new(r"\b\d{12,}\b").unwrap();

    // Currency markers on amounts
    pub static ref CURRENCY: Regex = Regex::new(r"(?i)US\$|USD|\$").unwrap();
}
