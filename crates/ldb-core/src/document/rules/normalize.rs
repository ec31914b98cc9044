//! Field normalizers applied to raw captured substrings.
//!
//! Every function here is pure and returns `None` when nothing useful
//! survives cleaning, so callers can store the result directly.

use super::dates::{normalize_date, BILINGUAL, INDONESIAN};
use super::patterns::TRAILING_DATE;

/// Collapse whitespace runs (including newlines) into single spaces.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim and collapse whitespace; empty becomes `None`.
pub fn trimmed(raw: &str) -> Option<String> {
    let value = collapse_whitespace(raw);
    (!value.is_empty()).then_some(value)
}

/// General-purpose cleaning: quotes and control whitespace become spaces.
pub fn clean_text(raw: &str) -> Option<String> {
    let replaced: String = raw
        .chars()
        .map(|c| match c {
            '"' | '\'' | '\n' | '\r' | '\t' => ' ',
            c => c,
        })
        .collect();
    trimmed(&replaced)
}

/// Clean a person or place name.
///
/// Only alphabetic characters, spaces and hyphens survive; any other
/// character acts as a separator. The result is uppercased.
pub fn clean_name(raw: &str) -> Option<String> {
    let filtered: String = raw
        .chars()
        .map(|c| if c.is_alphabetic() || c == '-' { c } else { ' ' })
        .collect();

    let words: Vec<String> = filtered
        .split_whitespace()
        .map(|w| w.trim_matches('-'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_uppercase())
        .collect();

    (!words.is_empty()).then(|| words.join(" "))
}

/// Uppercase after trimming.
pub fn upper(raw: &str) -> Option<String> {
    trimmed(raw).map(|v| v.to_uppercase())
}

/// Normalize a date using both Indonesian and English month names.
pub fn date(raw: &str) -> Option<String> {
    normalize_date(raw, &BILINGUAL)
}

/// Normalize a date using Indonesian month names only.
pub fn date_indonesian(raw: &str) -> Option<String> {
    normalize_date(raw, &[&INDONESIAN])
}

/// Keep only alphabetic and whitespace content; reject anything else.
pub fn alphabetic_text(raw: &str) -> Option<String> {
    if raw.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        trimmed(raw)
    } else {
        None
    }
}

/// Keep phone number characters: digits, `+`, `-` and parentheses.
pub fn phone(raw: &str) -> Option<String> {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')'))
        .collect();
    kept.chars().any(|c| c.is_ascii_digit()).then_some(kept)
}

/// Split `"PLACE, DATE"` into its components.
///
/// Splits on the last comma; without a comma a trailing date token is
/// detected instead. Empty components are returned as `None`.
pub fn split_birth_place_date(raw: &str) -> (Option<String>, Option<String>) {
    let raw = raw.trim();

    if let Some(idx) = raw.rfind(',') {
        return (trimmed(&raw[..idx]), trimmed(&raw[idx + 1..]));
    }

    if let Some(caps) = TRAILING_DATE.captures(raw) {
        return (trimmed(&caps[1]), trimmed(&caps[2]));
    }

    (trimmed(raw), None)
}
