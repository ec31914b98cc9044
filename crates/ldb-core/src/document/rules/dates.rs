//! Date normalization to the canonical `DD/MM/YYYY` format.

use chrono::NaiveDate;

use super::patterns::{DATE_DMY, DATE_LONG, DATE_LONG_TOKEN, DATE_TOKEN, DATE_YMD};

/// Canonical output format for every recognized date.
pub const CANONICAL_FORMAT: &str = "%d/%m/%Y";

/// Month-name lookup table for one language.
#[derive(Debug)]
pub struct MonthTable {
    entries: &'static [(&'static str, u32)],
}

impl MonthTable {
    /// Look up a month name case-insensitively. A trailing dot is ignored.
    pub fn lookup(&self, name: &str) -> Option<u32> {
        let name = name.trim().trim_end_matches('.').to_lowercase();
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, month)| *month)
    }
}

/// Indonesian month names and common abbreviations.
pub static INDONESIAN: MonthTable = MonthTable {
    entries: &[
        ("januari", 1),
        ("jan", 1),
        ("februari", 2),
        ("feb", 2),
        ("pebruari", 2),
        ("maret", 3),
        ("mar", 3),
        ("april", 4),
        ("apr", 4),
        ("mei", 5),
        ("juni", 6),
        ("jun", 6),
        ("juli", 7),
        ("jul", 7),
        ("agustus", 8),
        ("agu", 8),
        ("agt", 8),
        ("ags", 8),
        ("september", 9),
        ("sep", 9),
        ("sept", 9),
        ("oktober", 10),
        ("okt", 10),
        ("november", 11),
        ("nov", 11),
        ("nopember", 11),
        ("desember", 12),
        ("des", 12),
    ],
};

/// English month names and common abbreviations.
pub static ENGLISH: MonthTable = MonthTable {
    entries: &[
        ("january", 1),
        ("jan", 1),
        ("february", 2),
        ("feb", 2),
        ("march", 3),
        ("mar", 3),
        ("april", 4),
        ("apr", 4),
        ("may", 5),
        ("june", 6),
        ("jun", 6),
        ("july", 7),
        ("jul", 7),
        ("august", 8),
        ("aug", 8),
        ("september", 9),
        ("sep", 9),
        ("sept", 9),
        ("october", 10),
        ("oct", 10),
        ("november", 11),
        ("nov", 11),
        ("december", 12),
        ("dec", 12),
    ],
};

/// Both tables, Indonesian first.
pub static BILINGUAL: [&MonthTable; 2] = [&INDONESIAN, &ENGLISH];

/// English first, for documents printed in English.
pub static ENGLISH_FIRST: [&MonthTable; 2] = [&ENGLISH, &INDONESIAN];

/// Resolve a month name against tables in order.
pub fn lookup_month(name: &str, tables: &[&MonthTable]) -> Option<u32> {
    tables.iter().find_map(|table| table.lookup(name))
}

/// Format a validated calendar date canonically.
fn canonical(year: i32, month: u32, day: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.format(CANONICAL_FORMAT).to_string())
}

/// Normalize a date substring to `DD/MM/YYYY`.
///
/// Accepts `D/M/YYYY`, `D-M-YYYY`, `D.M.YYYY`, `YYYY-MM-DD` and
/// `D <Month> YYYY` with month names from `tables`. Returns `None` for
/// anything that is not a real calendar date.
pub fn normalize_date(raw: &str, tables: &[&MonthTable]) -> Option<String> {
    let raw = raw.trim();

    if let Some(caps) = DATE_DMY.captures(raw) {
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        return canonical(year, month, day);
    }

    if let Some(caps) = DATE_YMD.captures(raw) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        return canonical(year, month, day);
    }

    if let Some(caps) = DATE_LONG.captures(raw) {
        let day = caps[1].parse().ok()?;
        let month = lookup_month(&caps[2], tables)?;
        let year = caps[3].parse().ok()?;
        return canonical(year, month, day);
    }

    None
}

/// Build a date from separately captured day, month name and year.
///
/// A month name missing from every table is passed through literally
/// (`05/Foo/2023`) instead of being guessed.
pub fn compose_date(day: &str, month: &str, year: &str, tables: &[&MonthTable]) -> Option<String> {
    let day: u32 = day.trim().parse().ok()?;
    let year: i32 = year.trim().parse().ok()?;

    match lookup_month(month, tables) {
        Some(month) => canonical(year, month, day),
        None => Some(format!("{:02}/{}/{}", day, month.trim(), year)),
    }
}

/// Find the first date token in `text` (numeric or with a month name) and normalize it.
pub fn find_date(text: &str, tables: &[&MonthTable]) -> Option<String> {
    let numeric = DATE_TOKEN.find(text);
    let long = DATE_LONG_TOKEN
        .find_iter(text)
        .find(|m| normalize_date(m.as_str(), tables).is_some());

    let first = match (numeric, long) {
        (Some(a), Some(b)) if b.start() < a.start() => b,
        (Some(a), _) => a,
        (None, Some(b)) => b,
        (None, None) => return None,
    };
    normalize_date(first.as_str(), tables)
}

/// All numeric date tokens in `text`, normalized, in order of appearance.
pub fn numeric_dates(text: &str) -> impl Iterator<Item = String> + '_ {
    DATE_TOKEN
        .find_iter(text)
        .filter_map(|m| normalize_date(m.as_str(), &[]))
}

/// Year component of a canonical `DD/MM/YYYY` date.
pub fn year_of(canonical: &str) -> Option<i32> {
    canonical.rsplit('/').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_converge() {
        for raw in ["05-03-2023", "05/03/2023", "5 Maret 2023", "5.3.2023", "2023-03-05"] {
            assert_eq!(
                normalize_date(raw, &BILINGUAL),
                Some("05/03/2023".to_string()),
                "input {raw}"
            );
        }
    }

    #[test]
    fn test_month_lookup_case_insensitive() {
        assert_eq!(INDONESIAN.lookup("AGUSTUS"), Some(8));
        assert_eq!(ENGLISH.lookup("december"), Some(12));
        assert_eq!(ENGLISH.lookup("Sept."), Some(9));
        assert_eq!(INDONESIAN.lookup("March"), None);
        assert_eq!(lookup_month("March", &BILINGUAL), Some(3));
    }

    #[test]
    fn test_invalid_dates_are_none() {
        assert_eq!(normalize_date("31/02/2023", &BILINGUAL), None);
        assert_eq!(normalize_date("5 Foo 2023", &BILINGUAL), None);
        assert_eq!(normalize_date("not a date", &BILINGUAL), None);
        assert_eq!(normalize_date("", &BILINGUAL), None);
    }

    #[test]
    fn test_english_month_needs_english_table() {
        assert_eq!(normalize_date("12 May 2024", &[&INDONESIAN]), None);
        assert_eq!(
            normalize_date("12 May 2024", &[&ENGLISH]),
            Some("12/05/2024".to_string())
        );
    }

    #[test]
    fn test_compose_date_passes_unknown_month_through() {
        assert_eq!(
            compose_date("5", "March", "2024", &ENGLISH_FIRST),
            Some("05/03/2024".to_string())
        );
        assert_eq!(
            compose_date("5", "Foo", "2023", &ENGLISH_FIRST),
            Some("05/Foo/2023".to_string())
        );
        assert_eq!(compose_date("31", "February", "2023", &ENGLISH_FIRST), None);
    }

    #[test]
    fn test_find_date_prefers_earliest() {
        let text = "born 1 January 1990, expires 02/03/2030";
        assert_eq!(find_date(text, &BILINGUAL), Some("01/01/1990".to_string()));
        assert_eq!(find_date("issued 02-03-2022", &BILINGUAL), Some("02/03/2022".to_string()));
        assert_eq!(find_date("no dates here", &BILINGUAL), None);
    }

    #[test]
    fn test_numeric_dates_and_year() {
        let dates: Vec<String> = numeric_dates("a 01/02/2020 b 99/99/2020 c 3-4-2021").collect();
        assert_eq!(dates, vec!["01/02/2020", "03/04/2021"]);
        assert_eq!(year_of("03/04/2021"), Some(2021));
    }
}
