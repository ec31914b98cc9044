//! Rule tables for document field extraction.
//!
//! Each document type is described as an ordered list of [`FieldRule`]s.
//! A rule holds alternative [`Pattern`]s tried in priority order; the first
//! one producing a non-empty, post-processed value wins.

pub mod dates;
pub mod normalize;
pub mod patterns;

use regex::Regex;
use tracing::trace;

use crate::error::ExtractionError;
use crate::models::record::ExtractedRecord;

use super::Result;

/// Post-processor applied to a raw capture.
pub type PostProcess = fn(&str) -> Option<String>;

/// Where a pattern is searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Search the whole text once.
    Text,
    /// Search each physical line; the first matching line wins.
    Line,
}

/// One candidate pattern for a field.
#[derive(Debug)]
pub struct Pattern {
    regex: Regex,
    group: usize,
    scope: Scope,
    stop: Option<Regex>,
    post: PostProcess,
}

impl Pattern {
    /// Create a whole-text pattern capturing group 1, trimmed.
    pub fn new(pattern: &str) -> Self {
        Self {
            regex: Regex::new(pattern).unwrap(),
            group: 1,
            scope: Scope::Text,
            stop: None,
            post: normalize::trimmed,
        }
    }

    /// Capture a different group.
    pub fn group(mut self, group: usize) -> Self {
        self.group = group;
        self
    }

    /// Search line by line, bounding the capture to one line.
    pub fn per_line(mut self) -> Self {
        self.scope = Scope::Line;
        self
    }

    /// Capture from the end of the match up to the first `stop` match.
    ///
    /// The value may wrap across lines. Without a following stop label the
    /// capture ends at the end of the label's line.
    pub fn until(mut self, stop: &str) -> Self {
        self.stop = Some(Regex::new(stop).unwrap());
        self
    }

    /// Set the post-processor.
    pub fn post(mut self, post: PostProcess) -> Self {
        self.post = post;
        self
    }

    /// Apply the pattern to `text`.
    pub fn apply(&self, field: &str, text: &str) -> Result<Option<String>> {
        match self.scope {
            Scope::Text => self.apply_once(field, text),
            Scope::Line => {
                for line in text.lines() {
                    if let Some(value) = self.apply_once(field, line)? {
                        return Ok(Some(value));
                    }
                }
                Ok(None)
            }
        }
    }

    fn apply_once(&self, field: &str, text: &str) -> Result<Option<String>> {
        let Some(caps) = self.regex.captures(text) else {
            return Ok(None);
        };

        let raw = match &self.stop {
            Some(stop) => {
                let whole = caps.get(0).ok_or_else(|| capture_error(field, 0))?;
                let rest = &text[whole.end()..];
                match stop.find(rest) {
                    Some(m) => &rest[..m.start()],
                    None => rest.lines().next().unwrap_or_default(),
                }
            }
            None => caps
                .get(self.group)
                .ok_or_else(|| capture_error(field, self.group))?
                .as_str(),
        };

        Ok((self.post)(raw))
    }
}

fn capture_error(field: &str, group: usize) -> ExtractionError {
    ExtractionError::Capture {
        field: field.to_string(),
        group,
    }
}

/// A field and its alternative patterns in priority order.
#[derive(Debug)]
pub struct FieldRule {
    pub field: &'static str,
    patterns: Vec<Pattern>,
}

impl FieldRule {
    pub fn new(field: &'static str, patterns: Vec<Pattern>) -> Self {
        Self { field, patterns }
    }

    /// First-match-wins evaluation of the alternatives.
    pub fn apply(&self, text: &str) -> Result<Option<String>> {
        for (index, pattern) in self.patterns.iter().enumerate() {
            if let Some(value) = pattern.apply(self.field, text)? {
                trace!("{} matched by alternative {}", self.field, index);
                return Ok(Some(value));
            }
        }
        Ok(None)
    }
}

/// Ordered rule table for one document layout.
#[derive(Debug)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<FieldRule>) -> Self {
        Self { rules }
    }

    /// Fill every still-null field of `record` the table has a rule for.
    pub fn apply(&self, text: &str, record: &mut ExtractedRecord) -> Result<usize> {
        let mut populated = 0;
        for rule in &self.rules {
            if record.get(rule.field).is_some() {
                continue;
            }
            if record.set_if_absent(rule.field, rule.apply(text)?) {
                populated += 1;
            }
        }
        Ok(populated)
    }
}

/// A named fallback strategy in a cascade.
pub type Strategy<C> = (&'static str, fn(&str, &C) -> Option<String>);

/// Evaluate strategies lazily in order; the first `Some` wins.
pub fn first_success<C>(strategies: &[Strategy<C>], text: &str, ctx: &C) -> Option<String> {
    strategies.iter().find_map(|(name, strategy)| {
        let value = strategy(text, ctx)?;
        trace!("strategy {} produced {:?}", name, value);
        Some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentType;

    #[test]
    fn test_first_pattern_wins() {
        let rule = FieldRule::new(
            "Name",
            vec![
                Pattern::new(r"Nama\s*:[ \t]*([^\n]+)"),
                Pattern::new(r"Name\s*:[ \t]*([^\n]+)"),
            ],
        );

        assert_eq!(
            rule.apply("Name : B\nNama : A").unwrap(),
            Some("A".to_string())
        );
        assert_eq!(rule.apply("Name : B").unwrap(), Some("B".to_string()));
        assert_eq!(rule.apply("nothing").unwrap(), None);
    }

    #[test]
    fn test_empty_post_processed_value_falls_through() {
        let rule = FieldRule::new(
            "Name",
            vec![
                Pattern::new(r"Nama\s*:[ \t]*([^\n]*)").post(normalize::clean_name),
                Pattern::new(r"Name\s*:[ \t]*([^\n]+)"),
            ],
        );
        assert_eq!(
            rule.apply("Nama : 1234\nName : JOHN").unwrap(),
            Some("JOHN".to_string())
        );
    }

    #[test]
    fn test_per_line_scope_stays_on_line() {
        let text = "Address :\nOccupation : ENGINEER";
        let whole = Pattern::new(r"Address\s*:\s*(.+)");
        let line = Pattern::new(r"Address\s*:\s*(.+)").per_line();

        assert_eq!(
            whole.apply("Address", text).unwrap(),
            Some("Occupation : ENGINEER".to_string())
        );
        assert_eq!(line.apply("Address", text).unwrap(), None);
    }

    #[test]
    fn test_until_stop_label() {
        let pattern = Pattern::new(r"(?i)Nama\s+TKA\s*:[ \t]*").until(r"\n\s*(?:\d+\.|Tempat)");
        let text = "Nama TKA : ZHANG\n  WEI\n6. Tempat Lahir : X";
        assert_eq!(
            pattern.apply("Nama TKA", text).unwrap(),
            Some("ZHANG WEI".to_string())
        );
        assert_eq!(
            pattern.apply("Nama TKA", "Nama TKA : ZHANG WEI\nKanim : X").unwrap(),
            Some("ZHANG WEI".to_string())
        );
    }

    #[test]
    fn test_missing_group_is_an_error() {
        let pattern = Pattern::new(r"Name\s*:").group(3);
        assert_eq!(
            pattern.apply("Name", "Name : X"),
            Err(ExtractionError::Capture {
                field: "Name".to_string(),
                group: 3
            })
        );
    }

    #[test]
    fn test_rule_set_keeps_existing_values() {
        let rules = RuleSet::new(vec![FieldRule::new(
            "Name",
            vec![Pattern::new(r"Name\s*:[ \t]*([^\n]+)")],
        )]);
        let mut record = ExtractedRecord::new(DocumentType::Evln);
        record.set("Name", Some("FIRST".to_string()));

        assert_eq!(rules.apply("Name : SECOND", &mut record).unwrap(), 0);
        assert_eq!(record.get("Name"), Some("FIRST"));
    }

    #[test]
    fn test_first_success_is_lazy() {
        fn never(_: &str, _: &()) -> Option<String> {
            panic!("later strategies must not run");
        }
        fn found(_: &str, _: &()) -> Option<String> {
            Some("x".to_string())
        }
        fn missing(_: &str, _: &()) -> Option<String> {
            None
        }

        let strategies: [Strategy<()>; 3] = [("missing", missing), ("found", found), ("never", never)];
        assert_eq!(first_success(&strategies, "", &()), Some("x".to_string()));
    }
}
