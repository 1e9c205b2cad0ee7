//! Incident text normalization applied before prompting.
//!
//! Rewrites raw text into a canonical form in a fixed order: whitespace,
//! relative dates, time expressions, punctuation spacing. Later steps assume
//! the earlier ones ran (e.g. time rules expect single spaces).

use chrono::{Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};

/// A single ordered regex rewrite.
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl RewriteRule {
    fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern.replace_all(text, self.replacement).into_owned()
    }
}

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Relative-date tokens and how many days they lie before the reference day.
/// Longer phrases come first so "day before yesterday" is not eaten by "yesterday".
static RELATIVE_DATES: Lazy<Vec<(Regex, u64)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\b(?:day before yesterday|anteontem)\b").unwrap(), 2),
        (Regex::new(r"(?i)\b(?:yesterday|ontem)\b").unwrap(), 1),
        (Regex::new(r"(?i)\b(?:today|hoje)\b").unwrap(), 0),
    ]
});

/// Time-expression rules. Order matters: `HhMM` must run before `Hh`, and the
/// preposition rules expect times already rewritten to `H:MM`.
pub static TIME_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::new("hour_h_minutes", r"(?i)\b(\d{1,2})h(\d{2})\b", "${1}:${2}"),
        RewriteRule::new("hour_h", r"(?i)\b(\d{1,2})h\b", "${1}:00"),
        RewriteRule::new(
            "preposition_clock_time",
            r"(?i)\b(?:at|às)\s+(\d{1,2}:\d{2})\b",
            "${1}",
        ),
        RewriteRule::new("preposition_hour_h", r"(?i)\b(?:at|às)\s+(\d{1,2})h\b", "${1}:00"),
    ]
});

pub static PUNCTUATION_RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::new("comma_semicolon_spacing", r"([,;])\s*", "${1} "),
        RewriteRule::new("period_spacing", r"(\.+)\s*", "${1} "),
    ]
});

/// Rewrites incident text into its canonical form.
///
/// Relative dates resolve against `reference_date`, or the current local date
/// at call time when none is pinned.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    reference_date: Option<NaiveDate>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference_date(date: NaiveDate) -> Self {
        Self {
            reference_date: Some(date),
        }
    }

    pub fn normalize(&self, text: &str) -> String {
        let today = self
            .reference_date
            .unwrap_or_else(|| Local::now().date_naive());

        let text = collapse_whitespace(text);
        let text = replace_relative_dates(&text, today);
        let text = apply_rules(&text, &TIME_RULES);
        let text = apply_rules(&text, &PUNCTUATION_RULES);

        text.trim().to_string()
    }
}

/// Normalize against the current local date.
pub fn normalize(text: &str) -> String {
    TextNormalizer::new().normalize(text)
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text.trim(), " ").into_owned()
}

fn replace_relative_dates(text: &str, today: NaiveDate) -> String {
    let mut out = text.to_string();
    for (pattern, days_back) in RELATIVE_DATES.iter() {
        if let Some(date) = today.checked_sub_days(Days::new(*days_back)) {
            let date = date.format("%Y-%m-%d").to_string();
            out = pattern.replace_all(&out, NoExpand(&date)).into_owned();
        }
    }
    out
}

fn apply_rules(text: &str, rules: &[RewriteRule]) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, rule| rule.apply(&acc))
}
