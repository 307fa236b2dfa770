//! Text classifiers for extracted article fields.
//!
//! These are pure functions applied to the title and (optional) description
//! of every article:
//! - [`count_occurrences`]: case-insensitive keyword counting
//! - [`contains_money`]: USD/BRL money-amount detection
//! - [`normalize_date`]: G1 timestamp text to canonical `DD/MM/YYYY`
//!
//! All three tolerate absent input: a missing description must classify as
//! "zero occurrences, no money" rather than fail the article.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Matches money amounts in either currency, case-insensitively:
/// `$1,200.50`, `100 dollars`, `100 USD`, `R$ 1.200,50`, `100 reais`, `100 BRL`.
static MONEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\$\s?\d{1,3}(?:,\d{3})*(?:\.\d{1,2})?|\d+\s?(?:dollars|USD)|R\$\s?\d{1,3}(?:\.\d{3})*(?:,\d{1,2})?|\d+\s?(?:reais|BRL)",
    )
    .unwrap()
});

/// Count case-insensitive, non-overlapping occurrences of `keyword` in `text`.
///
/// Absent text counts as an empty string, so the result is `0` rather than
/// an error. An empty keyword also counts as `0` occurrences.
///
/// # Arguments
///
/// * `text` - The text to search, if present
/// * `keyword` - The search keyword
///
/// # Examples
///
/// ```ignore
/// assert_eq!(count_occurrences(Some("Money money MONEY"), "money"), 3);
/// assert_eq!(count_occurrences(None, "money"), 0);
/// ```
pub fn count_occurrences(text: Option<&str>, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    let Some(text) = text else { return 0 };
    let haystack = text.to_lowercase();
    let needle = keyword.to_lowercase();
    haystack.matches(needle.as_str()).count()
}

/// Check whether `text` mentions a money amount in USD or BRL.
///
/// Recognized forms: `$` followed by comma-grouped digits with optional
/// decimals, digits followed by "dollars"/"USD", `R$` followed by
/// dot-grouped digits with comma decimals, and digits followed by
/// "reais"/"BRL". Absent text contains no money.
pub fn contains_money(text: Option<&str>) -> bool {
    text.is_some_and(|t| MONEY_PATTERN.is_match(t))
}

/// Normalize a G1 published-date string to `DD/MM/YYYY`.
///
/// G1 renders timestamps as `DD/MM/YYYY HHhMM` (e.g. `21/05/2024 14h30`).
/// The `h` separator is rewritten to `:` before parsing; the time component
/// is discarded.
///
/// # Returns
///
/// The canonical date string, or `None` when the input does not match the
/// expected format. Not every article carries a machine-parsable timestamp,
/// so unparseable input is a normal outcome, not an error.
pub fn normalize_date(raw: &str) -> Option<String> {
    let candidate = raw.trim().replace('h', ":");
    match NaiveDateTime::parse_from_str(&candidate, "%d/%m/%Y %H:%M") {
        Ok(parsed) => Some(parsed.format("%d/%m/%Y").to_string()),
        Err(e) => {
            debug!(raw, error = %e, "Published-date text did not parse; treating as absent");
            None
        }
    }
}
