//! Data models for search criteria and extracted article records.
//!
//! This module defines:
//! - [`WorkItems`]: the JSON input document carrying requested criteria
//! - [`SearchCriteria`], [`Category`], [`DateFilter`]: the resolved,
//!   immutable inputs to a run
//! - [`ArticleRecord`]: one fully assembled row of the final report
//!
//! Criteria resolution is a pure function executed once, before any
//! navigation begins; nothing downstream ever re-derives a default.

use serde::Deserialize;
use tracing::warn;

/// The JSON input document: `{"payload": [{keyword, category, filter_date}]}`.
///
/// Absent or empty fields take the documented defaults. When the payload
/// carries multiple entries, only the **last** one is honored; this mirrors
/// the documented single-criteria behavior of the input format.
#[derive(Debug, Deserialize)]
pub struct WorkItems {
    #[serde(default)]
    pub payload: Vec<WorkItemEntry>,
}

/// One requested criteria entry. All fields optional; empty strings are
/// treated the same as absent fields.
#[derive(Debug, Default, Deserialize)]
pub struct WorkItemEntry {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub filter_date: Option<String>,
}

/// Result category on the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    News,
    Photos,
    Videos,
    Blogs,
}

impl Category {
    /// Parse a requested category token, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(Category::All),
            "news" => Some(Category::News),
            "photos" => Some(Category::Photos),
            "videos" => Some(Category::Videos),
            "blogs" => Some(Category::Blogs),
            _ => None,
        }
    }

    /// The canonical token, as accepted in the input document.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::News => "news",
            Category::Photos => "photos",
            Category::Videos => "videos",
            Category::Blogs => "blogs",
        }
    }
}

/// Publication-date filter on the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFilter {
    Anytime,
    LastMinute,
    Last24Hours,
    Week,
    Month,
    Year,
}

impl DateFilter {
    /// Parse a requested date-filter token, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "anytime" => Some(DateFilter::Anytime),
            "last-minute" => Some(DateFilter::LastMinute),
            "24h" => Some(DateFilter::Last24Hours),
            "week" => Some(DateFilter::Week),
            "month" => Some(DateFilter::Month),
            "year" => Some(DateFilter::Year),
            _ => None,
        }
    }

    /// The canonical token, as accepted in the input document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFilter::Anytime => "anytime",
            DateFilter::LastMinute => "last-minute",
            DateFilter::Last24Hours => "24h",
            DateFilter::Week => "week",
            DateFilter::Month => "month",
            DateFilter::Year => "year",
        }
    }
}

/// Immutable inputs to one run, resolved once from the work-items document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub keyword: String,
    pub category: Category,
    pub date_filter: DateFilter,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keyword: "money".to_string(),
            category: Category::News,
            date_filter: DateFilter::Last24Hours,
        }
    }
}

/// Resolve the effective [`SearchCriteria`] from the input document.
///
/// Every absent or empty field falls back to its default (`"money"` /
/// `news` / `24h`). Unrecognized category or filter tokens are logged and
/// replaced by the default rather than aborting the run. With multiple
/// payload entries, later entries overwrite earlier ones field-for-field,
/// so only the last entry is effective.
pub fn resolve_criteria(items: &WorkItems) -> SearchCriteria {
    let mut criteria = SearchCriteria::default();
    for entry in &items.payload {
        if let Some(keyword) = entry.keyword.as_deref().filter(|k| !k.trim().is_empty()) {
            criteria.keyword = keyword.trim().to_string();
        }
        if let Some(raw) = entry.category.as_deref().filter(|c| !c.trim().is_empty()) {
            match Category::parse(raw) {
                Some(category) => criteria.category = category,
                None => warn!(value = raw, "Unknown category in work items; using default"),
            }
        }
        if let Some(raw) = entry.filter_date.as_deref().filter(|f| !f.trim().is_empty()) {
            match DateFilter::parse(raw) {
                Some(filter) => criteria.date_filter = filter,
                None => warn!(value = raw, "Unknown date filter in work items; using default"),
            }
        }
    }
    criteria
}

/// One fully assembled article, immutable after assembly.
///
/// Keyword counts are case-insensitive substring counts; the money flags are
/// derived solely from the corresponding text field and are independent of
/// the keyword. `image_filenames` holds the successfully downloaded image
/// filenames in page order and is joined with `;` in the persisted report.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub date: Option<String>,
    pub title: String,
    pub title_count: usize,
    pub title_contains_money: bool,
    pub description: Option<String>,
    pub description_count: usize,
    pub description_contains_money: bool,
    pub image_filenames: Vec<String>,
}

impl ArticleRecord {
    /// The persisted form of the image list: semicolon-joined, empty when
    /// no image was downloaded.
    pub fn joined_image_filenames(&self) -> String {
        self.image_filenames.join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keyword: &str, category: &str, filter: &str) -> WorkItemEntry {
        WorkItemEntry {
            keyword: Some(keyword.to_string()),
            category: Some(category.to_string()),
            filter_date: Some(filter.to_string()),
        }
    }

    #[test]
    fn test_defaults_from_empty_payload() {
        let criteria = resolve_criteria(&WorkItems { payload: vec![] });
        assert_eq!(criteria, SearchCriteria::default());
        assert_eq!(criteria.keyword, "money");
        assert_eq!(criteria.category, Category::News);
        assert_eq!(criteria.date_filter, DateFilter::Last24Hours);
    }

    #[test]
    fn test_empty_fields_take_defaults() {
        let criteria = resolve_criteria(&WorkItems {
            payload: vec![entry("", "", "")],
        });
        assert_eq!(criteria, SearchCriteria::default());
    }

    #[test]
    fn test_last_entry_wins() {
        let criteria = resolve_criteria(&WorkItems {
            payload: vec![
                entry("first", "photos", "year"),
                entry("eleição", "news", "week"),
            ],
        });
        assert_eq!(criteria.keyword, "eleição");
        assert_eq!(criteria.category, Category::News);
        assert_eq!(criteria.date_filter, DateFilter::Week);
    }

    #[test]
    fn test_unknown_tokens_fall_back_to_defaults() {
        let criteria = resolve_criteria(&WorkItems {
            payload: vec![entry("storm", "sports", "fortnight")],
        });
        assert_eq!(criteria.keyword, "storm");
        assert_eq!(criteria.category, Category::News);
        assert_eq!(criteria.date_filter, DateFilter::Last24Hours);
    }

    #[test]
    fn test_token_parsing_is_case_insensitive() {
        assert_eq!(Category::parse("Videos"), Some(Category::Videos));
        assert_eq!(DateFilter::parse("WEEK"), Some(DateFilter::Week));
        assert_eq!(DateFilter::parse("24H"), Some(DateFilter::Last24Hours));
        assert_eq!(Category::parse("podcasts"), None);
    }

    #[test]
    fn test_work_items_deserialization() {
        let json = r#"{
            "payload": [
                {"keyword": "money", "category": "news", "filter_date": "24h"}
            ]
        }"#;
        let items: WorkItems = serde_json::from_str(json).unwrap();
        assert_eq!(items.payload.len(), 1);
        assert_eq!(items.payload[0].keyword.as_deref(), Some("money"));
    }

    #[test]
    fn test_work_items_tolerates_missing_fields() {
        let json = r#"{"payload": [{"keyword": "eleição"}]}"#;
        let items: WorkItems = serde_json::from_str(json).unwrap();
        let criteria = resolve_criteria(&items);
        assert_eq!(criteria.keyword, "eleição");
        assert_eq!(criteria.category, Category::News);
    }

    #[test]
    fn test_joined_image_filenames() {
        let record = ArticleRecord {
            date: None,
            title: "t".to_string(),
            title_count: 0,
            title_contains_money: false,
            description: None,
            description_count: 0,
            description_contains_money: false,
            image_filenames: vec!["a.jpg".to_string(), "b.png".to_string()],
        };
        assert_eq!(record.joined_image_filenames(), "a.jpg;b.png");
    }
}
