//! Bilingual on-page label variants for the search filters.
//!
//! The site renders its filter controls in Portuguese regardless of how the
//! criteria were supplied, so each control is matched by partial text against
//! every known label variant of the requested value. The known criteria
//! values are covered by a static table; a live translation call is only the
//! fallback for values outside it, and a failed translation falls back to
//! the untranslated value.

use crate::models::{Category, DateFilter};
use crate::translate::{translate_or_original, Translate};

/// Label variants for the sort-by-recency control.
pub const RECENCY_LABELS: &[&str] = &["Recente", "Recent"];

/// Known on-page label variants for a category value.
pub fn category_labels(category: Category) -> &'static [&'static str] {
    match category {
        Category::All => &["Todos os resultados", "All results"],
        Category::News => &["Notícias", "news"],
        Category::Photos => &["Fotos", "photos"],
        Category::Videos => &["Vídeos", "Videos"],
        Category::Blogs => &["Blogs", "blogs"],
    }
}

/// Known on-page label variants for a date-filter value.
pub fn date_filter_labels(filter: DateFilter) -> &'static [&'static str] {
    match filter {
        DateFilter::Anytime => &["Em qualquer data", "Anytime"],
        DateFilter::LastMinute => &["No último minuto", "At the last minute"],
        DateFilter::Last24Hours => &["Nas últimas 24 horas", "In the last 24 hours"],
        DateFilter::Week => &["Na última semana", "Last week"],
        DateFilter::Month => &["No último mês", "In the last month"],
        DateFilter::Year => &["No último ano", "In the last year"],
    }
}

/// Resolve the label variants to match for an arbitrary criteria value.
///
/// Values covered by the static table never touch the network. For anything
/// else, the variants are the value itself plus its machine translation into
/// the site language (which degrades to the value itself when the
/// translation service is unavailable).
pub fn resolve_label_variants(value: &str, translator: &dyn Translate) -> Vec<String> {
    if let Some(category) = Category::parse(value) {
        return category_labels(category).iter().map(|s| s.to_string()).collect();
    }
    if let Some(filter) = DateFilter::parse(value) {
        return date_filter_labels(filter).iter().map(|s| s.to_string()).collect();
    }
    let translated = translate_or_original(translator, value, "pt");
    if translated == value {
        vec![value.to_string()]
    } else {
        vec![value.to_string(), translated]
    }
}
