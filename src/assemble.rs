//! Record assembly: one article page into one [`ArticleRecord`].
//!
//! For each search-result handle the assembler downloads the card's images,
//! opens the article's detail view through the navigator, and classifies the
//! title and optional description. Failure policy, per article:
//!
//! - an image that fails to download is silently skipped (the record keeps
//!   the successful filenames in page order);
//! - a missing description means count 0 and no money flag, not an error;
//! - anything else (missing title, navigation timeout) fails the whole
//!   article: it is logged and skipped **entirely**, with no partial record
//!   and no effect on the articles after it.

use std::error::Error;

use tracing::{debug, info, warn};

use crate::assets::FetchImages;
use crate::classify::{contains_money, count_occurrences, normalize_date};
use crate::extract::ArticleHandle;
use crate::models::{ArticleRecord, SearchCriteria};
use crate::navigator::Navigator;

/// Assemble the record for a single article.
///
/// # Errors
///
/// Fails when the detail view cannot be opened or carries no title. Image
/// failures and a missing description are tolerated.
pub fn assemble(
    navigator: &dyn Navigator,
    fetcher: &dyn FetchImages,
    handle: &ArticleHandle,
    criteria: &SearchCriteria,
) -> Result<ArticleRecord, Box<dyn Error>> {
    let image_filenames: Vec<String> = handle
        .image_urls
        .iter()
        .filter_map(|url| fetcher.fetch(url))
        .collect();
    debug!(
        url = %handle.url,
        referenced = handle.image_urls.len(),
        downloaded = image_filenames.len(),
        "Fetched article images"
    );

    let view = navigator.open_article(handle)?;
    let title = view.title.ok_or("article page carries no title")?;

    let date = view.published.as_deref().and_then(normalize_date);
    let title_count = count_occurrences(Some(&title), &criteria.keyword);
    let title_contains_money = contains_money(Some(&title));
    let description_count = count_occurrences(view.description.as_deref(), &criteria.keyword);
    let description_contains_money = contains_money(view.description.as_deref());

    Ok(ArticleRecord {
        date,
        title,
        title_count,
        title_contains_money,
        description: view.description,
        description_count,
        description_contains_money,
        image_filenames,
    })
}

/// Assemble records for every handle, skipping broken articles.
///
/// A failing article is logged and dropped without a partial record; the
/// remaining handles are still processed. Output order is page-visit order.
pub fn assemble_all(
    navigator: &dyn Navigator,
    fetcher: &dyn FetchImages,
    handles: &[ArticleHandle],
    criteria: &SearchCriteria,
) -> Vec<ArticleRecord> {
    let mut records = Vec::new();
    for handle in handles {
        match assemble(navigator, fetcher, handle, criteria) {
            Ok(record) => records.push(record),
            Err(e) => warn!(url = %handle.url, error = %e, "Error processing article; skipping"),
        }
    }
    info!(
        total = handles.len(),
        assembled = records.len(),
        skipped = handles.len() - records.len(),
        "Assembled article records"
    );
    records
}
