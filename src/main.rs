//! # G1 News Report
//!
//! A browser-automation pipeline that searches the G1 news portal, extracts
//! structured data from every result, and writes an Excel report.
//!
//! ## Pipeline
//!
//! 1. **Provision**: detect or install the browser and its version-matched
//!    driver binary
//! 2. **Navigate**: search for the requested keyword, apply the category,
//!    recency, and date filters, then scroll until every lazy-loaded result
//!    is present
//! 3. **Extract**: open each article, download its images, classify the
//!    title and description (keyword counts, money mentions), normalize the
//!    published date
//! 4. **Report**: write one spreadsheet row per successfully extracted
//!    article to `output/News_Reports.xlsx`
//!
//! Search criteria come from a JSON work-items document; absent fields take
//! the documented defaults (`money` / `news` / `24h`).
//!
//! ## Usage
//!
//! ```sh
//! g1_news_report -w devdata/work-items.json -o output
//! ```

use clap::Parser;
use std::error::Error;
use std::fs;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod assemble;
mod assets;
mod classify;
mod cli;
mod extract;
mod labels;
mod models;
mod navigator;
mod poll;
mod provision;
mod report;
mod translate;
mod utils;

use assemble::assemble_all;
use assets::HttpImageFetcher;
use cli::Cli;
use models::{resolve_criteria, WorkItems};
use navigator::{ChromeNavigator, Navigator, NavigatorConfig};
use translate::HttpTranslator;
use utils::ensure_writable_dir;

const REPORT_FILENAME: &str = "News_Reports.xlsx";
const PHOTOS_DIRNAME: &str = "news_photos";

fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("g1_news_report starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.work_items, ?args.output_dir, "Parsed CLI arguments");

    // ---- Resolve criteria once, before any navigation ----
    let items: WorkItems = match fs::read_to_string(&args.work_items) {
        Ok(raw) => serde_json::from_str(&raw)?,
        Err(e) => {
            warn!(
                path = %args.work_items.display(),
                error = %e,
                "Work items document not readable; using default criteria"
            );
            WorkItems { payload: vec![] }
        }
    };
    let criteria = resolve_criteria(&items);
    info!(
        keyword = %criteria.keyword,
        category = criteria.category.as_str(),
        date_filter = criteria.date_filter.as_str(),
        "Resolved search criteria"
    );

    // Early check: ensure the output directories are writable
    let photos_dir = args.output_dir.join(PHOTOS_DIRNAME);
    if let Err(e) = ensure_writable_dir(&args.output_dir) {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }
    ensure_writable_dir(&photos_dir)?;

    let http = reqwest::blocking::Client::new();

    // ---- Provision browser and driver ----
    let browser_path = match &args.browser_path {
        Some(path) => {
            info!(path = %path.display(), "Using browser binary from CLI");
            path.clone()
        }
        None => provision::ensure_ready(&http)?,
    };

    // ---- Navigate: search, filter, scroll ----
    let navigator = ChromeNavigator::open(
        NavigatorConfig {
            browser_path: Some(browser_path),
            headless: args.headless,
        },
        Box::new(HttpTranslator::new(http.clone())),
    )?;

    navigator.search(&criteria.keyword)?;
    navigator.select_category(criteria.category)?;
    navigator.sort_by_recency()?;
    navigator.select_date_filter(criteria.date_filter)?;
    navigator.scroll_until_stable()?;

    let handles = navigator.list_article_handles()?;
    info!(count = handles.len(), "Articles to extract");

    // ---- Extract records, skipping broken articles ----
    let fetcher = HttpImageFetcher::new(http, &photos_dir);
    let records = assemble_all(&navigator, &fetcher, &handles, &criteria);

    // ---- Write the report ----
    let report_path = args.output_dir.join(REPORT_FILENAME);
    if let Err(e) = report::write_report(&records, &report_path) {
        error!(path = %report_path.display(), error = %e, "Failed to write report");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        articles = records.len(),
        "Execution complete"
    );

    Ok(())
}
