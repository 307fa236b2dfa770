//! Browser-driven page navigation for the G1 search flow.
//!
//! [`ChromeNavigator`] owns the single browser session and its primary tab.
//! It drives the search box, the category/sort/date filter dropdowns, the
//! infinite-scroll result list, and the transient per-article tabs. Filter
//! controls are matched by partial span text against the bilingual label
//! variants from [`crate::labels`], because the site renders labels in
//! Portuguese while criteria may be supplied in English.
//!
//! Readiness is never assumed from a fixed sleep: page settles are bounded
//! polls over observable conditions (results list present, page height
//! stable).
//!
//! The [`Navigator`] trait is the seam the assembler works against, so the
//! extraction pipeline can be exercised with a stub instead of a browser.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, info, instrument, warn};

use crate::extract::{self, ArticleHandle, ArticleView};
use crate::labels::{self, RECENCY_LABELS};
use crate::models::{Category, DateFilter};
use crate::poll::{poll_until, PollConfig};
use crate::translate::Translate;

const PORTAL_URL: &str = "https://g1.globo.com/";
const COOKIE_BUTTON: &str = ".cookie-banner-lgpd_accept-button";
const SEARCH_BOX: &str = r#"input[type="search"]"#;
const RESULTS_LIST: &str = ".results__list";

const CATEGORY_TOGGLE: &str =
    r#"//*[@id="search-filter-component"]/div/div[1]/div/div/div[1]/div[1]/a/span[2]"#;
const ORDER_TOGGLE: &str =
    r#"//*[@id="search-filter-component"]/div/div[1]/div/div/div[1]/div[2]/a/span[2]"#;
const DATE_TOGGLE: &str =
    r#"//*[@id="search-filter-component"]/div/div[1]/div/div/div[2]/div/a/span[2]"#;

/// How long to wait for a filter control or the results list.
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(15);
/// How long to wait for the cookie-consent banner before assuming it is gone.
const COOKIE_TIMEOUT: Duration = Duration::from_secs(50);
/// Budget for each "did the page grow after scrolling" probe.
const SCROLL_SETTLE: PollConfig = PollConfig {
    timeout: Duration::from_secs(5),
    interval: Duration::from_millis(500),
};
/// Budget for the post-filter results reload.
const FILTER_SETTLE: PollConfig = PollConfig {
    timeout: Duration::from_secs(15),
    interval: Duration::from_millis(500),
};
/// How long to wait for an article page's headline.
const ARTICLE_TIMEOUT: Duration = Duration::from_secs(15);

/// The capability surface the extraction pipeline needs from the browser.
pub trait Navigator {
    fn search(&self, keyword: &str) -> Result<(), Box<dyn Error>>;
    fn select_category(&self, category: Category) -> Result<(), Box<dyn Error>>;
    fn sort_by_recency(&self) -> Result<(), Box<dyn Error>>;
    fn select_date_filter(&self, filter: DateFilter) -> Result<(), Box<dyn Error>>;
    /// Trigger lazy loading until the page height stops growing.
    fn scroll_until_stable(&self) -> Result<(), Box<dyn Error>>;
    fn list_article_handles(&self) -> Result<Vec<ArticleHandle>, Box<dyn Error>>;
    /// Open an article in a transient view, extract its fields, and return
    /// to the primary view on every exit path.
    fn open_article(&self, handle: &ArticleHandle) -> Result<ArticleView, Box<dyn Error>>;
}

/// Launch settings for the browser session.
#[derive(Debug, Default)]
pub struct NavigatorConfig {
    /// Browser binary to launch; `None` lets headless_chrome find one.
    pub browser_path: Option<PathBuf>,
    pub headless: bool,
}

/// Production navigator: one Chrome session, one primary tab.
pub struct ChromeNavigator {
    browser: Browser,
    tab: Arc<Tab>,
    translator: Box<dyn Translate>,
}

impl ChromeNavigator {
    /// Launch the browser, open the portal, and dismiss the cookie-consent
    /// banner if it shows up. A missing banner is not an error.
    #[instrument(level = "info", skip_all, fields(headless = config.headless))]
    pub fn open(
        config: NavigatorConfig,
        translator: Box<dyn Translate>,
    ) -> Result<Self, Box<dyn Error>> {
        let browser = Browser::new(LaunchOptions {
            headless: config.headless,
            window_size: Some((1920, 1080)),
            sandbox: false,
            path: config.browser_path,
            idle_browser_timeout: Duration::from_secs(600),
            ..Default::default()
        })?;

        let tab = browser.new_tab()?;
        tab.navigate_to(PORTAL_URL)?;
        tab.wait_until_navigated()?;
        info!(url = PORTAL_URL, "Portal loaded");

        match tab.wait_for_element_with_custom_timeout(COOKIE_BUTTON, COOKIE_TIMEOUT) {
            Ok(button) => {
                button.click()?;
                debug!("Accepted cookie banner");
            }
            Err(e) => debug!(error = %e, "No cookie banner to accept"),
        }

        Ok(Self {
            browser,
            tab,
            translator,
        })
    }

    /// Click whichever span carries one of the label variants, matched by
    /// partial text.
    fn click_span_with_label(&self, variants: &[String]) -> Result<(), Box<dyn Error>> {
        let condition = variants
            .iter()
            .map(|label| format!(r#"contains(text(),"{}")"#, label))
            .collect::<Vec<_>>()
            .join(" or ");
        let xpath = format!("//span[{}]", condition);
        self.tab.wait_for_xpath(&xpath)?.click()?;
        Ok(())
    }

    fn page_height(&self) -> Result<f64, Box<dyn Error>> {
        let result = self.tab.evaluate("document.body.scrollHeight", false)?;
        Ok(result.value.and_then(|v| v.as_f64()).unwrap_or(0.0))
    }

    /// Poll until the results list is present again after a filter change.
    fn wait_for_results(&self) -> Result<(), Box<dyn Error>> {
        let present = poll_until(FILTER_SETTLE, || {
            let probe = self.tab.evaluate(
                r#"document.querySelector(".results__list") !== null"#,
                false,
            )?;
            Ok(probe.value.and_then(|v| v.as_bool()).unwrap_or(false))
        })?;
        if !present {
            return Err("results list did not reappear after filter change".into());
        }
        Ok(())
    }
}

impl Navigator for ChromeNavigator {
    #[instrument(level = "info", skip(self))]
    fn search(&self, keyword: &str) -> Result<(), Box<dyn Error>> {
        let search_box = self
            .tab
            .wait_for_element_with_custom_timeout(SEARCH_BOX, ELEMENT_TIMEOUT)?;
        search_box.click()?;
        self.tab.type_str(keyword)?;
        self.tab.press_key("Enter")?;
        self.tab
            .wait_for_element_with_custom_timeout(RESULTS_LIST, ELEMENT_TIMEOUT)?;
        info!(keyword, "Search submitted");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    fn select_category(&self, category: Category) -> Result<(), Box<dyn Error>> {
        self.tab.wait_for_xpath(CATEGORY_TOGGLE)?.click()?;
        let variants = labels::resolve_label_variants(category.as_str(), self.translator.as_ref());
        self.click_span_with_label(&variants)?;
        self.wait_for_results()?;
        info!(category = category.as_str(), "Category selected");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    fn sort_by_recency(&self) -> Result<(), Box<dyn Error>> {
        self.tab.wait_for_xpath(ORDER_TOGGLE)?.click()?;
        let variants: Vec<String> = RECENCY_LABELS.iter().map(|s| s.to_string()).collect();
        self.click_span_with_label(&variants)?;
        self.wait_for_results()?;
        info!("Sorted by recency");
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    fn select_date_filter(&self, filter: DateFilter) -> Result<(), Box<dyn Error>> {
        self.tab.wait_for_xpath(DATE_TOGGLE)?.click()?;
        let variants = labels::resolve_label_variants(filter.as_str(), self.translator.as_ref());
        self.click_span_with_label(&variants)?;
        self.wait_for_results()?;
        info!(filter = filter.as_str(), "Date filter selected");
        Ok(())
    }

    /// Scroll to the bottom repeatedly; after each scroll, poll until the
    /// page height grows or the settle budget runs out. A pass where the
    /// height never grows means every lazy-loaded result is present.
    #[instrument(level = "info", skip(self))]
    fn scroll_until_stable(&self) -> Result<(), Box<dyn Error>> {
        let mut passes = 0u32;
        loop {
            let before = self.page_height()?;
            self.tab
                .evaluate("window.scrollTo(0, document.body.scrollHeight)", false)?;
            let grew = poll_until(SCROLL_SETTLE, || Ok(self.page_height()? > before))?;
            passes += 1;
            if !grew {
                info!(passes, height = before, "Page height stable; all results loaded");
                return Ok(());
            }
        }
    }

    fn list_article_handles(&self) -> Result<Vec<ArticleHandle>, Box<dyn Error>> {
        let html = self.tab.get_content()?;
        let handles = extract::parse_result_items(&html, &self.tab.get_url());
        info!(count = handles.len(), "Listed article handles");
        Ok(handles)
    }

    /// Open the article in a fresh tab, snapshot it, and close the tab
    /// before reporting either outcome, so the primary tab stays current
    /// even when extraction fails mid-way.
    #[instrument(level = "debug", skip_all, fields(url = %handle.url))]
    fn open_article(&self, handle: &ArticleHandle) -> Result<ArticleView, Box<dyn Error>> {
        let tab = self.browser.new_tab()?;
        let outcome = (|| -> Result<ArticleView, Box<dyn Error>> {
            tab.navigate_to(&handle.url)?;
            tab.wait_until_navigated()?;
            tab.wait_for_element_with_custom_timeout(
                r#"h1[class*="content-head__title"]"#,
                ARTICLE_TIMEOUT,
            )?;
            let html = tab.get_content()?;
            Ok(extract::parse_article_view(&html))
        })();
        if let Err(e) = tab.close(true) {
            warn!(error = %e, "Failed closing article tab");
        }
        outcome
    }
}
