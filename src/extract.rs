//! Pure HTML extraction for the G1 search-results and article pages.
//!
//! The navigator snapshots page HTML out of the live tab; everything after
//! that is plain `scraper` parsing, kept free of browser state so it can be
//! tested against fixture HTML.
//!
//! # Page structure
//!
//! - Search results render as `li.widget--card` items; each carries the
//!   article link and zero or more thumbnail images.
//! - The article page carries its headline in `h1.content-head__title`, an
//!   optional standfirst in `h2.content-head__subtitle`, and the publication
//!   timestamp in a `time[itemprop="datePublished"]` element.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static RESULT_ITEM: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"li[class*="widget--card"]"#).unwrap());
static ITEM_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static ITEM_IMAGE: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());
static ARTICLE_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h1[class*="content-head__title"]"#).unwrap());
static ARTICLE_SUBTITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h2[class*="content-head__subtitle"]"#).unwrap());
static ARTICLE_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"time[itemprop="datePublished"]"#).unwrap());

/// One search result: the article URL plus the thumbnail image URLs found
/// on the result card, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleHandle {
    pub url: String,
    pub image_urls: Vec<String>,
}

/// The raw fields visible on an article's detail page. All optional at this
/// layer; the assembler decides which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleView {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
}

/// Extract the article handles from a results-page snapshot.
///
/// Cards without a link are dropped; relative link and image URLs are
/// resolved against `base_url`.
pub fn parse_result_items(html: &str, base_url: &str) -> Vec<ArticleHandle> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let mut handles = Vec::new();
    for item in document.select(&RESULT_ITEM) {
        let Some(link) = item
            .select(&ITEM_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve(base.as_ref(), href))
        else {
            continue;
        };

        let image_urls = item
            .select(&ITEM_IMAGE)
            .filter_map(|img| img.value().attr("src"))
            .filter_map(|src| resolve(base.as_ref(), src))
            .collect();

        handles.push(ArticleHandle {
            url: link,
            image_urls,
        });
    }
    handles
}

/// Extract the visible fields from an article-page snapshot.
pub fn parse_article_view(html: &str) -> ArticleView {
    let document = Html::parse_document(html);
    ArticleView {
        title: first_text(&document, &ARTICLE_TITLE),
        description: first_text(&document, &ARTICLE_SUBTITLE),
        published: first_text(&document, &ARTICLE_DATE),
    }
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().and_then(element_text)
}

fn element_text(element: ElementRef) -> Option<String> {
    let text = element.text().collect::<Vec<_>>().join(" ");
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() { None } else { Some(text) }
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    match base {
        Some(base) => base.join(href).ok().map(|u| u.to_string()),
        None => Url::parse(href).ok().map(|u| u.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body><ul class="results__list">
          <li class="widget widget--card widget--info">
            <a href="https://g1.globo.com/politica/noticia/2024/05/21/a.ghtml">A</a>
            <img src="https://s2.glbimg.com/thumb-a.jpg">
          </li>
          <li class="widget widget--card">
            <a href="/economia/noticia/b.ghtml">B</a>
            <img src="//s2.glbimg.com/thumb-b1.jpg">
            <img src="https://s2.glbimg.com/thumb-b2.jpg">
          </li>
          <li class="widget widget--card">
            <span>card with no link is dropped</span>
          </li>
          <li class="widget widget--ad">
            <a href="https://ads.example.com/x">not a card</a>
          </li>
        </ul></body></html>
    "#;

    #[test]
    fn test_parse_result_items() {
        let handles = parse_result_items(RESULTS_PAGE, "https://g1.globo.com/busca/");
        assert_eq!(handles.len(), 2);

        assert_eq!(
            handles[0].url,
            "https://g1.globo.com/politica/noticia/2024/05/21/a.ghtml"
        );
        assert_eq!(handles[0].image_urls, vec!["https://s2.glbimg.com/thumb-a.jpg"]);

        // relative link and protocol-relative image resolved against the base
        assert_eq!(handles[1].url, "https://g1.globo.com/economia/noticia/b.ghtml");
        assert_eq!(
            handles[1].image_urls,
            vec![
                "https://s2.glbimg.com/thumb-b1.jpg",
                "https://s2.glbimg.com/thumb-b2.jpg"
            ]
        );
    }

    #[test]
    fn test_parse_article_view_full() {
        let html = r#"
            <html><body>
              <h1 class="content-head__title">Governo anuncia R$ 2 bilhões</h1>
              <h2 class="content-head__subtitle">Verba sai neste ano</h2>
              <time itemprop="datePublished">21/05/2024 14h30</time>
            </body></html>
        "#;
        let view = parse_article_view(html);
        assert_eq!(view.title.as_deref(), Some("Governo anuncia R$ 2 bilhões"));
        assert_eq!(view.description.as_deref(), Some("Verba sai neste ano"));
        assert_eq!(view.published.as_deref(), Some("21/05/2024 14h30"));
    }

    #[test]
    fn test_parse_article_view_missing_optionals() {
        let html = r#"<html><body><h1 class="content-head__title">Só título</h1></body></html>"#;
        let view = parse_article_view(html);
        assert_eq!(view.title.as_deref(), Some("Só título"));
        assert_eq!(view.description, None);
        assert_eq!(view.published, None);
    }

    #[test]
    fn test_parse_article_view_collapses_whitespace() {
        let html = "<html><body><h1 class=\"content-head__title\">  Um \n  título  </h1></body></html>";
        let view = parse_article_view(html);
        assert_eq!(view.title.as_deref(), Some("Um título"));
    }
}
