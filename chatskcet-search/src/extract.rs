//! Result-page scraping for DuckDuckGo's HTML endpoint.
//!
//! Pure and infallible: selectors are compiled once, and a page without any
//! recognisable result containers simply yields no results.

use chatskcet_common::SearchResult;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

const RESULT_CONTAINER: &str = ".result__body";
const RESULT_URL: &str = ".result__url";
const RESULT_TITLE: &str = ".result__title a";
const RESULT_SNIPPET: &str = ".result__snippet";

struct ResultSelectors {
    container: Selector,
    url: Selector,
    title: Selector,
    snippet: Selector,
}

fn selectors() -> Option<&'static ResultSelectors> {
    static SELECTORS: OnceLock<Option<ResultSelectors>> = OnceLock::new();
    SELECTORS
        .get_or_init(|| {
            Some(ResultSelectors {
                container: Selector::parse(RESULT_CONTAINER).ok()?,
                url: Selector::parse(RESULT_URL).ok()?,
                title: Selector::parse(RESULT_TITLE).ok()?,
                snippet: Selector::parse(RESULT_SNIPPET).ok()?,
            })
        })
        .as_ref()
}

/// Turns a search result page into [`SearchResult`]s inside one domain.
#[derive(Debug, Clone)]
pub struct ResultExtractor {
    allowed_domain: String,
}

impl ResultExtractor {
    pub fn new(allowed_domain: impl Into<String>) -> Self {
        Self {
            allowed_domain: allowed_domain.into(),
        }
    }

    /// Extract at most `limit` results in document order.
    ///
    /// Containers missing a title or snippet are skipped, as are hits whose
    /// URL does not contain the allowed domain.
    pub fn extract(&self, html: &str, limit: usize) -> Vec<SearchResult> {
        if limit == 0 {
            return Vec::new();
        }
        let Some(sel) = selectors() else {
            tracing::error!("search.extract.selectors_invalid");
            return Vec::new();
        };

        let doc = Html::parse_document(html);
        let mut containers = 0usize;
        let results: Vec<SearchResult> = doc
            .select(&sel.container)
            .inspect(|_| containers += 1)
            .filter_map(|container| self.candidate(container, sel))
            .take(limit)
            .collect();

        tracing::debug!(
            containers,
            admitted = results.len(),
            limit,
            domain = %self.allowed_domain,
            "search.extract.done"
        );
        results
    }

    fn candidate(&self, container: ElementRef<'_>, sel: &ResultSelectors) -> Option<SearchResult> {
        let title = first_text(container, &sel.title)?;
        let snippet = first_text(container, &sel.snippet)?;
        let url = first_text(container, &sel.url)?;

        if !url.contains(self.allowed_domain.as_str()) {
            tracing::trace!(%url, "search.extract.off_domain");
            return None;
        }

        Some(SearchResult {
            url: normalize_url(&url),
            title,
            snippet,
        })
    }
}

/// Trimmed text of the first match, `None` if missing or blank.
fn first_text(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    let el = scope.select(selector).next()?;
    let text = el.text().collect::<String>();
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Prefix `https://` unless the URL already starts with `http`.
pub fn normalize_url(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    }
}
