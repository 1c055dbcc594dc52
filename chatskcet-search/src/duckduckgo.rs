//! Domain-restricted search against DuckDuckGo's HTML endpoint.

use crate::WebSearch;
use crate::extract::ResultExtractor;
use async_trait::async_trait;
use chatskcet_common::{ChatError, Result, SearchResult};
use chatskcet_http::{HttpClient, HttpError, RequestOpts};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use std::time::{Duration, Instant};

pub const DEFAULT_URL_TEMPLATE: &str = "https://html.duckduckgo.com/html/?q={query}";
pub const QUERY_PLACEHOLDER: &str = "{query}";
/// DuckDuckGo rejects requests without a browser-looking agent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
pub const DEFAULT_RESULT_LIMIT: usize = 5;

/// Settings for [`DuckDuckGoSearch`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub allowed_domain: String,
    pub url_template: String,
    pub user_agent: String,
    pub result_limit: usize,
    pub timeout: Duration,
}

impl SearchSettings {
    pub fn for_domain(allowed_domain: impl Into<String>) -> Self {
        Self {
            allowed_domain: allowed_domain.into(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            timeout: Duration::from_secs(20),
        }
    }
}

#[derive(Clone)]
pub struct DuckDuckGoSearch {
    http: HttpClient,
    extractor: ResultExtractor,
    settings: SearchSettings,
    headers: HeaderMap,
}

impl DuckDuckGoSearch {
    pub fn new(settings: SearchSettings) -> Result<Self> {
        if !settings.url_template.contains(QUERY_PLACEHOLDER) {
            return Err(ChatError::Config(format!(
                "search url_template must contain {QUERY_PLACEHOLDER}"
            )));
        }
        let base = settings.url_template.replace(QUERY_PLACEHOLDER, "");
        let http = HttpClient::new(&base)
            .map_err(|e| ChatError::Config(format!("search HttpClient init failed: {e}")))?
            .with_timeout(settings.timeout);

        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&settings.user_agent)
            .map_err(|e| ChatError::Config(format!("invalid user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);
        headers.insert(ACCEPT, HeaderValue::from_static("text/html"));

        Ok(Self {
            http,
            extractor: ResultExtractor::new(settings.allowed_domain.clone()),
            settings,
            headers,
        })
    }

    /// `<query> site:<domain>`, percent-encoded and placed into the template.
    pub fn search_url(&self, query: &str) -> String {
        let scoped = format!("{} site:{}", query, self.settings.allowed_domain);
        self.settings
            .url_template
            .replace(QUERY_PLACEHOLDER, &encode_component(&scoped))
    }

    /// Fetch and parse one result page, surfacing every failure.
    pub async fn try_search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = self.search_url(query);
        let started = Instant::now();
        tracing::info!(
            target: "search.duckduckgo",
            query = %query,
            domain = %self.settings.allowed_domain,
            "search.request.start"
        );

        let html = self
            .http
            .get_text(
                &url,
                RequestOpts {
                    headers: Some(self.headers.clone()),
                    allow_absolute: true,
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_chat)?;

        let results = self.extractor.extract(&html, self.settings.result_limit);
        tracing::info!(
            target: "search.duckduckgo",
            hit_count = results.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search.request.done"
        );
        Ok(results)
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(
                    target: "search.duckduckgo",
                    error = %e,
                    "search.failed"
                );
                Vec::new()
            }
        }
    }
}

/// Bytes `encodeURIComponent` leaves alone: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode like JavaScript's `encodeURIComponent` (space becomes `%20`).
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

fn http_to_chat(e: HttpError) -> ChatError {
    match e {
        HttpError::Timeout(_) => ChatError::Timeout,
        other => ChatError::Search(other.to_string()),
    }
}
