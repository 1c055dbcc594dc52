//! Web search for grounding answers.
//!
//! - [`WebSearch`]: the seam the planner depends on; infallible by contract
//! - DuckDuckGo HTML endpoint client (`duckduckgo`), scoped with `site:`
//! - Result-page extraction with CSS selectors (`extract`)

pub mod duckduckgo;
pub mod extract;

use async_trait::async_trait;
use chatskcet_common::SearchResult;

pub use duckduckgo::{DuckDuckGoSearch, SearchSettings};
pub use extract::ResultExtractor;

/// A best-effort search backend.
///
/// Implementations log and swallow their own failures: callers cannot tell
/// "no results" apart from "search failed", and never need to.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, query: &str) -> Vec<SearchResult>;
}
