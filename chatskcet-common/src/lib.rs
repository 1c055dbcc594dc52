//! Common types and utilities shared across ChatSKCET crates.
//!
//! This crate defines the data that flows through the query-augmentation
//! pipeline, the provider configuration handed to the LLM crate, the shared
//! error type, and observability helpers. It stays dependency-light so every
//! crate in the workspace can depend on it.
//!
//! # Overview
//!
//! - [`SearchResult`] and [`Response`]: the records produced by a single
//!   request/response cycle
//! - [`LlmConfig`]: provider configuration for the completion API
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ChatError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use chatskcet_common::{Response, SearchResult};
//!
//! let hit = SearchResult::new(
//!     "https://skcet.ac.in/about",
//!     "About SKCET",
//!     "Sri Krishna College of Engineering and Technology",
//! );
//! let response = Response::new("SKCET is in Coimbatore.", vec![hit]);
//! assert_eq!(response.references.len(), 1);
//! ```
use serde::{Deserialize, Serialize};

pub mod observability;

/// One search hit scraped from a result page.
///
/// Only the HTML extractor creates these; every instance carries an absolute
/// URL inside the allowed domain plus a trimmed, non-empty title and snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

impl SearchResult {
    pub fn new(
        url: impl Into<String>,
        title: impl Into<String>,
        snippet: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Final answer for one user query together with the references that
/// grounded it, in search relevance order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub content: String,
    pub references: Vec<SearchResult>,
}

impl Response {
    pub fn new(content: impl Into<String>, references: Vec<SearchResult>) -> Self {
        Self {
            content: content.into(),
            references,
        }
    }
}

/// Configuration for the completion provider.
///
/// Only OpenAI-compatible chat completion endpoints are supported; Groq is
/// reached by pointing `base_url` at its `/openai/v1` prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum LlmConfig {
    OpenAi {
        api_key: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
    #[default]
    None,
}

/// Error types used across the ChatSKCET system.
#[derive(thiserror::Error, Debug)]
pub enum ChatError {
    /// The completion API could not be reached or rejected the request.
    #[error("LLM error: {0}")]
    Llm(String),

    /// The search engine could not be reached or returned an error status.
    #[error("Search error: {0}")]
    Search(String),

    /// The model requested a tool invocation we cannot honour.
    #[error("Tool call error: {0}")]
    ToolCall(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller supplied a query we refuse to process.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The synthesis model answered without any text.
    #[error("We have encountered some problem: the model returned no content")]
    EmptyCompletion,

    /// Operation exceeded the configured timeout.
    #[error("Timeout occurred")]
    Timeout,
}

/// Convenient alias for results that use [`ChatError`].
pub type Result<T> = std::result::Result<T, ChatError>;
