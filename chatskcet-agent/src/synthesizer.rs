//! Produces the final answer from the query and whatever search turned up.

use chatskcet_common::{ChatError, Result, SearchResult};
use chatskcet_llm::traits::LlmClient;
use chatskcet_llm::types::{ChatMessage, ChatRequest};
use std::sync::Arc;

pub const SYNTHESIS_TEMPERATURE: f32 = 0.2;
pub const NO_RESULTS_MARKER: &str = "No search results found.";

/// Product prompt, kept word for word (including its spelling and spacing).
pub const DEFAULT_PERSONA: &str = "You are ChatSKCET, A Bot made to help solve user queries related to SKCET. \
SKCET stands for Shree Krishna College of Engineering and Technology. \
It is located  in Kuniyamuthur, Coimbatore, Tamil Nadu, India. \
The campus spans over a beautiful 52-acre area. \
It offers various Undergraduate (UG) and Postgraduate (PG) courses. \
All programs are approved by AICTE and affiliated to Anna University. \
SKCET boasts state-of-the-art facilities including modern laboratories, a well-stocked library, smart classrooms, sports facilities, and separate hostels for boys and girls. \
Answer the user's query based on the data given to you. \
Return only plain text (No Markdown).";

pub struct Synthesizer {
    llm: Arc<dyn LlmClient>,
    model: String,
    persona: String,
}

impl Synthesizer {
    pub fn new(llm: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            persona: DEFAULT_PERSONA.to_string(),
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    /// Persona, then a `Data:` block with the formatted results.
    pub fn system_prompt(&self, results: &[SearchResult]) -> String {
        format!("{}\n\nData:\n{}", self.persona, format_results(results))
    }

    pub fn request(&self, query: &str, results: &[SearchResult]) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![
                ChatMessage::system(self.system_prompt(results)),
                ChatMessage::user(query),
            ],
            SYNTHESIS_TEMPERATURE,
        )
    }

    pub async fn synthesize(&self, query: &str, results: &[SearchResult]) -> Result<String> {
        let completion = self.llm.chat(&self.request(query, results)).await?;
        match completion.text() {
            Some(text) => Ok(text.to_string()),
            None => Err(ChatError::EmptyCompletion),
        }
    }
}

/// `URL/Title/Snippet` blocks separated by blank lines.
pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MARKER.to_string();
    }
    results
        .iter()
        .map(|r| format!("URL: {}\nTitle: {}\nSnippet: {}\n", r.url, r.title, r.snippet))
        .collect::<Vec<_>>()
        .join("\n")
}
