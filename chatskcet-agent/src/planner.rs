//! Decides whether a query needs web search, via a single declared tool.

use chatskcet_common::{ChatError, SearchResult};
use chatskcet_llm::traits::LlmClient;
use chatskcet_llm::types::{ChatCompletion, ChatMessage, ChatRequest, ToolChoice, ToolDefinition};
use chatskcet_search::WebSearch;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub const DEFAULT_TOOL_NAME: &str = "skcet_web_search";
pub const DEFAULT_TOOL_DESCRIPTION: &str = "Search the SKCET Website for information.";
/// Tool selection must be deterministic.
pub const PLANNER_TEMPERATURE: f32 = 0.0;

/// What the planning model asked for.
#[derive(Debug)]
pub enum PlannerOutcome {
    NoSearchRequested,
    SearchRequested(String),
    Failed(ChatError),
}

#[derive(Debug, Deserialize)]
struct SearchArguments {
    query: String,
}

pub struct Planner {
    llm: Arc<dyn LlmClient>,
    search: Arc<dyn WebSearch>,
    model: String,
    tool: ToolDefinition,
}

impl Planner {
    pub fn new(llm: Arc<dyn LlmClient>, search: Arc<dyn WebSearch>, model: impl Into<String>) -> Self {
        Self {
            llm,
            search,
            model: model.into(),
            tool: search_tool(DEFAULT_TOOL_NAME, DEFAULT_TOOL_DESCRIPTION),
        }
    }

    /// Rename the declared tool, e.g. for a different institution.
    pub fn with_tool(mut self, name: &str, description: &str) -> Self {
        self.tool = search_tool(name, description);
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool.function.name
    }

    pub fn request(&self, query: &str) -> ChatRequest {
        ChatRequest::new(
            self.model.clone(),
            vec![ChatMessage::user(query)],
            PLANNER_TEMPERATURE,
        )
        .with_tools(vec![self.tool.clone()], ToolChoice::Auto)
    }

    /// Ask the planning model whether to search and for what.
    pub async fn decide(&self, query: &str) -> PlannerOutcome {
        match self.llm.chat(&self.request(query)).await {
            Ok(completion) => self.interpret(&completion),
            Err(e) => PlannerOutcome::Failed(e),
        }
    }

    /// Map a planning completion onto an outcome. Only the first tool call counts.
    pub fn interpret(&self, completion: &ChatCompletion) -> PlannerOutcome {
        let Some(call) = completion.tool_calls().first() else {
            return PlannerOutcome::NoSearchRequested;
        };

        if call.function.name != self.tool_name() {
            return PlannerOutcome::Failed(ChatError::ToolCall(format!(
                "unexpected tool {:?}",
                call.function.name
            )));
        }

        match serde_json::from_str::<SearchArguments>(&call.function.arguments) {
            Ok(args) if !args.query.trim().is_empty() => {
                PlannerOutcome::SearchRequested(args.query.trim().to_string())
            }
            Ok(_) => PlannerOutcome::Failed(ChatError::ToolCall("empty query argument".into())),
            Err(e) => PlannerOutcome::Failed(ChatError::ToolCall(format!(
                "malformed arguments: {e}"
            ))),
        }
    }

    /// Search results for the query, or nothing. Never fails.
    pub async fn plan(&self, query: &str) -> Vec<SearchResult> {
        match self.decide(query).await {
            PlannerOutcome::SearchRequested(search_query) => {
                tracing::info!(search_query = %search_query, "planner.outcome.search");
                self.search.search(&search_query).await
            }
            PlannerOutcome::NoSearchRequested => {
                tracing::info!("planner.outcome.no_search");
                Vec::new()
            }
            PlannerOutcome::Failed(e) => {
                tracing::warn!(error = %e, "planner.outcome.failed");
                Vec::new()
            }
        }
    }
}

fn search_tool(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition::function(
        name,
        description,
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query to execute"
                }
            },
            "required": ["query"]
        }),
    )
}
