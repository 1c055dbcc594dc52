#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use chatskcet_common::observability::{LogConfig, LogFormat};
use chatskcet_common::{ChatError, Result, SearchResult};
use chatskcet_llm::traits::LlmClient;
use chatskcet_llm::types::{ChatCompletion, ChatRequest};
use chatskcet_search::WebSearch;
use serde_json::json;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "chatskcet-agent-tests",
            emit_stderr: true,
            format: std::env::var("CHATSKCET_LOG_FORMAT")
                .map(|raw| LogFormat::from_name(&raw))
                .unwrap_or(LogFormat::Text),
            default_filter: "debug",
            log_dir: Some(std::env::temp_dir().join("chatskcet-agent-tests")),
        };

        chatskcet_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// Replays canned completions in order and records every request.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<ChatCompletion>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<ChatCompletion>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Llm("script exhausted".into())))
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Returns fixed results and records the queries it was asked.
#[derive(Default)]
pub struct RecordingSearch {
    results: Vec<SearchResult>,
    queries: Mutex<Vec<String>>,
}

impl RecordingSearch {
    pub fn returning(results: Vec<SearchResult>) -> Self {
        Self {
            results,
            queries: Mutex::default(),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearch for RecordingSearch {
    async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.queries.lock().unwrap().push(query.to_string());
        self.results.clone()
    }
}

pub fn text_completion(content: &str) -> ChatCompletion {
    serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }]
    }))
    .unwrap()
}

pub fn null_completion() -> ChatCompletion {
    serde_json::from_value(json!({
        "choices": [{ "message": { "role": "assistant", "content": null }, "finish_reason": "stop" }]
    }))
    .unwrap()
}

pub fn tool_call_completion(name: &str, arguments: &str) -> ChatCompletion {
    serde_json::from_value(json!({
        "choices": [{
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_0",
                    "type": "function",
                    "function": { "name": name, "arguments": arguments }
                }]
            },
            "finish_reason": "tool_calls"
        }]
    }))
    .unwrap()
}

pub fn skcet_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new(
            "https://skcet.ac.in/admissions",
            "Admissions | SKCET",
            "Admissions are through TNEA counselling.",
        ),
        SearchResult::new(
            "https://skcet.ac.in/hostel",
            "Hostel | SKCET",
            "Separate hostels for boys and girls.",
        ),
        SearchResult::new(
            "https://skcet.ac.in/placements",
            "Placements | SKCET",
            "Over 200 recruiters visit every year.",
        ),
    ]
}
