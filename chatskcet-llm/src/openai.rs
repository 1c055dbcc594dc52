use crate::traits::LlmClient;
use crate::types::{ChatCompletion, ChatRequest};
use async_trait::async_trait;
use chatskcet_common::{ChatError, Result};
use chatskcet_http::{HttpClient, HttpError};
use std::time::Duration;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1/";

const CHAT_COMPLETIONS_PATH: &str = "chat/completions";

/// Client for any OpenAI-compatible `chat/completions` endpoint.
pub struct OpenAiClient {
    client: HttpClient,
    api_key: String,
}

impl OpenAiClient {
    /// Create a client for the given API key and base URL.
    pub fn new(api_key: String, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ChatError::Config("completion API key is empty".to_string()));
        }
        let client = HttpClient::new(base_url)
            .map_err(|e| ChatError::Config(format!("HttpClient init failed: {e}")))?;

        Ok(Self { client, api_key })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion> {
        tracing::debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            temperature = request.temperature,
            "llm.chat.start"
        );

        let completion: ChatCompletion = self
            .client
            .post_json(CHAT_COMPLETIONS_PATH, Some(&self.api_key), request)
            .await
            .map_err(http_to_chat)?;

        tracing::debug!(
            model = ?completion.model,
            choices = completion.choices.len(),
            tool_calls = completion.tool_calls().len(),
            "llm.chat.done"
        );
        Ok(completion)
    }

    fn provider_name(&self) -> &str {
        "openai-compatible"
    }
}

fn http_to_chat(e: HttpError) -> ChatError {
    match e {
        HttpError::Timeout(_) => ChatError::Timeout,
        other => ChatError::Llm(other.to_string()),
    }
}
