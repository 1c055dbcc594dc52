use crate::types::{ChatCompletion, ChatRequest};
use async_trait::async_trait;
use chatskcet_common::Result;

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Run one chat completion round trip.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatCompletion>;

    /// Short provider label used in logs.
    fn provider_name(&self) -> &str;
}
