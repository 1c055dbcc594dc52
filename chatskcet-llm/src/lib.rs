//! Completion API integration for ChatSKCET.
//!
//! This crate exposes a common [`traits::LlmClient`] interface, the chat
//! completion wire types with tool calling ([`types`]), and an
//! OpenAI-compatible implementation ([`openai::OpenAiClient`]) that talks to
//! Groq by default. [`ensure_llm_ready`] builds a client from a
//! [`chatskcet_common::LlmConfig`].
//!
//! # Examples
//! ```no_run
//! use chatskcet_common::{LlmConfig, Result};
//! use chatskcet_llm::ensure_llm_ready;
//! use chatskcet_llm::traits::LlmClient;
//!
//! # fn main() -> Result<()> {
//! let cfg = LlmConfig::OpenAi {
//!     api_key: "gsk_...".into(),
//!     base_url: None,
//!     timeout_secs: None,
//! };
//! let client = ensure_llm_ready(&cfg)?;
//! assert_eq!(client.provider_name(), "openai-compatible");
//! # Ok(())
//! # }
//! ```
pub mod openai;
pub mod traits;
pub mod types;

use chatskcet_common::{ChatError, LlmConfig};
use openai::OpenAiClient;
use std::sync::Arc;
use std::time::Duration;
use traits::LlmClient;

/// Model used to decide whether to search (must support tool calling).
pub const DEFAULT_PLANNER_MODEL: &str = "llama-3.3-70b-versatile";
/// Model used to write the grounded answer.
pub const DEFAULT_SYNTHESIS_MODEL: &str = "llama-3.1-8b-instant";

/// Build a completion client from configuration.
pub fn ensure_llm_ready(
    config: &LlmConfig,
) -> chatskcet_common::Result<Arc<dyn LlmClient + Send + Sync + 'static>> {
    match config {
        LlmConfig::OpenAi {
            api_key,
            base_url,
            timeout_secs,
        } => {
            let base = base_url.as_deref().unwrap_or(openai::GROQ_API_BASE);
            let mut client = OpenAiClient::new(api_key.clone(), base)?;
            if let Some(secs) = timeout_secs {
                client = client.with_timeout(Duration::from_secs(*secs));
            }
            Ok(Arc::new(client))
        }
        LlmConfig::None => Err(ChatError::Config("No LLM configured".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_provider_is_a_config_error() {
        let err = ensure_llm_ready(&LlmConfig::None).err().unwrap();
        assert!(matches!(err, ChatError::Config(_)));
    }

    #[test]
    fn empty_key_is_rejected_before_any_request() {
        let cfg = LlmConfig::OpenAi {
            api_key: "  ".into(),
            base_url: None,
            timeout_secs: None,
        };
        assert!(matches!(ensure_llm_ready(&cfg), Err(ChatError::Config(_))));
    }

    #[test]
    fn configured_provider_builds() {
        let cfg = LlmConfig::OpenAi {
            api_key: "gsk_test".into(),
            base_url: Some("http://127.0.0.1:9/openai/v1".into()),
            timeout_secs: Some(3),
        };
        let client = ensure_llm_ready(&cfg).unwrap();
        assert_eq!(client.provider_name(), "openai-compatible");
    }
}
