use chatskcet_agent::{Assistant, Planner, Synthesizer};
use chatskcet_common::{ChatError, LlmConfig, Result};
use chatskcet_config::ChatConfig;
use chatskcet_llm::ensure_llm_ready;
use chatskcet_llm::traits::LlmClient;
use chatskcet_search::{DuckDuckGoSearch, WebSearch};
use std::sync::Arc;

pub const MISSING_KEY_MESSAGE: &str = "Please enter your Groq API Key.";

/// Builds assistants that share one search client and, when a key is
/// configured, one completion client.
#[derive(Clone)]
pub struct AssistantFactory {
    config: Arc<ChatConfig>,
    search: Arc<dyn WebSearch>,
    default_llm: Option<Arc<dyn LlmClient>>,
}

impl AssistantFactory {
    pub fn from_config(config: ChatConfig, api_key: Option<&str>) -> Result<Self> {
        let search: Arc<dyn WebSearch> = Arc::new(DuckDuckGoSearch::new(config.search_settings())?);
        let default_llm = match config.llm_config(api_key) {
            LlmConfig::None => {
                tracing::info!("assistant.factory.no_default_key");
                None
            }
            llm => {
                let client: Arc<dyn LlmClient> = ensure_llm_ready(&llm)?;
                Some(client)
            }
        };
        Ok(Self {
            config: Arc::new(config),
            search,
            default_llm,
        })
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// An assistant authenticated with `override_key`, or the default key.
    ///
    /// Fails with [`ChatError::Config`] when neither yields a usable client.
    pub fn assistant(&self, override_key: Option<&str>) -> Result<Assistant> {
        let llm = match override_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let client: Arc<dyn LlmClient> = ensure_llm_ready(&self.config.llm_config(Some(key)))?;
                client
            }
            None => self
                .default_llm
                .clone()
                .ok_or_else(|| ChatError::Config(MISSING_KEY_MESSAGE.into()))?,
        };

        let cfg = &self.config;
        let planner = Planner::new(llm.clone(), self.search.clone(), &cfg.llm.planner_model)
            .with_tool(&cfg.assistant.tool_name, &cfg.assistant.tool_description);
        let synthesizer =
            Synthesizer::new(llm, &cfg.llm.synthesis_model).with_persona(&cfg.assistant.persona);
        Ok(Assistant::new(planner, synthesizer))
    }
}
