//! Loader for ChatSKCET configuration with YAML + environment overlays.
//!
//! Sources merge in the order they are added, environment last:
//!
//! 1. built-in defaults (every field has one, so no file is needed)
//! 2. YAML files or inline snippets
//! 3. `CHATSKCET__<SECTION>__<FIELD>` environment variables
//!
//! String values may reference other environment variables as `${VAR}`;
//! references are expanded recursively after merging. Unknown variables are
//! left untouched, which is how an unset `${GROQ_API_KEY}` ends up meaning
//! "no key configured".
use chatskcet_agent::planner::{DEFAULT_TOOL_DESCRIPTION, DEFAULT_TOOL_NAME};
use chatskcet_agent::synthesizer::DEFAULT_PERSONA;
use chatskcet_common::LlmConfig;
use chatskcet_llm::openai::GROQ_API_BASE;
use chatskcet_llm::{DEFAULT_PLANNER_MODEL, DEFAULT_SYNTHESIS_MODEL};
use chatskcet_search::SearchSettings;
use chatskcet_search::duckduckgo::{
    DEFAULT_RESULT_LIMIT, DEFAULT_URL_TEMPLATE, DEFAULT_USER_AGENT, QUERY_PLACEHOLDER,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
pub const ENV_PREFIX: &str = "CHATSKCET";
pub const DEFAULT_GREETING: &str = "Hello! I'm your guide to Sri Krishna College of Engineering and Technology. How can I help you today?";

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error(transparent)]
    Source(#[from] ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub version: Option<String>,
    pub llm: LlmSection,
    pub search: SearchSection,
    pub assistant: AssistantSection,
    pub server: ServerSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub api_key: String,
    pub base_url: String,
    pub planner_model: String,
    pub synthesis_model: String,
    pub timeout_secs: u64,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            api_key: "${GROQ_API_KEY}".into(),
            base_url: GROQ_API_BASE.trim_end_matches('/').into(),
            planner_model: DEFAULT_PLANNER_MODEL.into(),
            synthesis_model: DEFAULT_SYNTHESIS_MODEL.into(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSection {
    pub allowed_domain: String,
    pub url_template: String,
    pub user_agent: String,
    pub result_limit: usize,
    pub timeout_secs: u64,
}

impl Default for SearchSection {
    fn default() -> Self {
        Self {
            allowed_domain: "skcet.ac.in".into(),
            url_template: DEFAULT_URL_TEMPLATE.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            result_limit: DEFAULT_RESULT_LIMIT,
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantSection {
    pub name: String,
    pub tool_name: String,
    pub tool_description: String,
    pub persona: String,
    pub greeting: String,
}

impl Default for AssistantSection {
    fn default() -> Self {
        Self {
            name: "ChatSKCET".into(),
            tool_name: DEFAULT_TOOL_NAME.into(),
            tool_description: DEFAULT_TOOL_DESCRIPTION.into(),
            persona: DEFAULT_PERSONA.into(),
            greeting: DEFAULT_GREETING.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".into(),
        }
    }
}

impl ChatConfig {
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.search.allowed_domain.trim().is_empty() {
            return Err(ConfigLoadError::Invalid(
                "search.allowed_domain must not be empty".into(),
            ));
        }
        if !self.search.url_template.contains(QUERY_PLACEHOLDER) {
            return Err(ConfigLoadError::Invalid(format!(
                "search.url_template must contain {QUERY_PLACEHOLDER}"
            )));
        }
        if self.search.result_limit == 0 {
            return Err(ConfigLoadError::Invalid(
                "search.result_limit must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// The configured key, unless it is blank or an unexpanded `${VAR}`.
    pub fn api_key(&self) -> Option<&str> {
        let key = self.llm.api_key.trim();
        (!key.is_empty() && !key.contains("${")).then_some(key)
    }

    /// Provider settings, with `override_key` taking precedence over the file.
    ///
    /// Returns [`LlmConfig::None`] when no usable key is available.
    pub fn llm_config(&self, override_key: Option<&str>) -> LlmConfig {
        let key = override_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| self.api_key());
        match key {
            Some(api_key) => LlmConfig::OpenAi {
                api_key: api_key.to_string(),
                base_url: Some(self.llm.base_url.clone()),
                timeout_secs: Some(self.llm.timeout_secs),
            },
            None => LlmConfig::None,
        }
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            allowed_domain: self.search.allowed_domain.clone(),
            url_template: self.search.url_template.clone(),
            user_agent: self.search.user_agent.clone(),
            result_limit: self.search.result_limit,
            timeout: Duration::from_secs(self.search.timeout_secs),
        }
    }

    /// YAML rendering with the API key masked.
    pub fn to_redacted_yaml(&self) -> Result<String, ConfigLoadError> {
        let mut shown = self.clone();
        if self.api_key().is_some() {
            shown.llm.api_key = "********".into();
        }
        serde_yaml::to_string(&shown).map_err(|e| ConfigLoadError::Invalid(e.to_string()))
    }
}

/// `~/.config/chatskcet/config.yaml` (platform equivalent), if a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("chatskcet").join("config.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

fn from_value(v: Value) -> Result<ChatConfig, ConfigError> {
    serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ChatConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for ChatConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatConfigLoader {
    /// Defaults plus `CHATSKCET__` env overrides; add files before loading.
    ///
    /// ```
    /// use chatskcet_config::ChatConfigLoader;
    ///
    /// let config = ChatConfigLoader::new()
    ///     .with_yaml_str("search:\n  result_limit: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.search.result_limit, 3);
    /// assert_eq!(config.search.allowed_domain, "skcet.ac.in");
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        }
    }

    /// Attach a required YAML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` references and validate.
    pub fn load(self) -> Result<ChatConfig, ConfigLoadError> {
        let cfg = self.builder.add_source(self.env).build()?;

        // Typed first: fills defaults, so `${VAR}` inside defaults expands too,
        // and lets `config` coerce scalars (`version: 1`, numeric env strings).
        let merged: ChatConfig = cfg.try_deserialize()?;
        let mut v = serde_json::to_value(&merged).map_err(|e| ConfigError::Message(e.to_string()))?;
        expand_env_in_value(&mut v);

        let typed: ChatConfig = from_value(v)?;
        typed.validate()?;
        Ok(typed)
    }
}
