//! Configuration management for Docent.
//!
//! Configuration is merged from several sources, later ones winning:
//! - Built-in defaults
//! - Config file (`.docent/config.yaml` in the workspace, or `DOCENT_CONFIG`)
//! - Environment variables
//! - Command-line flags (`AppConfig::with_overrides`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .docent/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider ("azure-openai" or "ollama")
    pub provider: String,

    /// Engine/deployment used for single-shot completions and query rewriting
    pub model: String,

    /// Engine/deployment used for the chat answer completion
    pub chat_model: String,

    /// API key for the completion provider
    pub api_key: Option<String>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,

    /// Completion provider configurations
    pub llm: Option<LlmConfig>,

    /// Search backend settings
    pub search: SearchConfig,

    /// Conversation history budget
    pub history: HistoryConfig,

    /// Iterative reasoning loop settings
    pub react: ReactConfig,
}

/// LLM configuration from config.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(rename = "activeProvider")]
    pub active_provider: String,

    pub providers: HashMap<String, ProviderConfig>,
}

/// Provider-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderConfig {
    AzureOpenAI {
        endpoint: String,
        #[serde(rename = "apiKeyEnv")]
        api_key_env: String,
        #[serde(rename = "apiVersion")]
        api_version: Option<String>,
        model: String,
        #[serde(rename = "chatModel")]
        chat_model: Option<String>,
    },
    Ollama {
        endpoint: String,
        model: String,
        #[serde(rename = "chatModel")]
        chat_model: Option<String>,
        timeout: Option<u64>,
    },
}

impl ProviderConfig {
    /// Endpoint of the provider.
    pub fn endpoint(&self) -> &str {
        match self {
            ProviderConfig::AzureOpenAI { endpoint, .. } => endpoint,
            ProviderConfig::Ollama { endpoint, .. } => endpoint,
        }
    }
}

/// Search backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    /// Backend name: "azure" or "memory"
    #[serde(default = "default_search_backend")]
    pub backend: String,

    /// Service endpoint (azure)
    pub endpoint: Option<String>,

    /// Index name (azure)
    pub index: Option<String>,

    /// Environment variable holding the search API key (azure)
    pub api_key_env: Option<String>,

    /// REST API version (azure)
    pub api_version: Option<String>,

    /// JSONL document file (memory)
    pub documents: Option<PathBuf>,

    /// Document field holding the source page identifier
    #[serde(default = "default_sourcepage_field")]
    pub sourcepage_field: String,

    /// Document field holding the passage content
    #[serde(default = "default_content_field")]
    pub content_field: String,

    /// Query language for semantic ranking
    #[serde(default = "default_query_language")]
    pub query_language: String,

    /// Speller for semantic ranking
    #[serde(default = "default_query_speller")]
    pub query_speller: String,

    /// Semantic configuration name
    #[serde(default = "default_semantic_configuration")]
    pub semantic_configuration: String,
}

fn default_search_backend() -> String {
    "azure".to_string()
}

fn default_sourcepage_field() -> String {
    "sourcepage".to_string()
}

fn default_content_field() -> String {
    "content".to_string()
}

fn default_query_language() -> String {
    "de-de".to_string()
}

fn default_query_speller() -> String {
    "lexicon".to_string()
}

fn default_semantic_configuration() -> String {
    "default".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_search_backend(),
            endpoint: None,
            index: None,
            api_key_env: None,
            api_version: None,
            documents: None,
            sourcepage_field: default_sourcepage_field(),
            content_field: default_content_field(),
            query_language: default_query_language(),
            query_speller: default_query_speller(),
            semantic_configuration: default_semantic_configuration(),
        }
    }
}

/// Approximate token budget for conversation transcripts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    #[serde(default = "default_history_max_tokens")]
    pub max_tokens: usize,

    /// Characters counted per token when converting the budget
    #[serde(default = "default_chars_per_token")]
    pub chars_per_token: usize,
}

fn default_history_max_tokens() -> usize {
    1000
}

fn default_chars_per_token() -> usize {
    4
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_tokens: default_history_max_tokens(),
            chars_per_token: default_chars_per_token(),
        }
    }
}

/// Iterative reasoning loop configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactConfig {
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

fn default_max_iterations() -> usize {
    15
}

impl Default for ReactConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmConfig>,
    search: Option<SearchConfig>,
    history: Option<HistoryConfig>,
    react: Option<ReactConfig>,
    workspace: Option<WorkspaceConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceConfig {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            provider: "azure-openai".to_string(),
            model: "davinci".to_string(),
            chat_model: "chat".to_string(),
            api_key: None,
            log_level: None,
            verbose: false,
            no_color: false,
            llm: None,
            search: SearchConfig::default(),
            history: HistoryConfig::default(),
            react: ReactConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `DOCENT_WORKSPACE`: Override workspace path
    /// - `DOCENT_CONFIG`: Path to config file
    /// - `DOCENT_PROVIDER`: Completion provider
    /// - `DOCENT_MODEL`: Completion engine/deployment
    /// - `DOCENT_CHAT_MODEL`: Chat engine/deployment
    /// - `DOCENT_API_KEY`: Completion API key
    /// - `DOCENT_SEARCH_ENDPOINT`, `DOCENT_SEARCH_INDEX`: Search service location
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use docent_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Workspace: {:?}", config.workspace);
    /// ```
    pub fn load() -> AppResult<Self> {
        Self::load_from(None, None)
    }

    /// Load configuration from an explicit workspace and config file.
    ///
    /// Given paths win over `DOCENT_WORKSPACE` and `DOCENT_CONFIG`, and decide
    /// which YAML file is merged.
    pub fn load_from(workspace: Option<PathBuf>, config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(workspace) =
            workspace.or_else(|| std::env::var("DOCENT_WORKSPACE").ok().map(PathBuf::from))
        {
            config.workspace = workspace;
        }

        config.config_file =
            config_file.or_else(|| std::env::var("DOCENT_CONFIG").ok().map(PathBuf::from));

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| config.docent_dir().join("config.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DOCENT_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DOCENT_MODEL") {
            config.model = model;
        }

        if let Ok(chat_model) = std::env::var("DOCENT_CHAT_MODEL") {
            config.chat_model = chat_model;
        }

        if let Ok(endpoint) = std::env::var("DOCENT_SEARCH_ENDPOINT") {
            config.search.endpoint = Some(endpoint);
        }

        if let Ok(index) = std::env::var("DOCENT_SEARCH_INDEX") {
            config.search.index = Some(index);
        }

        config.api_key = std::env::var("DOCENT_API_KEY").ok();
        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level = Some(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        Ok(self.merge_file(config_file))
    }

    fn merge_file(&self, config_file: ConfigFile) -> Self {
        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        if let Some(search) = config_file.search {
            result.search = search;
        }

        if let Some(history) = config_file.history {
            result.history = history;
        }

        if let Some(react) = config_file.react {
            result.react = react;
        }

        if let Some(llm) = config_file.llm {
            result.provider = llm.active_provider.clone();

            if let Some(provider_config) = llm.providers.get(&llm.active_provider) {
                let (model, chat_model) = match provider_config {
                    ProviderConfig::AzureOpenAI {
                        model, chat_model, ..
                    }
                    | ProviderConfig::Ollama {
                        model, chat_model, ..
                    } => (model, chat_model),
                };
                result.model = model.clone();
                result.chat_model = chat_model.clone().unwrap_or_else(|| model.clone());
            }

            result.llm = Some(llm);
        }

        result
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over environment variables.
    #[allow(clippy::too_many_arguments)]
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Get the path to the .docent directory.
    pub fn docent_dir(&self) -> PathBuf {
        self.workspace.join(".docent")
    }

    /// Get the configuration of a completion provider.
    pub fn get_provider_config(&self, provider: &str) -> Option<&ProviderConfig> {
        self.llm.as_ref().and_then(|llm| llm.providers.get(provider))
    }

    /// Resolve the completion API key.
    ///
    /// `DOCENT_API_KEY` wins; otherwise the provider's `apiKeyEnv` is read.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        if let Some(ref key) = self.api_key {
            return Some(key.clone());
        }

        match self.get_provider_config(provider) {
            Some(ProviderConfig::AzureOpenAI { api_key_env, .. }) => std::env::var(api_key_env).ok(),
            _ => None,
        }
    }

    /// Resolve the search API key from `DOCENT_SEARCH_API_KEY` or `search.apiKeyEnv`.
    pub fn resolve_search_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var("DOCENT_SEARCH_API_KEY") {
            return Some(key);
        }

        self.search
            .api_key_env
            .as_ref()
            .and_then(|env| std::env::var(env).ok())
    }

    /// Validate configuration for the active provider and search backend.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["azure-openai", "ollama"];
        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if let Some(ProviderConfig::AzureOpenAI { api_key_env, .. }) =
            self.get_provider_config(&self.provider)
        {
            if self.api_key.is_none() && std::env::var(api_key_env).is_err() {
                return Err(AppError::Config(format!(
                    "API key not found in environment variable: {}",
                    api_key_env
                )));
            }
        }

        match self.search.backend.as_str() {
            "azure" => {
                if self.search.endpoint.is_none() || self.search.index.is_none() {
                    return Err(AppError::Config(
                        "Azure search backend requires search.endpoint and search.index"
                            .to_string(),
                    ));
                }
            }
            "memory" => {
                if self.search.documents.is_none() {
                    return Err(AppError::Config(
                        "Memory search backend requires search.documents".to_string(),
                    ));
                }
            }
            other => {
                return Err(AppError::Config(format!(
                    "Unknown search backend: {}. Supported: azure, memory",
                    other
                )));
            }
        }

        if self.history.chars_per_token == 0 {
            return Err(AppError::Config(
                "history.charsPerToken must be positive".to_string(),
            ));
        }

        if self.react.max_iterations == 0 {
            return Err(AppError::Config(
                "react.maxIterations must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
