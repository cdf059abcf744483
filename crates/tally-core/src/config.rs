use crate::cache::DEFAULT_SIZE_LIMIT;
use crate::errors::ConfigError;
use crate::normalize::MatchStrategy;
use crate::options::ChoiceFormat;
use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

fn default_size_limit() -> u64 {
    DEFAULT_SIZE_LIMIT
}

fn default_trials() -> usize {
    crate::evaluator::DEFAULT_TRIALS
}

/// Settings fixed when an evaluator is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Model identifier; informational, recorded in logs and summaries.
    pub model: String,
    #[serde(default)]
    pub choice_format: ChoiceFormat,
    /// Resolve unmatched answers by embedding similarity. Requires an embedder.
    #[serde(default)]
    pub enable_choice_search: bool,
    /// Cache directory; caching is disabled when absent.
    #[serde(default)]
    pub cache_path: Option<PathBuf>,
    #[serde(default = "default_size_limit")]
    pub cache_size_limit: u64,
    #[serde(default = "MatchStrategy::default_order")]
    pub match_order: Vec<MatchStrategy>,
}

impl EvaluatorConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            choice_format: ChoiceFormat::default(),
            enable_choice_search: false,
            cache_path: None,
            cache_size_limit: DEFAULT_SIZE_LIMIT,
            match_order: MatchStrategy::default_order(),
        }
    }

    pub fn with_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = Some(path.into());
        self
    }

    pub fn with_choice_format(mut self, format: ChoiceFormat) -> Self {
        self.choice_format = format;
        self
    }

    pub fn with_choice_search(mut self, enabled: bool) -> Self {
        self.enable_choice_search = enabled;
        self
    }

    pub fn with_match_order(mut self, order: Vec<MatchStrategy>) -> Self {
        self.match_order = order;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAi {
        model: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
        #[serde(default)]
        temperature: f32,
        #[serde(default = "default_max_tokens")]
        max_tokens: u32,
    },
    Fake {
        #[serde(default)]
        responses: Vec<String>,
        #[serde(default = "default_fake_response")]
        response: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EmbedderConfig {
    OpenAi {
        #[serde(default = "default_embedding_model")]
        model: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
    },
    Fake {
        dims: usize,
    },
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    64
}

fn default_fake_response() -> String {
    "A".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

/// A complete evaluation run as described by a YAML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub version: u32,
    pub evaluator: EvaluatorConfig,
    pub provider: ProviderConfig,
    #[serde(default)]
    pub embedder: Option<EmbedderConfig>,
    #[serde(default)]
    pub prompt_template: Option<String>,
    /// Shuffled-order trials per item; 1 keeps the given order.
    #[serde(default = "default_trials")]
    pub trials: usize,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if self.trials == 0 {
            return Err(ConfigError("trials must be at least 1".into()));
        }
        if self.evaluator.enable_choice_search && self.embedder.is_none() {
            return Err(ConfigError(
                "enable_choice_search is set but no embedder is configured".into(),
            ));
        }
        if let Some(t) = &self.prompt_template {
            PromptTemplate::parse(t).map_err(|e| ConfigError(e.to_string()))?;
        }
        Ok(())
    }
}

pub fn parse_config(raw: &str) -> Result<RunConfig, ConfigError> {
    let cfg: RunConfig = serde_yaml::from_str(raw)
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

pub const SAMPLE_CONFIG: &str = r#"version: 1
evaluator:
  model: gpt-4o-mini
  choice_format: letter
  enable_choice_search: false
  cache_path: .tally/cache
  match_order: [exact, label, semantic, contains]
provider:
  kind: openai
  model: gpt-4o-mini
  temperature: 0.0
  max_tokens: 64
prompt_template: "Question: {question}\nOptions:\n{options}\nAnswer with the option's letter from the given choices directly."
trials: 3
seed: 42
"#;
