//! Configuration loading and provider factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use smellscore_core::client::{ClientOptions, RetryPolicy};
use smellscore_core::model::{default_checklist, ChecklistItem};
use smellscore_core::prompt::PromptTemplate;
use smellscore_core::splitter::{Splitter, DEFAULT_MAX_FRAGMENT_CHARS};
use smellscore_core::traits::LlmProvider;

use crate::mock::{MockProvider, DEFAULT_MOCK_RESPONSE};
use crate::openai::OpenAiProvider;

/// Name of the per-project config file.
pub const CONFIG_FILE_NAME: &str = "smellscore.toml";

/// Environment variable that overrides the OpenAI API key.
pub const OPENAI_KEY_ENV: &str = "SMELLSCORE_OPENAI_KEY";

/// Which backend answers the scoring prompts.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        #[serde(default = "default_openai_key")]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
        #[serde(default)]
        timeout_secs: Option<u64>,
    },
    Mock {
        #[serde(default)]
        response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
                timeout_secs,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .field("timeout_secs", timeout_secs)
                .finish(),
            ProviderConfig::Mock { response } => f
                .debug_struct("Mock")
                .field("response", response)
                .finish(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::OpenAI {
            api_key: default_openai_key(),
            base_url: None,
            org_id: None,
            timeout_secs: None,
        }
    }
}

fn default_openai_key() -> String {
    "${OPENAI_API_KEY}".to_string()
}

/// Top-level smellscore configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmellscoreConfig {
    /// Model backend.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature (0.0 for reproducible reports).
    #[serde(default)]
    pub temperature: f64,
    /// Max tokens per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Retries on transient provider errors. 0 disables retrying.
    #[serde(default)]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Fragment length bound in characters.
    #[serde(default = "default_max_fragment_chars")]
    pub max_fragment_chars: usize,
    /// Directory the `<name>_scores.txt` files are written to. Empty means
    /// the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Documents scored when none are given on the command line.
    #[serde(default = "default_files")]
    pub files: Vec<PathBuf>,
    /// Quality criteria, scored in this order.
    #[serde(default = "default_checklist")]
    pub checklist: Vec<ChecklistItem>,
    /// Prompt template override with `{checkitem}` and `{content}` placeholders.
    #[serde(default)]
    pub prompt_template: Option<PromptTemplate>,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_max_fragment_chars() -> usize {
    DEFAULT_MAX_FRAGMENT_CHARS
}
fn default_output_dir() -> PathBuf {
    PathBuf::new()
}
fn default_files() -> Vec<PathBuf> {
    ["doc.md", "doc_1.md", "doc_2.md"]
        .into_iter()
        .map(PathBuf::from)
        .collect()
}

impl Default for SmellscoreConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            max_retries: 0,
            retry_delay_ms: default_retry_delay(),
            max_fragment_chars: default_max_fragment_chars(),
            output_dir: default_output_dir(),
            files: default_files(),
            checklist: default_checklist(),
            prompt_template: None,
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    InvalidTemperature(f64),

    #[error("max_fragment_chars must be at least 1")]
    ZeroFragmentLength,

    #[error("model name is empty")]
    EmptyModel,
}

impl SmellscoreConfig {
    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidTemperature(self.temperature));
        }
        if self.max_fragment_chars == 0 {
            return Err(ConfigError::ZeroFragmentLength);
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::EmptyModel);
        }
        Ok(())
    }

    /// Request parameters for the scoring client.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            retry: RetryPolicy {
                max_retries: self.max_retries,
                retry_delay: Duration::from_millis(self.retry_delay_ms),
            },
        }
    }

    pub fn splitter(&self) -> Splitter {
        Splitter::new(self.max_fragment_chars)
    }

    pub fn template(&self) -> PromptTemplate {
        self.prompt_template.clone().unwrap_or_default()
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Unset variables expand to the empty string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            timeout_secs,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
            timeout_secs: *timeout_secs,
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load config from an explicit path, or search the well-known locations.
///
/// Search order without a path:
/// 1. `smellscore.toml` in the current directory
/// 2. `~/.config/smellscore/config.toml`
///
/// Falls back to the built-in defaults when neither exists. The
/// `SMELLSCORE_OPENAI_KEY` environment variable overrides the OpenAI key.
pub fn load_config_from(path: Option<&Path>) -> Result<SmellscoreConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => SmellscoreConfig::default(),
    };

    if let Ok(key) = std::env::var(OPENAI_KEY_ENV) {
        if let ProviderConfig::OpenAI { api_key, .. } = &mut config.provider {
            *api_key = key;
        }
    }

    config.provider = resolve_provider_config(&config.provider);
    config.validate()?;

    Ok(config)
}

/// Parse a TOML string into a config without touching the environment.
pub fn parse_config(content: &str) -> Result<SmellscoreConfig> {
    Ok(toml::from_str::<SmellscoreConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("smellscore"))
}

/// Create a provider instance from its configuration.
///
/// An empty API key is accepted here; the first request then fails with an
/// authentication error.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
            timeout_secs,
        } => {
            if api_key.is_empty() {
                tracing::warn!("no OpenAI API key configured; set OPENAI_API_KEY");
            }
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
                *timeout_secs,
            )?))
        }
        ProviderConfig::Mock { response } => Ok(Box::new(MockProvider::with_fixed_response(
            response.as_deref().unwrap_or(DEFAULT_MOCK_RESPONSE),
        ))),
    }
}
