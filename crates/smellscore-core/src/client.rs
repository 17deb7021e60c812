//! Scoring client: renders the prompt and calls the model backend.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::error::ProviderError;
use crate::model::ChecklistItem;
use crate::prompt::PromptTemplate;
use crate::traits::{GenerateRequest, GenerateResponse, LlmProvider};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

/// How failed model calls are retried. The default never retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first failure.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            retry_delay: Duration::from_secs(1),
        }
    }
}

/// Request parameters shared by every scoring call.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature (0.0 for reproducible reports).
    pub temperature: f64,
    /// Max tokens per response.
    pub max_tokens: u32,
    pub retry: RetryPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.0,
            max_tokens: 1024,
            retry: RetryPolicy::default(),
        }
    }
}

/// Sends one (checklist item, content) prompt at a time to a provider.
pub struct ScoringClient {
    provider: Arc<dyn LlmProvider>,
    template: PromptTemplate,
    options: ClientOptions,
}

impl ScoringClient {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        template: PromptTemplate,
        options: ClientOptions,
    ) -> Self {
        Self {
            provider,
            template,
            options,
        }
    }

    /// Render the prompt for `item` and `content` and return the model's raw
    /// answer.
    ///
    /// Transient provider errors are retried according to the retry policy;
    /// authentication and unknown-model errors are returned immediately.
    pub async fn score(&self, item: &ChecklistItem, content: &str) -> Result<GenerateResponse> {
        let request = GenerateRequest {
            model: self.options.model.clone(),
            prompt: self.template.render(item.as_str(), content),
            max_tokens: self.options.max_tokens,
            temperature: self.options.temperature,
        };

        let mut retry_delay = self.options.retry.retry_delay;
        let mut retries = 0u32;
        loop {
            match self.provider.generate(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    let provider_error = e.downcast_ref::<ProviderError>();
                    if retries >= self.options.retry.max_retries
                        || provider_error.is_some_and(ProviderError::is_permanent)
                    {
                        return Err(e);
                    }
                    if let Some(ms) = provider_error.and_then(ProviderError::retry_after_ms) {
                        retry_delay = Duration::from_millis(ms);
                    }
                    retries += 1;
                    tracing::warn!(
                        provider = self.provider.name(),
                        item = %item,
                        retry = retries,
                        "model call failed, retrying in {retry_delay:?}: {e:#}"
                    );
                    tokio::time::sleep(retry_delay).await;
                    retry_delay = (retry_delay * 2).min(MAX_RETRY_DELAY);
                }
            }
        }
    }
}
