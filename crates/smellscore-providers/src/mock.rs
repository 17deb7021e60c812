//! Mock provider for offline runs and tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use smellscore_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, TokenUsage};

/// Default answer: a well-formed response with a middling score.
pub const DEFAULT_MOCK_RESPONSE: &str = "分数: 5\n依据：模拟评分";

/// A mock LLM provider for exercising the scorer without real API calls.
///
/// Returns configurable responses based on prompt content matching. Rules
/// are checked in insertion order; the first substring found wins.
pub struct MockProvider {
    /// Prompt substring → response text.
    responses: Vec<(String, String)>,
    /// Response when no rule matches.
    default_response: String,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock with the given prompt→response rules.
    pub fn new(responses: Vec<(String, String)>) -> Self {
        Self {
            responses,
            default_response: DEFAULT_MOCK_RESPONSE.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            responses: Vec::new(),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        // Rough estimate: four bytes per token.
        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock".into(),
            prompt: prompt.into(),
            max_tokens: 100,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("分数: 9");

        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.content, "分数: 9");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching_uses_first_rule() {
        let provider = MockProvider::new(vec![
            ("重复代码".to_string(), "分数: 2".to_string()),
            ("代码".to_string(), "分数: 8".to_string()),
        ]);

        let resp = provider.generate(&request("检查项 '重复代码'")).await.unwrap();
        assert_eq!(resp.content, "分数: 2");

        let resp = provider.generate(&request("检查项 '不一致的代码风格'")).await.unwrap();
        assert_eq!(resp.content, "分数: 8");

        let resp = provider.generate(&request("检查项 '不好的命名'")).await.unwrap();
        assert_eq!(resp.content, DEFAULT_MOCK_RESPONSE);
        assert_eq!(provider.call_count(), 3);
    }
}
