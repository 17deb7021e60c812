//! Prompt template rendering.

use serde::{Deserialize, Serialize};

/// Reviewer prompt asking for a 1-10 score per checklist item.
pub const DEFAULT_TEMPLATE: &str = "
你是一个专业的内容评审员。请根据检查项 '{checkitem}' 对给定的 Markdown 内容进行评分：

内容：
{content}

请为该部分内容根据检查项 '{checkitem}' 打分（1-10分），并给出简短解释。
请输出结果，格式如下：

分数: 
依据：
";

const CHECKITEM_PLACEHOLDER: &str = "{checkitem}";
const CONTENT_PLACEHOLDER: &str = "{content}";

/// A template with `{checkitem}` and `{content}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate {
    template: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Substitute both placeholders everywhere they occur.
    ///
    /// The content is substituted last so placeholder-like text inside the
    /// document is left untouched.
    pub fn render(&self, checkitem: &str, content: &str) -> String {
        self.template
            .split(CONTENT_PLACEHOLDER)
            .map(|chunk| chunk.replace(CHECKITEM_PLACEHOLDER, checkitem))
            .collect::<Vec<_>>()
            .join(content)
    }
}
