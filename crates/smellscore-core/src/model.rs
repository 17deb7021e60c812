//! Core data model types for smellscore.
//!
//! Fragments are produced by the splitter, checklist items name the quality
//! criteria, and score entries record one model verdict per pair of the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::parser::ParsedScore;

/// Kind of code declaration that opens a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Class,
    Def,
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclarationKind::Class => write!(f, "class"),
            DeclarationKind::Def => write!(f, "def"),
        }
    }
}

impl FromStr for DeclarationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(DeclarationKind::Class),
            "def" => Ok(DeclarationKind::Def),
            other => Err(format!("unknown declaration kind: {other}")),
        }
    }
}

/// The declaration header a fragment starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
}

/// A contiguous, bounded slice of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Zero-based position in split order.
    pub index: usize,
    /// Declaration that opens this fragment, `None` for leading text.
    pub declaration: Option<Declaration>,
    /// Fragment text, already truncated.
    pub text: String,
}

impl Fragment {
    /// Label used in reports: `Part 1`, `Part 2`, ...
    pub fn label(&self) -> String {
        format!("Part {}", self.index + 1)
    }
}

/// A named quality criterion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChecklistItem(String);

impl ChecklistItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChecklistItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChecklistItem {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ChecklistItem {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The built-in code smell checklist.
pub const DEFAULT_CHECKLIST: [&str; 10] = [
    "不好的命名",
    "重复代码",
    "过长的函数或方法",
    "缺乏注释和文档",
    "神奇数字（Magic Numbers）",
    "复杂的条件和循环",
    "未处理的异常",
    "无效的或多余的代码",
    "低效的实现",
    "不一致的代码风格",
];

/// Build the default checklist as owned items.
pub fn default_checklist() -> Vec<ChecklistItem> {
    DEFAULT_CHECKLIST.iter().map(|s| ChecklistItem::from(*s)).collect()
}

/// One model verdict for a (fragment, checklist item) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub fragment_index: usize,
    pub item: ChecklistItem,
    /// Raw model response, kept verbatim for the report.
    pub response: String,
    pub score: ParsedScore,
}

impl ScoreEntry {
    /// Contribution of this entry to the total. Misses count as 0.
    pub fn points(&self) -> u64 {
        u64::from(self.score.value())
    }

    /// Report line: `<item>: <raw response>`.
    pub fn line(&self) -> String {
        format!("{}: {}", self.item, self.response)
    }
}
