//! Document splitter.
//!
//! Breaks a document into fragments at `class <name>:` and
//! `def <name>(...):` declaration headers. The tokenizer is not indentation
//! aware: a nested declaration starts a new fragment just like a top-level one.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Declaration, Fragment};

/// Default upper bound on fragment length, in characters.
pub const DEFAULT_MAX_FRAGMENT_CHARS: usize = 5000;

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(class|def)\s+(\w+)\s*(\([^\n]*?\))?\s*(->\s*[^\n:]+)?:").unwrap()
});

/// Splits documents into bounded fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Splitter {
    max_chars: usize,
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAGMENT_CHARS)
    }
}

impl Splitter {
    /// Create a splitter that truncates fragments to `max_chars` characters.
    /// A zero bound is raised to one.
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars: max_chars.max(1),
        }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Split `text` into ordered fragments.
    ///
    /// - Text before the first declaration becomes its own fragment, unless
    ///   it is blank.
    /// - Each declaration runs up to the next declaration or the end of text.
    /// - Text without declarations (including empty text) yields exactly one
    ///   fragment holding the whole input.
    pub fn split(&self, text: &str) -> Vec<Fragment> {
        let headers = find_declarations(text);

        let mut pieces: Vec<(Option<Declaration>, &str)> = Vec::new();
        match headers.first() {
            None => pieces.push((None, text)),
            Some((first_start, _)) => {
                let preamble = &text[..*first_start];
                if !preamble.trim().is_empty() {
                    pieces.push((None, preamble));
                }
                for (i, (start, declaration)) in headers.iter().enumerate() {
                    let end = headers
                        .get(i + 1)
                        .map_or(text.len(), |(next_start, _)| *next_start);
                    pieces.push((Some(declaration.clone()), &text[*start..end]));
                }
            }
        }

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, (declaration, body))| Fragment {
                index,
                declaration,
                text: truncate_chars(body, self.max_chars).to_string(),
            })
            .collect()
    }
}

/// Byte offsets and parsed headers of every declaration in `text`.
fn find_declarations(text: &str) -> Vec<(usize, Declaration)> {
    DECLARATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let start = caps.get(0)?.start();
            let kind = caps[1].parse().ok()?;
            Some((
                start,
                Declaration {
                    kind,
                    name: caps[2].to_string(),
                },
            ))
        })
        .collect()
}

/// Cut `s` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
