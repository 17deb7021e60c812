//! Score extraction from free-text model responses.
//!
//! The prompt asks the model to open its answer with `分数: <n>`. Anything
//! else, including leading whitespace or preamble, is a miss and scores 0.
//! Full-width digits (`０`-`９`) are read like their ASCII counterparts.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Label the model is asked to put in front of the score.
pub const SCORE_LABEL: &str = "分数";

static SCORE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}: ([0-9０-９]+)", regex::escape(SCORE_LABEL))).unwrap()
});

/// Outcome of parsing one model response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsedScore {
    /// The response opened with the score label and digits.
    Scored(u32),
    /// The response did not follow the template; counts as 0.
    Missing,
}

impl ParsedScore {
    /// Numeric contribution: the parsed score, or 0 for a miss.
    pub fn value(self) -> u32 {
        match self {
            ParsedScore::Scored(n) => n,
            ParsedScore::Missing => 0,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, ParsedScore::Missing)
    }
}

/// Parse the score at the very start of `response`.
///
/// No range check is applied: the prompt asks for 1-10 but `分数: 42` parses
/// as 42. A digit run too large for `u32` is a miss.
pub fn parse_score(response: &str) -> ParsedScore {
    SCORE_RE
        .captures(response)
        .and_then(|caps| normalize_digits(&caps[1]).parse::<u32>().ok())
        .map_or(ParsedScore::Missing, ParsedScore::Scored)
}

/// Map full-width digits to ASCII; other characters pass through.
fn normalize_digits(digits: &str) -> String {
    digits
        .chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_leading_score() {
        assert_eq!(parse_score("分数: 7\n依据: ok"), ParsedScore::Scored(7));
        assert_eq!(parse_score("分数: 10"), ParsedScore::Scored(10));
    }

    #[test]
    fn takes_only_the_leading_digit_run() {
        assert_eq!(parse_score("分数: 8/10"), ParsedScore::Scored(8));
        assert_eq!(parse_score("分数: 003"), ParsedScore::Scored(3));
    }

    #[test]
    fn no_range_clamping() {
        assert_eq!(parse_score("分数: 42"), ParsedScore::Scored(42));
        assert_eq!(parse_score("分数: 0"), ParsedScore::Scored(0));
    }

    #[test]
    fn misses_score_zero() {
        for response in [
            "I cannot answer",
            "",
            " 分数: 7",
            "\n分数: 7",
            "评分如下。分数: 7",
            "分数：7",
            "分数:7",
            "分数: seven",
            "Score: 7",
        ] {
            let parsed = parse_score(response);
            assert!(parsed.is_missing(), "expected a miss for {response:?}");
            assert_eq!(parsed.value(), 0);
        }
    }

    #[test]
    fn full_width_digits_are_scores() {
        assert_eq!(parse_score("分数: ７\n依据：ok"), ParsedScore::Scored(7));
        assert_eq!(parse_score("分数: １０"), ParsedScore::Scored(10));
        assert_eq!(parse_score("分数: 1０"), ParsedScore::Scored(10));
        assert_eq!(normalize_digits("０９"), "09");
    }

    #[test]
    fn overflowing_digits_are_a_miss() {
        assert_eq!(parse_score("分数: 99999999999999999999"), ParsedScore::Missing);
    }

    #[test]
    fn labels_match_the_pattern() {
        let response = format!("{SCORE_LABEL}: 5\n依据: fine");
        assert_eq!(parse_score(&response), ParsedScore::Scored(5));
    }
}
