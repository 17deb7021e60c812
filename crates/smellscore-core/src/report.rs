//! Scored reports and their flat-text persistence.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Declaration, ScoreEntry};
use crate::traits::TokenUsage;

/// Suffix appended to the input file stem to name the output file.
pub const OUTPUT_SUFFIX: &str = "_scores";

/// Extension of report files.
pub const OUTPUT_EXTENSION: &str = "txt";

/// Scores for one fragment, in checklist order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentScores {
    /// Fragment label, e.g. `Part 3`.
    pub label: String,
    #[serde(default)]
    pub declaration: Option<Declaration>,
    pub entries: Vec<ScoreEntry>,
}

impl FragmentScores {
    pub fn subtotal(&self) -> u64 {
        self.entries.iter().map(ScoreEntry::points).sum()
    }
}

/// A complete per-document report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Per-fragment blocks in split order.
    pub fragments: Vec<FragmentScores>,
    /// Sum of every entry's points.
    pub total: u64,
    /// Tokens spent on the model calls behind this report.
    #[serde(default)]
    pub token_usage: TokenUsage,
}

impl Report {
    /// All entries in (fragment, checklist item) order.
    pub fn entries(&self) -> impl Iterator<Item = &ScoreEntry> {
        self.fragments.iter().flat_map(|f| f.entries.iter())
    }

    /// Number of responses that did not carry a parsable score.
    pub fn missing_scores(&self) -> usize {
        self.entries().filter(|e| e.score.is_missing()).count()
    }

    /// Render the report as flat text.
    ///
    /// Layout: for every fragment a `Part N:` header followed by its
    /// `<item>: <response>` lines, then a `Total Score: T` trailer. Blocks are
    /// separated by blank lines.
    pub fn render(&self) -> String {
        let mut pieces = Vec::with_capacity(self.fragments.len() * 2 + 1);
        for fragment in &self.fragments {
            pieces.push(format!("{}:\n", fragment.label));
            pieces.push(
                fragment
                    .entries
                    .iter()
                    .map(ScoreEntry::line)
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        pieces.push(format!("\nTotal Score: {}", self.total));
        pieces.join("\n\n")
    }
}

/// Derive `<output_dir>/<input stem>_scores.txt` from an input path.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let stem = input
        .file_stem()
        .with_context(|| format!("input path has no file name: {}", input.display()))?;
    let mut file_name = stem.to_os_string();
    file_name.push(OUTPUT_SUFFIX);
    file_name.push(".");
    file_name.push(OUTPUT_EXTENSION);
    Ok(output_dir.join(file_name))
}

/// Write `report_text` next to the other outputs for `input`, replacing any
/// existing file. Returns the path written.
pub fn write_report(input: &Path, report_text: &str, output_dir: &Path) -> Result<PathBuf> {
    let path = output_path_for(input, output_dir)?;
    if !output_dir.as_os_str().is_empty() {
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;
    }
    std::fs::write(&path, report_text)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = report_text.len(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_score, ParsedScore};

    fn entry(fragment_index: usize, item: &str, response: &str) -> ScoreEntry {
        ScoreEntry {
            fragment_index,
            item: item.into(),
            response: response.into(),
            score: parse_score(response),
        }
    }

    fn report(fragments: Vec<FragmentScores>) -> Report {
        let total = fragments.iter().map(FragmentScores::subtotal).sum();
        Report {
            fragments,
            total,
            token_usage: TokenUsage::default(),
        }
    }

    #[test]
    fn renders_single_fragment_single_item() {
        let report = report(vec![FragmentScores {
            label: "Part 1".into(),
            declaration: None,
            entries: vec![entry(0, "poor naming", "分数: 7\n依据: ok")],
        }]);

        assert_eq!(
            report.render(),
            "Part 1:\n\n\npoor naming: 分数: 7\n依据: ok\n\n\nTotal Score: 7"
        );
    }

    #[test]
    fn renders_entries_in_order_across_fragments() {
        let report = report(vec![
            FragmentScores {
                label: "Part 1".into(),
                declaration: None,
                entries: vec![entry(0, "a", "分数: 1"), entry(0, "b", "分数: 2")],
            },
            FragmentScores {
                label: "Part 2".into(),
                declaration: None,
                entries: vec![entry(1, "a", "I cannot answer"), entry(1, "b", "分数: 4")],
            },
        ]);

        assert_eq!(
            report.render(),
            "Part 1:\n\n\na: 分数: 1\nb: 分数: 2\n\nPart 2:\n\n\na: I cannot answer\nb: 分数: 4\n\n\nTotal Score: 7"
        );
        assert_eq!(report.missing_scores(), 1);
        assert_eq!(report.entries().count(), 4);
    }

    #[test]
    fn empty_checklist_renders_headers_only() {
        let report = report(vec![FragmentScores {
            label: "Part 1".into(),
            declaration: None,
            entries: vec![],
        }]);
        assert_eq!(report.render(), "Part 1:\n\n\n\n\n\nTotal Score: 0");
    }

    #[test]
    fn total_matches_entry_points() {
        let report = report(vec![FragmentScores {
            label: "Part 1".into(),
            declaration: None,
            entries: vec![entry(0, "a", "分数: 3"), entry(0, "b", "nope")],
        }]);
        let summed: u64 = report.entries().map(|e| u64::from(e.score.value())).sum();
        assert_eq!(report.total, summed);
        assert_eq!(report.fragments[0].entries[1].score, ParsedScore::Missing);
    }

    #[test]
    fn output_name_strips_extension_and_appends_suffix() {
        let path = output_path_for(Path::new("docs/doc_1.md"), Path::new("")).unwrap();
        assert_eq!(path, PathBuf::from("doc_1_scores.txt"));

        let path = output_path_for(Path::new("archive.tar.gz"), Path::new("out")).unwrap();
        assert_eq!(path, PathBuf::from("out/archive.tar_scores.txt"));

        let path = output_path_for(Path::new("README"), Path::new("")).unwrap();
        assert_eq!(path, PathBuf::from("README_scores.txt"));
    }

    #[test]
    fn output_name_requires_a_file_name() {
        assert!(output_path_for(Path::new(".."), Path::new("")).is_err());
    }

    #[test]
    fn unwritable_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("reports");
        std::fs::write(&not_a_dir, "occupied").unwrap();

        let err = write_report(Path::new("doc.md"), "report", &not_a_dir).unwrap_err();
        assert!(err.to_string().contains("failed to create output directory"));
        assert_eq!(std::fs::read_to_string(&not_a_dir).unwrap(), "occupied");
    }

    #[test]
    fn write_report_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("nested");

        let first = write_report(Path::new("doc.md"), "first version", &out_dir).unwrap();
        let second = write_report(Path::new("doc.md"), "second", &out_dir).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, out_dir.join("doc_scores.txt"));
        assert_eq!(std::fs::read_to_string(&second).unwrap(), "second");
    }
}
