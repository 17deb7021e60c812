//! Document scorer.
//!
//! Runs every fragment of a document against every checklist item, one
//! model call at a time, and folds the answers into a [`Report`].

use std::path::Path;

use anyhow::{Context, Result};

use crate::client::ScoringClient;
use crate::model::{ChecklistItem, Fragment, ScoreEntry};
use crate::parser::parse_score;
use crate::report::{FragmentScores, Report};
use crate::splitter::Splitter;

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_fragment_start(&self, fragment: &Fragment, fragment_count: usize);
    fn on_entry_scored(&self, entry: &ScoreEntry);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_fragment_start(&self, _: &Fragment, _: usize) {}
    fn on_entry_scored(&self, _: &ScoreEntry) {}
}

/// Scores documents fragment by fragment.
pub struct DocumentScorer {
    client: ScoringClient,
    splitter: Splitter,
}

impl DocumentScorer {
    pub fn new(client: ScoringClient, splitter: Splitter) -> Self {
        Self { client, splitter }
    }

    /// Read `path` as UTF-8 and score its contents.
    pub async fn score_file(
        &self,
        path: &Path,
        checklist: &[ChecklistItem],
        progress: &dyn ProgressReporter,
    ) -> Result<Report> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document: {}", path.display()))?;

        let report = self
            .score_text(&text, checklist, progress)
            .await
            .with_context(|| format!("failed to score {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            parts = report.fragments.len(),
            total = report.total,
            missing = report.missing_scores(),
            tokens = report.token_usage.total_tokens,
            "document scored"
        );
        Ok(report)
    }

    /// Score `text` against `checklist`.
    ///
    /// Fragments are visited in split order and items in checklist order;
    /// the report preserves both. A response without a parsable score adds
    /// 0 to the total. The first model-call error aborts the document.
    pub async fn score_text(
        &self,
        text: &str,
        checklist: &[ChecklistItem],
        progress: &dyn ProgressReporter,
    ) -> Result<Report> {
        let fragments = self.splitter.split(text);
        let mut report = Report::default();

        for fragment in &fragments {
            progress.on_fragment_start(fragment, fragments.len());
            let content = fragment.text.trim();

            let mut entries = Vec::with_capacity(checklist.len());
            for item in checklist {
                let response = self
                    .client
                    .score(item, content)
                    .await
                    .with_context(|| format!("scoring {} against '{item}'", fragment.label()))?;

                let entry = ScoreEntry {
                    fragment_index: fragment.index,
                    item: item.clone(),
                    score: parse_score(&response.content),
                    response: response.content,
                };
                tracing::debug!(
                    part = fragment.index + 1,
                    item = %item,
                    score = ?entry.score,
                    latency_ms = response.latency_ms,
                    "entry scored"
                );

                report.total += entry.points();
                report.token_usage.accumulate(&response.token_usage);
                progress.on_entry_scored(&entry);
                entries.push(entry);
            }

            report.fragments.push(FragmentScores {
                label: fragment.label(),
                declaration: fragment.declaration.clone(),
                entries,
            });
        }

        Ok(report)
    }
}
