//! The `smellscore score` command, also run when no subcommand is given.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use smellscore_core::client::ScoringClient;
use smellscore_core::engine::{DocumentScorer, ProgressReporter};
use smellscore_core::model::{Fragment, ScoreEntry};
use smellscore_core::report::write_report;
use smellscore_core::traits::LlmProvider;
use smellscore_providers::config::load_config_from;
use smellscore_providers::create_provider;

/// Fragment progress on stderr; stdout carries only the per-file lines.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_fragment_start(&self, fragment: &Fragment, fragment_count: usize) {
        match &fragment.declaration {
            Some(declaration) => eprintln!(
                "  {}/{fragment_count}: {} {}",
                fragment.index + 1,
                declaration.kind,
                declaration.name
            ),
            None => eprintln!("  {}/{fragment_count}", fragment.index + 1),
        }
    }

    fn on_entry_scored(&self, _: &ScoreEntry) {}
}

struct SummaryRow {
    file: String,
    parts: usize,
    total: u64,
    unscored: usize,
    output: String,
}

pub async fn execute(
    files: Vec<PathBuf>,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if let Some(model) = model {
        config.model = model;
        config.validate()?;
    }

    let files = if files.is_empty() {
        config.files.clone()
    } else {
        files
    };
    let output_dir = output.unwrap_or_else(|| config.output_dir.clone());

    let provider: Arc<dyn LlmProvider> = Arc::from(create_provider(&config.provider)?);
    tracing::info!(
        provider = provider.name(),
        model = %config.model,
        files = files.len(),
        items = config.checklist.len(),
        "starting batch"
    );

    let client = ScoringClient::new(provider, config.template(), config.client_options());
    let scorer = DocumentScorer::new(client, config.splitter());
    let reporter = ConsoleReporter;

    let mut summary = Vec::with_capacity(files.len());
    for file in &files {
        println!("Scoring {}:", file.display());
        let report = scorer
            .score_file(file, &config.checklist, &reporter)
            .await?;
        let output_path = write_report(file, &report.render(), &output_dir)?;
        println!("Scores saved to {}", output_path.display());
        println!("\n{}\n", "=".repeat(50));

        summary.push(SummaryRow {
            file: file.display().to_string(),
            parts: report.fragments.len(),
            total: report.total,
            unscored: report.missing_scores(),
            output: output_path.display().to_string(),
        });
    }

    print_summary(&summary);
    Ok(())
}

fn print_summary(rows: &[SummaryRow]) {
    use comfy_table::{Cell, Table};

    if rows.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["File", "Parts", "Total Score", "Unscored", "Output"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.file),
            Cell::new(row.parts),
            Cell::new(row.total),
            Cell::new(row.unscored),
            Cell::new(&row.output),
        ]);
    }
    println!("{table}");
}
