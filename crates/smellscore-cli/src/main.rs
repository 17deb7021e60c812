//! smellscore CLI — scores document sections against a code-smell checklist.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(
    name = "smellscore",
    version,
    about = "Score document sections against a code-smell checklist with an LLM"
)]
struct Cli {
    /// Without a subcommand, scores the configured files (doc.md, doc_1.md, doc_2.md by default)
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score documents and write <name>_scores.txt reports
    Score {
        /// Documents to score, in order (default: the configured file list)
        files: Vec<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory (default: the configured one, else the working directory)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Model to use instead of the configured one
        #[arg(long)]
        model: Option<String>,
    },

    /// Print the checklist that scoring would use
    Checklist {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter smellscore.toml
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("smellscore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::score::execute(Vec::new(), None, None, None).await,
        Some(Commands::Score {
            files,
            config,
            output,
            model,
        }) => commands::score::execute(files, config, output, model).await,
        Some(Commands::Checklist { config }) => commands::checklist::execute(config),
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
