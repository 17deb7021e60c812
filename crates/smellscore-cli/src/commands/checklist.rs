//! The `smellscore checklist` command.

use std::path::PathBuf;

use anyhow::Result;

use smellscore_providers::config::load_config_from;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    for (i, item) in config.checklist.iter().enumerate() {
        println!("{:>2}. {item}", i + 1);
    }
    println!("\n{} item(s), model {}", config.checklist.len(), config.model);

    Ok(())
}
