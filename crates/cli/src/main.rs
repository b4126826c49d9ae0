//! Crop yield dataset generator
//!
//! Writes a reproducible synthetic agricultural dataset to
//! `dados_agricolas.csv` in the working directory and prints a preview.

mod output;

use agro_lib::dataset::{generate_to_path, GeneratorConfig, PREVIEW_ROWS};
use agro_lib::DATA_FILE;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

/// Crop yield dataset generator
#[derive(Parser)]
#[command(name = "agro-gen")]
#[command(author, version, about = "Generate the synthetic crop yield dataset", long_about = None)]
pub struct Cli {}

fn main() -> Result<()> {
    let _cli = Cli::parse();

    let config = GeneratorConfig::default();
    let path = Path::new(DATA_FILE);

    output::print_info(&format!(
        "Generating {} rows with seed {}",
        config.rows, config.seed
    ));
    let samples = generate_to_path(path, &config)
        .with_context(|| format!("Failed to generate {}", path.display()))?;

    output::print_success(&format!(
        "CSV created successfully: {} ({} rows)",
        path.display(),
        samples.len()
    ));
    output::print_preview(&samples[..PREVIEW_ROWS.min(samples.len())]);

    Ok(())
}
