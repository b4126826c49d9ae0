//! Output formatting utilities

use agro_lib::Sample;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

/// One preview row, labelled with the CSV column names
#[derive(Tabled)]
pub struct SampleRow {
    pub umidade: String,
    pub ph: String,
    pub irrigacao: String,
    pub fertilizante: String,
    pub produtividade: String,
}

impl From<&Sample> for SampleRow {
    fn from(sample: &Sample) -> Self {
        Self {
            umidade: format_value(sample.humidity),
            ph: format_value(sample.ph),
            irrigacao: format_value(sample.irrigation),
            fertilizante: format_value(sample.fertilizer),
            produtividade: format_value(sample.crop_yield),
        }
    }
}

/// Print the first rows of the generated dataset
pub fn print_preview(samples: &[Sample]) {
    if samples.is_empty() {
        println!("{}", "No rows generated".yellow());
        return;
    }
    let rows: Vec<SampleRow> = samples.iter().map(SampleRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Format a generated value for the preview table
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}
