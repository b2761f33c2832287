//! Output formatting for the CLI

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use gqltest::{CaseResult, TestSuiteResult};

/// Output format
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// Plain text format
    Plain,
}

/// Print the outcome of a run
pub fn print_summary(summary: &TestSuiteResult, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic);

            table.set_header(vec!["Suite", "Cases", "Passed", "Failed", "Duration"]);
            for result in &summary.results {
                let (total, passed) = counts(result);
                table.add_row(vec![
                    result.name.clone(),
                    total.to_string(),
                    passed.to_string(),
                    (total - passed).to_string(),
                    format!("{} ms", result.duration_ms),
                ]);
            }

            println!("{table}");
            print_failures(summary);
            print_totals(summary);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(summary).unwrap_or_default());
        }
        OutputFormat::Plain => {
            for result in &summary.results {
                for leaf in result.leaves() {
                    let status = if leaf.success { "ok" } else { "FAILED" };
                    println!("{} ... {}", leaf.name, status);
                }
            }
            print_failures(summary);
            print_totals(summary);
        }
    }
}

fn counts(result: &CaseResult) -> (usize, usize) {
    let leaves = result.leaves();
    let passed = leaves.iter().filter(|l| l.success).count();
    (leaves.len(), passed)
}

fn print_failures(summary: &TestSuiteResult) {
    for result in &summary.results {
        for message in result.failure_messages() {
            println!();
            println!("{}", message);
        }
    }
}

fn print_totals(summary: &TestSuiteResult) {
    let line = format!(
        "{} passed, {} failed ({} ms)",
        summary.passed, summary.failed, summary.duration_ms
    );
    println!();
    if summary.success() {
        print_success(&line);
    } else {
        print_error(&line);
    }
}

/// Print success message
pub fn print_success(message: &str) {
    println!("✅ {}", message.green());
}

/// Print error message
pub fn print_error(message: &str) {
    eprintln!("❌ {}", message.red());
}
