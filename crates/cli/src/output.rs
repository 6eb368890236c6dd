use clap::ValueEnum;
use colored::*;
use engine::RunReport;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Supported formats for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

#[derive(Debug, Serialize)]
pub struct ChangedUnit<'a> {
    pub source_path: &'a str,
    pub file: String,
    pub imports_added: Vec<&'a str>,
    pub imports_removed: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub units: usize,
    pub cycles: usize,
    pub escalated: &'a [String],
    pub changed: Vec<ChangedUnit<'a>>,
}

impl<'a> Summary<'a> {
    /// `files[i]` is the file unit `i` of `report` was read from.
    pub fn new(report: &'a RunReport, files: &[PathBuf]) -> Self {
        let changed = report
            .outcomes
            .iter()
            .zip(files)
            .filter(|(o, _)| o.changed)
            .map(|(o, file)| ChangedUnit {
                source_path: &o.unit.source_path,
                file: file.display().to_string(),
                imports_added: o.effects.added.iter().map(String::as_str).collect(),
                imports_removed: o.effects.removed.iter().map(String::as_str).collect(),
            })
            .collect();
        Self {
            units: report.outcomes.len(),
            cycles: report.cycles,
            escalated: &report.escalated,
            changed,
        }
    }
}

pub fn print_summary(summary: &Summary<'_>, fmt: Format, out: Option<&Path>) -> anyhow::Result<()> {
    match fmt {
        Format::Json => println!("{}", serde_json::to_string_pretty(summary)?),
        Format::Text => {
            println!();
            println!("{}", "Rewritten units:".bright_cyan().bold());
            if summary.changed.is_empty() {
                println!("  {}", "none".bright_white());
            }
            for unit in &summary.changed {
                println!(
                    "  {} {} ({})",
                    "•".bright_white(),
                    unit.source_path.bright_white().bold(),
                    unit.file.bright_cyan()
                );
                for import in &unit.imports_added {
                    println!("      {} import {}", "+".bright_green(), import);
                }
                for import in &unit.imports_removed {
                    println!("      {} import {}", "-".bright_red(), import);
                }
            }
            println!();
            println!("{}", "Statistics:".bright_cyan().bold());
            println!("  Units: {}", summary.units.to_string().bright_yellow());
            println!(
                "  Changed: {}",
                summary.changed.len().to_string().bright_yellow()
            );
            println!("  Cycles: {}", summary.cycles.to_string().bright_yellow());
            for id in summary.escalated {
                println!("  Widened to all sources: {}", id.bright_magenta());
            }
            if let Some(dir) = out {
                println!("  Output: {}", dir.display().to_string().bright_white());
            }
        }
    }
    Ok(())
}
