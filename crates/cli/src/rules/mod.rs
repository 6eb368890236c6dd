use anyhow::{bail, Result};
use colored::*;
use loader::{collect_files, load_rules, RuleConfig, TargetMode};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Default)]
struct ErrorCollection {
    errors: Vec<(String, String)>,
    /// rule id -> files declaring it
    duplicate_rules: HashMap<String, Vec<String>>,
}

impl ErrorCollection {
    fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.duplicate_rules.is_empty()
    }

    fn print(&self) {
        if !self.errors.is_empty() {
            println!();
            println!("{}", "Errors found:".bright_red().bold());
            for (file, message) in &self.errors {
                println!(
                    "  {} {}: {}",
                    "•".bright_red(),
                    file.bright_white(),
                    message.bright_red()
                );
            }
        }
        let mut duplicates: Vec<_> = self.duplicate_rules.iter().collect();
        duplicates.sort();
        if !duplicates.is_empty() {
            println!();
            println!("{}", "Duplicate rule IDs found:".bright_red().bold());
            for (id, files) in duplicates {
                println!("  {} {}", "•".bright_red(), id.bright_yellow());
                for file in files {
                    println!("    - {}", file.bright_cyan());
                }
            }
        }
    }
}

/// Loads each rule file on its own so one bad file does not hide the rest.
fn load_individually(files: &[std::path::PathBuf]) -> (Vec<RuleConfig>, ErrorCollection) {
    let mut rules = Vec::new();
    let mut errors = ErrorCollection::default();
    for file in files {
        match load_rules(file) {
            Ok(rs) => rules.extend(rs.rules),
            Err(e) => errors
                .errors
                .push((file.display().to_string(), format!("{e:#}"))),
        }
    }
    let mut by_id: HashMap<&str, Vec<String>> = HashMap::new();
    for rule in &rules {
        by_id
            .entry(&rule.id)
            .or_default()
            .push(rule.source_file.clone().unwrap_or_default());
    }
    for (id, sources) in by_id {
        if sources.len() > 1 {
            errors.duplicate_rules.insert(id.to_string(), sources);
        }
    }
    (rules, errors)
}

fn colored_target(target: TargetMode) -> ColoredString {
    match target {
        TargetMode::AllSource => target.as_str().bright_magenta(),
        TargetMode::AllSourceWhenNonTestDetected => target.as_str().bright_yellow(),
        TargetMode::NonTestSource => target.as_str().bright_cyan(),
    }
}

pub fn verify_rules(path: &Path) -> Result<()> {
    println!("{}", "Verifying rules...".bright_blue().bold());
    println!("Path: {}", path.display().to_string().bright_white());
    let files = collect_files(path, &["yaml", "yml", "json"])?;
    let (rules, errors) = load_individually(&files);

    if !rules.is_empty() {
        println!();
        println!("{}", "Rules loaded:".bright_cyan().bold());
        for rule in &rules {
            println!(
                "  {} {} ({})",
                "•".bright_white(),
                rule.id.bright_white().bold(),
                colored_target(rule.target)
            );
        }
    }
    errors.print();

    println!();
    println!("{}", "Statistics:".bright_cyan().bold());
    println!("  Rule files: {}", files.len().to_string().bright_yellow());
    println!("  Rules loaded: {}", rules.len().to_string().bright_yellow());

    if errors.has_errors() {
        println!();
        println!("{}", "Verification completed with issues".bright_yellow().bold());
        bail!(
            "rule verification failed: {} invalid file(s), {} duplicate id(s)",
            errors.errors.len(),
            errors.duplicate_rules.len()
        );
    }
    if rules.is_empty() {
        println!();
        println!("{}", "No valid rules found".bright_yellow().bold());
    } else {
        println!();
        println!("{}", "Verification completed without errors".bright_green().bold());
    }
    Ok(())
}
