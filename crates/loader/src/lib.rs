//! Loads rule configurations from YAML or JSON files and validates their
//! options before any source unit is visited.

use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

mod schema;
mod target;
mod walk;

pub use schema::{RuleEntry, RuleFile};
pub use target::{ConfigError, TargetMode};
pub use walk::{collect_files, visit};

/// Identifier given to the rule when it is configured from the command line.
pub const DEFAULT_RULE_ID: &str = "java.secure-temp-file-creation";

#[derive(Debug, Clone, PartialEq)]
/// Validated rule configuration.
pub struct RuleConfig {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: TargetMode,
    pub source_file: Option<String>,
}

impl RuleConfig {
    pub fn new(id: impl Into<String>, target: TargetMode) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            target,
            source_file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Collection of validated rules, in file discovery order.
pub struct RuleSet {
    pub rules: Vec<RuleConfig>,
}

impl RuleSet {
    /// A set holding the default rule with the given target.
    pub fn single(target: TargetMode) -> Self {
        Self {
            rules: vec![RuleConfig::new(DEFAULT_RULE_ID, target)],
        }
    }
}

fn compile_entry(
    rs: &mut RuleSet,
    seen: &mut HashSet<String>,
    entry: RuleEntry,
    file_path: &Path,
) -> anyhow::Result<()> {
    if !seen.insert(entry.id.clone()) {
        anyhow::bail!("duplicate rule id: {}", entry.id);
    }
    let target = TargetMode::parse(entry.target.as_deref()).with_context(|| {
        format!(
            "invalid target for rule '{}' in {}",
            entry.id,
            file_path.display()
        )
    })?;
    debug!(rule = %entry.id, target = %target, "Rule compiled");
    rs.rules.push(RuleConfig {
        id: entry.id,
        name: entry.name,
        description: entry.description,
        target,
        source_file: Some(file_path.to_string_lossy().into_owned()),
    });
    Ok(())
}

/// Reads a rule file or recursively reads a directory of rule files.
///
/// YAML (`.yaml`, `.yml`) and JSON (`.json`) files share one layout:
///
/// ```yaml
/// rules:
///   - id: java.secure-temp-file-creation
///     target: All Source if detected in Non Test Source
/// ```
///
/// Every `target` is validated here; an invalid value fails the whole load.
///
/// # Example
/// ```no_run
/// use loader::load_rules;
/// let rules = load_rules(std::path::Path::new("rules")).unwrap();
/// assert!(!rules.rules.is_empty());
/// ```
pub fn load_rules(path: &Path) -> anyhow::Result<RuleSet> {
    let mut rs = RuleSet::default();
    let mut seen_ids: HashSet<String> = HashSet::new();
    for file in collect_files(path, &["yaml", "yml", "json"])? {
        debug!(file = %file.display(), "Parsing rule file");
        let data = fs::read_to_string(&file)
            .with_context(|| format!("Failed to read rule file: {}", file.display()))?;
        let is_json = file.extension().and_then(|e| e.to_str()) == Some("json");
        let doc: RuleFile = if is_json {
            serde_json::from_str(&data)
                .with_context(|| format!("Failed to parse rule file: {}", file.display()))?
        } else {
            serde_yaml::from_str(&data)
                .with_context(|| format!("Failed to parse rule file: {}", file.display()))?
        };
        for entry in doc.rules {
            compile_entry(&mut rs, &mut seen_ids, entry, &file)?;
        }
    }
    Ok(rs)
}
