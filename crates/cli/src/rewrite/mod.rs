use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};

use crate::args::RewriteArgs;
use crate::config::{config_dir, load_config, Config};
use crate::output::{print_summary, Format, Summary};
use crate::ui;

use engine::{rules_from_config, CompilationUnit, EngineConfig};
use loader::{collect_files, RuleSet, TargetMode};

fn init_logging(quiet: bool, debug: bool) {
    let level = if quiet {
        LevelFilter::OFF
    } else if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Rule set for this run.
///
/// An explicit `--target` wins, then `--rules`, then the `target` of the
/// user config, then rule files under the config directory. Without any
/// of these the rule rewrites all sources.
pub fn resolve_rules(args: &RewriteArgs, cfg: &Config) -> Result<RuleSet> {
    if let Some(target) = args.target {
        return Ok(RuleSet::single(target));
    }
    if let Some(path) = &args.rules {
        return loader::load_rules(path)
            .with_context(|| format!("failed to load rules from {}", path.display()));
    }
    if let Some(target) = &cfg.rewrite.target {
        let target = TargetMode::parse(Some(target)).context("invalid target in config.toml")?;
        return Ok(RuleSet::single(target));
    }
    let dir = config_dir().join("rules");
    if dir.is_dir() {
        debug!(path = %dir.display(), "Using configured rules directory");
        return loader::load_rules(&dir);
    }
    Ok(RuleSet::single(TargetMode::AllSource))
}

fn read_units(path: &Path) -> Result<(Vec<PathBuf>, Vec<CompilationUnit>)> {
    let files = collect_files(path, &["json"])?;
    let mut units = Vec::with_capacity(files.len());
    for file in &files {
        let data = fs::read_to_string(file)
            .with_context(|| format!("failed to read unit: {}", file.display()))?;
        let unit = CompilationUnit::from_json(&data)
            .with_context(|| format!("failed to parse unit: {}", file.display()))?;
        debug!(file = %file.display(), unit = %unit.source_path, "Unit loaded");
        units.push(unit);
    }
    Ok((files, units))
}

/// Where the rewritten form of `file` goes; `file` itself without `out`.
fn destination(root: &Path, file: &Path, out: Option<&Path>) -> PathBuf {
    let Some(dir) = out else {
        return file.to_path_buf();
    };
    let relative = file
        .strip_prefix(root)
        .ok()
        .filter(|r| !r.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| file.file_name().map(PathBuf::from))
        .unwrap_or_else(|| file.to_path_buf());
    dir.join(relative)
}

pub fn run_rewrite(args: RewriteArgs) -> Result<()> {
    let user_cfg = load_config().context("failed to load configuration")?;
    init_logging(args.quiet, args.debug);
    if args.debug && !args.quiet {
        debug!("Debug mode enabled");
    }
    if args.format == Format::Text && !args.quiet {
        ui::print_header();
    }

    info!(path = %args.path.display(), "Rewrite started");
    let ruleset = resolve_rules(&args, &user_cfg)?;
    info!(count = ruleset.rules.len(), "Rules loaded");
    for rule in &ruleset.rules {
        debug!(rule = %rule.id, target = %rule.target, "Rule configured");
    }

    let (files, units) = read_units(&args.path)?;
    if units.is_empty() {
        warn!(path = %args.path.display(), "No unit files found");
    }
    info!(count = units.len(), "Units loaded");

    let cfg = EngineConfig {
        threads: Some(args.threads),
        simplify_branches: args.simplify_branches || user_cfg.rewrite.simplify_branches,
    };
    let report = engine::run(units, rules_from_config(&ruleset), &cfg)?;

    let out = args.out.clone().or(user_cfg.rewrite.out_dir);
    if args.dry_run {
        for outcome in report.changed() {
            println!("// {}", outcome.unit.source_path);
            println!("{}", outcome.unit.to_java());
        }
    } else {
        for (outcome, file) in report.outcomes.iter().zip(&files) {
            if !outcome.changed {
                continue;
            }
            let dest = destination(&args.path, file, out.as_deref());
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            fs::write(&dest, outcome.unit.to_json()?)
                .with_context(|| format!("failed to write {}", dest.display()))?;
            debug!(file = %dest.display(), "Unit written");
        }
    }

    let summary = Summary::new(&report, &files);
    info!(changed = summary.changed.len(), "Rewrite completed");
    let shown_out = if args.dry_run { None } else { out.as_deref() };
    print_summary(&summary, args.format, shown_out)
}
