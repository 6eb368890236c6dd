//! Rewrite engine that applies the secure temporary file rules to Java
//! compilation units. Units are processed in parallel; the only state
//! shared between them is the [`RunContext`] rule list.

use loader::RuleSet;
use rayon::{prelude::*, ThreadPoolBuilder};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub mod binding;
pub mod calls;
pub mod chain;
mod context;
pub mod delete;
mod error;
pub mod imports;
mod path;
pub mod rewrite;
mod rule;
pub mod search;
pub mod simplify;
pub mod target;
#[cfg(test)]
mod testing;
pub mod visit;

pub use binding::CandidateBinding;
pub use chain::HijackChainRecord;
pub use context::{ActiveRule, Origin, RunContext};
pub use error::RewriteError;
pub use imports::ImportEffects;
pub use path::{glob_to_regex, is_test_source, path_matches, TEST_SOURCE_GLOB};
pub use rule::{Rule, SecureTempFileCreation, UnitOutcome};

pub use ir::CompilationUnit;

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    /// Worker threads; rayon's default when `None`.
    pub threads: Option<usize>,
    /// Fold constant `if` branches in changed units after the run.
    pub simplify_branches: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    /// One outcome per input unit, in input order.
    pub outcomes: Vec<UnitOutcome>,
    /// Passes made over the units; more than one after an escalation.
    pub cycles: usize,
    /// Ids of rules added during the run.
    pub escalated: Vec<String>,
}

impl RunReport {
    pub fn changed(&self) -> impl Iterator<Item = &UnitOutcome> {
        self.outcomes.iter().filter(|o| o.changed)
    }
}

/// Builds the rule instances described by a loaded rule set.
pub fn rules_from_config(rules: &RuleSet) -> Vec<Arc<dyn Rule>> {
    rules
        .rules
        .iter()
        .map(|r| Arc::new(SecureTempFileCreation::from_config(r)) as Arc<dyn Rule>)
        .collect()
}

fn apply_all(
    rules: &[Arc<dyn Rule>],
    state: UnitOutcome,
    ctx: &RunContext,
) -> Result<UnitOutcome, RewriteError> {
    let mut state = state;
    for rule in rules {
        let unit = state.unit.clone();
        let next = rule.apply(unit, ctx)?;
        state = state.then(next);
    }
    Ok(state)
}

/// Applies `rules` to every unit.
///
/// Each cycle runs the rules that became active since the previous one;
/// the first cycle runs the configured rules. The run ends when a cycle
/// adds no rules. Any error aborts the whole run.
pub fn run(
    units: Vec<CompilationUnit>,
    rules: Vec<Arc<dyn Rule>>,
    cfg: &EngineConfig,
) -> Result<RunReport, RewriteError> {
    let mut builder = ThreadPoolBuilder::new();
    if let Some(n) = cfg.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build()?;
    let ctx = RunContext::new(rules);

    debug!(units = units.len(), "Starting rewrite run");
    let mut states: Vec<UnitOutcome> = units.into_iter().map(UnitOutcome::unchanged).collect();
    let mut seen = 0;
    let mut cycles = 0;
    loop {
        let (pending, total) = ctx.rules_from(seen);
        if pending.is_empty() {
            break;
        }
        seen = total;
        cycles += 1;
        debug!(cycle = cycles, rules = pending.len(), "Rewrite cycle");
        states = pool.install(|| {
            states
                .into_par_iter()
                .map(|state| apply_all(&pending, state, &ctx))
                .collect::<Result<Vec<_>, _>>()
        })?;
    }

    if cfg.simplify_branches {
        states = pool.install(|| {
            states
                .into_par_iter()
                .map(|mut state| {
                    if state.changed {
                        state.unit = simplify::simplify_constant_branches(state.unit).0;
                    }
                    state
                })
                .collect()
        });
    }

    let report = RunReport {
        outcomes: states,
        cycles,
        escalated: ctx
            .escalated()
            .into_iter()
            .map(|a| a.rule.id().to_string())
            .collect(),
    };
    info!(
        units = report.outcomes.len(),
        changed = report.changed().count(),
        cycles = report.cycles,
        "Rewrite run finished"
    );
    Ok(report)
}
