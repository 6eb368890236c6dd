use std::sync::{Arc, Mutex};
use tracing::info;

use crate::rule::Rule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Supplied by the caller when the run started.
    Configured,
    /// Added during the run by an escalating rule.
    Escalated,
}

#[derive(Clone)]
pub struct ActiveRule {
    pub rule: Arc<dyn Rule>,
    pub origin: Origin,
}

/// Run-wide list of active rules.
///
/// The list only grows, and only through [`RunContext::escalate`], which
/// may be called concurrently from the workers processing units.
pub struct RunContext {
    active: Mutex<Vec<ActiveRule>>,
}

impl RunContext {
    pub fn new(rules: Vec<Arc<dyn Rule>>) -> Self {
        Self {
            active: Mutex::new(
                rules
                    .into_iter()
                    .map(|rule| ActiveRule {
                        rule,
                        origin: Origin::Configured,
                    })
                    .collect(),
            ),
        }
    }

    /// Adds `rule` unless an escalated rule of the same kind is already
    /// active. Returns whether it was added.
    pub fn escalate(&self, rule: Arc<dyn Rule>) -> bool {
        let mut active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let kind = rule.kind();
        if active
            .iter()
            .any(|a| a.origin == Origin::Escalated && a.rule.kind() == kind)
        {
            return false;
        }
        info!(rule = %rule.id(), kind, "Rule scope widened to all sources");
        active.push(ActiveRule {
            rule,
            origin: Origin::Escalated,
        });
        true
    }

    /// Snapshot of the active rules.
    pub fn active_rules(&self) -> Vec<ActiveRule> {
        self.active.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn escalated(&self) -> Vec<ActiveRule> {
        self.active_rules()
            .into_iter()
            .filter(|a| a.origin == Origin::Escalated)
            .collect()
    }

    /// Rules added at or after position `start`, and the new list length.
    pub(crate) fn rules_from(&self, start: usize) -> (Vec<Arc<dyn Rule>>, usize) {
        let active = self.active.lock().unwrap_or_else(|e| e.into_inner());
        let rules = active
            .iter()
            .skip(start)
            .map(|a| Arc::clone(&a.rule))
            .collect();
        (rules, active.len())
    }
}
