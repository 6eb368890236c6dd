use ir::CompilationUnit;
use loader::{RuleConfig, TargetMode};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::calls::{self, SECURE_API_JAVA_VERSION};
use crate::context::RunContext;
use crate::imports::{self, ImportEffects};
use crate::rewrite::secure_temp_files;
use crate::search::uses_method;
use crate::target;
use crate::RewriteError;

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Result of applying rules to one unit.
pub struct UnitOutcome {
    pub unit: CompilationUnit,
    pub effects: ImportEffects,
    pub changed: bool,
}

impl UnitOutcome {
    pub fn unchanged(unit: CompilationUnit) -> Self {
        Self {
            unit,
            effects: ImportEffects::default(),
            changed: false,
        }
    }

    /// Folds the outcome of a later rule into this one.
    pub fn then(mut self, next: UnitOutcome) -> Self {
        self.unit = next.unit;
        self.changed |= next.changed;
        self.effects.merge(next.effects);
        self
    }
}

/// A rewrite applied to every unit of a run.
pub trait Rule: Send + Sync {
    fn id(&self) -> &str;

    /// Identity used when deciding whether an escalated instance exists.
    fn kind(&self) -> &'static str;

    fn apply(&self, unit: CompilationUnit, ctx: &RunContext) -> Result<UnitOutcome, RewriteError>;
}

#[derive(Debug, Clone, PartialEq)]
/// Replaces `File.createTempFile` and the temp directory hijack chain with
/// `java.nio.file.Files` equivalents.
pub struct SecureTempFileCreation {
    id: String,
    target: TargetMode,
}

impl SecureTempFileCreation {
    pub const KIND: &'static str = "secure-temp-file-creation";

    pub fn new(id: impl Into<String>, target: TargetMode) -> Self {
        Self {
            id: id.into(),
            target,
        }
    }

    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new(config.id.clone(), config.target)
    }

    pub fn target(&self) -> TargetMode {
        self.target
    }

    /// Rewrites `unit` without consulting the target.
    pub fn rewrite(&self, unit: CompilationUnit) -> Result<UnitOutcome, RewriteError> {
        if unit
            .java_version
            .is_some_and(|v| v < SECURE_API_JAVA_VERSION)
        {
            debug!(unit = %unit.source_path, "Language level predates java.nio.file");
            return Ok(UnitOutcome::unchanged(unit));
        }
        if !uses_method(&unit, calls::create_temp_file()) {
            return Ok(UnitOutcome::unchanged(unit));
        }
        let source_path = unit.source_path.clone();
        let (mut rewritten, summary) =
            secure_temp_files(unit).map_err(|source| RewriteError::Template {
                unit: source_path.clone(),
                source,
            })?;
        let changed = summary.chains + summary.calls > 0;
        let effects = if changed {
            imports::apply(&mut rewritten, &summary.requests)
        } else {
            ImportEffects::default()
        };
        debug!(
            unit = %source_path,
            chains = summary.chains,
            calls = summary.calls,
            "Secure temp file rewrite"
        );
        Ok(UnitOutcome {
            unit: rewritten,
            effects,
            changed,
        })
    }
}

impl Rule for SecureTempFileCreation {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn apply(&self, unit: CompilationUnit, ctx: &RunContext) -> Result<UnitOutcome, RewriteError> {
        if !target::in_scope(self.target, &unit) {
            return Ok(UnitOutcome::unchanged(unit));
        }
        let outcome = self.rewrite(unit)?;
        if target::escalates(self.target, &outcome.unit, outcome.changed) {
            ctx.escalate(Arc::new(Self::new(self.id.clone(), TargetMode::AllSource)));
        }
        Ok(outcome)
    }
}
