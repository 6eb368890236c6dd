//! Decides which units a rule instance touches and when its scope widens.

use ir::CompilationUnit;
use loader::TargetMode;
use tracing::debug;

use crate::path::is_test_source;

/// Whether a rule configured with `target` rewrites `unit`.
pub fn in_scope(target: TargetMode, unit: &CompilationUnit) -> bool {
    if target.skips_test_sources() && is_test_source(&unit.source_path) {
        debug!(unit = %unit.source_path, target = %target, "Test source skipped");
        return false;
    }
    true
}

/// Whether a change made to an in-scope unit widens the rule to all
/// sources.
pub fn escalates(target: TargetMode, unit: &CompilationUnit, changed: bool) -> bool {
    changed
        && target == TargetMode::AllSourceWhenNonTestDetected
        && !is_test_source(&unit.source_path)
}
