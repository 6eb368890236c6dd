use ir::{CompilationUnit, Expression};
use patterns::MethodMatcher;

use crate::visit::{walk_expression, walk_unit, Visit};

struct UsesMethod<'a> {
    matcher: &'a MethodMatcher,
    found: bool,
}

impl Visit for UsesMethod<'_> {
    fn visit_expression(&mut self, expr: &Expression) {
        if self.found {
            return;
        }
        if self.matcher.match_expression(expr).is_some() {
            self.found = true;
            return;
        }
        walk_expression(self, expr);
    }
}

/// Whether any invocation in `unit` matches `matcher`.
pub fn uses_method(unit: &CompilationUnit, matcher: &MethodMatcher) -> bool {
    let mut v = UsesMethod {
        matcher,
        found: false,
    };
    walk_unit(&mut v, unit);
    v.found
}
