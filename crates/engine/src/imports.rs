use ir::{
    ClassDeclaration, CompilationUnit, Expression, ExpressionKind, Import, JavaType, Statement,
    StatementKind,
};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

use crate::visit::{walk_class, walk_expression, walk_statement, walk_unit, Visit};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Import changes applied to one unit.
pub struct ImportEffects {
    pub added: BTreeSet<String>,
    pub removed: BTreeSet<String>,
}

impl ImportEffects {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn merge(&mut self, other: ImportEffects) {
        for name in other.added {
            if !self.removed.remove(&name) {
                self.added.insert(name);
            }
        }
        for name in other.removed {
            if !self.added.remove(&name) {
                self.removed.insert(name);
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Import changes requested while rewriting, before they are checked
/// against the unit.
pub struct ImportRequests {
    pub add: BTreeSet<String>,
    /// Types whose last reference may have been removed.
    pub maybe_remove: BTreeSet<String>,
}

impl ImportRequests {
    pub fn add(&mut self, fqn: impl Into<String>) {
        self.add.insert(fqn.into());
    }

    pub fn maybe_remove(&mut self, types: impl IntoIterator<Item = String>) {
        self.maybe_remove.extend(types);
    }
}

/// Collects every fully qualified class type mentioned by visited nodes.
#[derive(Default)]
pub(crate) struct TypeCollector {
    pub(crate) types: BTreeSet<String>,
}

impl TypeCollector {
    fn record(&mut self, ty: &JavaType) {
        if let Some(fqn) = ty.fully_qualified() {
            self.types.insert(fqn.to_string());
        }
    }

    pub(crate) fn of_statement(stmt: &Statement) -> BTreeSet<String> {
        let mut c = Self::default();
        c.visit_statement(stmt);
        c.types
    }

    pub(crate) fn of_expression(expr: &Expression) -> BTreeSet<String> {
        let mut c = Self::default();
        c.visit_expression(expr);
        c.types
    }
}

impl Visit for TypeCollector {
    fn visit_class(&mut self, class: &ClassDeclaration) {
        for field in &class.fields {
            self.record(&field.declarations.declared_type);
        }
        for method in &class.methods {
            for p in &method.parameters {
                self.record(&p.ty);
            }
            for t in &method.throws {
                self.record(t);
            }
            if let Some(r) = &method.return_type {
                self.record(r);
            }
        }
        walk_class(self, class);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match &stmt.kind {
            StatementKind::VariableDeclarations(d) => self.record(&d.declared_type),
            StatementKind::ForEachLoop(f) => self.record(&f.variable.ty),
            StatementKind::Try(t) => {
                for c in &t.catches {
                    self.record(&c.parameter.ty);
                }
            }
            _ => {}
        }
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if let Some(ty) = &expr.ty {
            self.record(ty);
        }
        if let ExpressionKind::Cast(c) = &expr.kind {
            self.record(&c.ty);
        }
        if let ExpressionKind::MethodInvocation(m) = &expr.kind {
            if let Some(mt) = &m.method_type {
                self.types.insert(mt.declaring_type.clone());
                for p in &mt.parameter_types {
                    self.record(p);
                }
                if let Some(r) = &mt.return_type {
                    self.record(r);
                }
            }
        }
        walk_expression(self, expr);
    }
}

/// Every class type the unit's declarations and bodies refer to.
pub fn referenced_types(unit: &CompilationUnit) -> BTreeSet<String> {
    let mut c = TypeCollector::default();
    walk_unit(&mut c, unit);
    c.types
}

fn covered(unit: &CompilationUnit, fqn: &str) -> bool {
    let package = fqn.rsplit_once('.').map(|(p, _)| p);
    unit.has_import(fqn)
        || package.is_some_and(|p| {
            p == "java.lang"
                || unit.package.as_deref() == Some(p)
                || unit.has_import(&format!("{p}.*"))
        })
}

/// Applies `requests` to the import list of `unit`.
///
/// Additions are skipped when the type is already visible. A type is only
/// removed when nothing in the unit refers to it any more.
pub fn apply(unit: &mut CompilationUnit, requests: &ImportRequests) -> ImportEffects {
    let mut effects = ImportEffects::default();
    for fqn in &requests.add {
        if covered(unit, fqn) {
            continue;
        }
        let pos = unit
            .imports
            .iter()
            .position(|i| !i.is_static && i.name.as_str() > fqn.as_str())
            .or_else(|| {
                unit.imports
                    .iter()
                    .rposition(|i| !i.is_static)
                    .map(|p| p + 1)
            })
            .unwrap_or(0);
        unit.imports.insert(pos, Import::new(fqn.as_str()));
        debug!(unit = %unit.source_path, import = %fqn, "Import added");
        effects.added.insert(fqn.clone());
    }
    if requests.maybe_remove.iter().any(|fqn| unit.has_import(fqn)) {
        let still_used = referenced_types(unit);
        for fqn in &requests.maybe_remove {
            if still_used.contains(fqn) || !unit.has_import(fqn) {
                continue;
            }
            unit.imports.retain(|i| i.is_static || &i.name != fqn);
            debug!(unit = %unit.source_path, import = %fqn, "Import removed");
            effects.removed.insert(fqn.clone());
        }
    }
    effects
}
