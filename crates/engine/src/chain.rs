//! Finds the create, delete, mkdir sequence on one identifier.

use ir::{Block, ClassDeclaration, Expression, ExpressionKind, NodeId, Statement};
use patterns::MethodMatcher;

use crate::binding::CandidateBinding;
use crate::calls::{self, JAVA_IO_FILE};
use crate::visit::{walk_expression, Visit};

#[derive(Debug, Clone, PartialEq)]
/// Roles of one hijack chain found in a block.
pub struct HijackChainRecord {
    pub binding: CandidateBinding,
    /// Statement creating the temporary file.
    pub create: Option<NodeId>,
    /// Replacement for `create`, filled in by the rewriter.
    pub secure_create: Option<Statement>,
    /// `x.delete()` invocation.
    pub delete: Option<NodeId>,
    /// `x.mkdir()` or `x.mkdirs()` invocation.
    pub mkdir: Option<NodeId>,
}

impl HijackChainRecord {
    fn new(binding: CandidateBinding) -> Self {
        Self {
            binding,
            create: None,
            secure_create: None,
            delete: None,
            mkdir: None,
        }
    }

    /// All roles found in the block.
    pub fn has_all_roles(&self) -> bool {
        self.create.is_some() && self.delete.is_some() && self.mkdir.is_some()
    }

    /// Eligible for rewriting: every role is present and a replacement has
    /// been synthesized.
    pub fn is_complete(&self) -> bool {
        self.has_all_roles() && self.secure_create.is_some()
    }
}

#[derive(Clone, Copy)]
enum Role {
    Delete,
    Mkdir,
}

/// Collects `name.<method>()` invocations in evaluation order.
struct ReceiverCalls<'a> {
    name: &'a str,
    found: Vec<(NodeId, Role)>,
}

impl ReceiverCalls<'_> {
    fn role(&self, expr: &Expression) -> Option<Role> {
        let call = expr.as_method_invocation()?;
        let select = call.select.as_deref()?;
        if select.as_identifier() != Some(self.name) {
            return None;
        }
        // A receiver that is attributed must still be a `java.io.File`.
        if select.ty.as_ref().is_some_and(|t| !t.is_class(JAVA_IO_FILE)) {
            return None;
        }
        if calls::delete().matches(call) {
            Some(Role::Delete)
        } else if calls::mkdir().matches(call) || calls::mkdirs().matches(call) {
            Some(Role::Mkdir)
        } else {
            None
        }
    }
}

impl Visit for ReceiverCalls<'_> {
    // Lambda and anonymous class bodies run at some later point, if at all.
    fn visit_class(&mut self, _: &ClassDeclaration) {}

    fn visit_expression(&mut self, expr: &Expression) {
        if matches!(expr.kind, ExpressionKind::Lambda(_)) {
            return;
        }
        walk_expression(self, expr);
        if let Some(role) = self.role(expr) {
            self.found.push((expr.id, role));
        }
    }
}

/// Scans `block` in program order for the chain started by `binding`.
///
/// The create statement must be a direct statement of `block`; the delete
/// and mkdir calls may sit anywhere inside later statements, including
/// nested conditions. The first delete after the create and the first
/// mkdir after that delete are taken. A binding not declared as
/// `java.io.File` never yields roles beyond `create`.
pub fn scan(block: &Block, binding: &CandidateBinding) -> HijackChainRecord {
    let mut record = HijackChainRecord::new(binding.clone());
    let is_file = binding
        .declared_type
        .as_ref()
        .is_some_and(|t| t.is_class(JAVA_IO_FILE));

    for stmt in &block.statements {
        if record.create.is_none() {
            if stmt.id == binding.statement {
                record.create = Some(stmt.id);
            }
            continue;
        }
        if !is_file {
            break;
        }
        let mut calls = ReceiverCalls {
            name: &binding.name,
            found: Vec::new(),
        };
        calls.visit_statement(stmt);
        for (id, role) in calls.found {
            match role {
                Role::Delete if record.delete.is_none() => record.delete = Some(id),
                Role::Mkdir if record.delete.is_some() && record.mkdir.is_none() => {
                    record.mkdir = Some(id)
                }
                _ => {}
            }
        }
        if record.mkdir.is_some() {
            break;
        }
    }
    record
}

/// Scans every binding of `block` that is created through `create`.
pub fn scan_all(block: &Block, create: &MethodMatcher) -> Vec<HijackChainRecord> {
    crate::binding::bindings(block, create)
        .iter()
        .map(|b| scan(block, b))
        .collect()
}
