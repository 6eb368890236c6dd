//! Structural statement deletion.
//!
//! Removes the statement holding a given invocation without leaving the
//! surrounding construct syntactically broken:
//!
//! * the whole body of a loop, `if` branch or label becomes `{}`
//! * a statement directly inside a block or `case` group is dropped
//! * an invocation used as a value becomes the literal `true`

use ir::{Block, Expression, NodeId, Statement, StatementKind};
use std::collections::BTreeSet;
use tracing::trace;

use crate::imports::TypeCollector;
use crate::visit::{fold_expression_children, fold_statement_children, Fold};

struct StatementDeleter {
    target: NodeId,
    removed_types: BTreeSet<String>,
}

impl StatementDeleter {
    fn is_target(&self, stmt: &Statement) -> bool {
        stmt.id == self.target || stmt.as_expression().is_some_and(|e| e.id == self.target)
    }

    fn take(&mut self, stmt: &Statement) {
        self.removed_types.extend(TypeCollector::of_statement(stmt));
    }

    /// Empties `body` if it is the target, folds it otherwise.
    fn body(&mut self, body: Box<Statement>) -> Box<Statement> {
        if self.is_target(&body) {
            self.take(&body);
            Box::new(Statement::new(StatementKind::Block(Block::empty())))
        } else {
            Box::new(self.fold_statement(*body))
        }
    }

    fn sequence(&mut self, statements: Vec<Statement>) -> Vec<Statement> {
        let mut out = Vec::with_capacity(statements.len());
        for stmt in statements {
            if self.is_target(&stmt) {
                self.take(&stmt);
            } else {
                out.push(self.fold_statement(stmt));
            }
        }
        out
    }
}

impl Fold for StatementDeleter {
    fn fold_block(&mut self, block: Block) -> Block {
        Block {
            id: block.id,
            statements: self.sequence(block.statements),
        }
    }

    fn fold_statement(&mut self, stmt: Statement) -> Statement {
        let kind = match stmt.kind {
            StatementKind::If(mut i) => {
                i.condition = self.fold_expression(i.condition);
                i.then_part = self.body(i.then_part);
                i.else_part = i.else_part.map(|e| self.body(e));
                StatementKind::If(i)
            }
            StatementKind::ForLoop(mut l) => {
                l.init = self.sequence(l.init);
                l.condition = l.condition.map(|c| self.fold_expression(c));
                l.body = self.body(l.body);
                l.update = self.sequence(l.update);
                StatementKind::ForLoop(l)
            }
            StatementKind::ForEachLoop(mut l) => {
                l.iterable = self.fold_expression(l.iterable);
                l.body = self.body(l.body);
                StatementKind::ForEachLoop(l)
            }
            StatementKind::WhileLoop(mut l) => {
                l.condition = self.fold_expression(l.condition);
                l.body = self.body(l.body);
                StatementKind::WhileLoop(l)
            }
            StatementKind::DoWhileLoop(mut l) => {
                l.body = self.body(l.body);
                l.condition = self.fold_expression(l.condition);
                StatementKind::DoWhileLoop(l)
            }
            StatementKind::Labeled(mut l) => {
                l.body = self.body(l.body);
                StatementKind::Labeled(l)
            }
            other => {
                return fold_statement_children(
                    self,
                    Statement {
                        id: stmt.id,
                        kind: other,
                    },
                )
            }
        };
        Statement { id: stmt.id, kind }
    }

    fn fold_expression(&mut self, expr: Expression) -> Expression {
        if expr.id == self.target {
            self.removed_types.extend(TypeCollector::of_expression(&expr));
            return Expression::boolean(true);
        }
        fold_expression_children(self, expr)
    }
}

/// Deletes the statement or expression identified by `target` from `block`.
///
/// Returns the rewritten block and the class types referenced by whatever
/// was removed. A block without the target is returned unchanged.
pub fn delete_statement(block: Block, target: NodeId) -> (Block, BTreeSet<String>) {
    let mut deleter = StatementDeleter {
        target,
        removed_types: BTreeSet::new(),
    };
    let block = deleter.fold_block(block);
    if !deleter.removed_types.is_empty() {
        trace!(target = %target, types = ?deleter.removed_types, "Statement deleted");
    }
    (block, deleter.removed_types)
}
