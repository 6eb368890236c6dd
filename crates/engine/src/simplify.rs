//! Folds `if` statements whose condition is a boolean constant.
//!
//! Meant to run after the secure rewrite, which leaves `true` behind where
//! a legacy call was used as a guard.

use ir::{
    BinaryOperator, Block, CompilationUnit, Expression, ExpressionKind, Literal, NodeId,
    Statement, StatementKind, UnaryOperator,
};
use std::collections::HashSet;

use crate::visit::{fold_statement_children, fold_unit, Fold};

/// Value of `expr` when it is built only from boolean literals.
pub fn constant_value(expr: &Expression) -> Option<bool> {
    match &expr.kind {
        ExpressionKind::Literal(Literal::Boolean(b)) => Some(*b),
        ExpressionKind::Parentheses(inner) => constant_value(inner),
        ExpressionKind::Unary(u) if u.operator == UnaryOperator::Not => {
            constant_value(&u.expression).map(|b| !b)
        }
        ExpressionKind::Binary(b) => {
            let (l, r) = (constant_value(&b.left)?, constant_value(&b.right)?);
            match b.operator {
                BinaryOperator::And => Some(l && r),
                BinaryOperator::Or => Some(l || r),
                BinaryOperator::Equal => Some(l == r),
                BinaryOperator::NotEqual => Some(l != r),
                _ => None,
            }
        }
        _ => None,
    }
}

#[derive(Default)]
struct BranchSimplifier {
    /// Blocks that replaced an `if`; spliced into the enclosing sequence.
    inlined: HashSet<NodeId>,
    folded: usize,
}

fn declares_variables(block: &Block) -> bool {
    block
        .statements
        .iter()
        .any(|s| matches!(s.kind, StatementKind::VariableDeclarations(_)))
}

impl Fold for BranchSimplifier {
    fn fold_block(&mut self, block: Block) -> Block {
        let mut statements = Vec::with_capacity(block.statements.len());
        for stmt in block.statements {
            let stmt = self.fold_statement(stmt);
            match stmt.kind {
                StatementKind::Block(inner) if self.inlined.remove(&stmt.id) => {
                    if declares_variables(&inner) {
                        statements.push(Statement {
                            id: stmt.id,
                            kind: StatementKind::Block(inner),
                        });
                    } else {
                        statements.extend(inner.statements);
                    }
                }
                kind => statements.push(Statement { id: stmt.id, kind }),
            }
        }
        Block {
            id: block.id,
            statements,
        }
    }

    fn fold_statement(&mut self, stmt: Statement) -> Statement {
        let stmt = fold_statement_children(self, stmt);
        let value = match &stmt.kind {
            StatementKind::If(i) => constant_value(&i.condition),
            _ => None,
        };
        let Some(value) = value else {
            return stmt;
        };
        let i = match stmt.kind {
            StatementKind::If(i) => i,
            kind => return Statement { id: stmt.id, kind },
        };
        self.folded += 1;
        let taken = if value { Some(*i.then_part) } else { i.else_part.map(|e| *e) };
        let replacement = match taken {
            Some(block @ Statement {
                kind: StatementKind::Block(_),
                ..
            }) => block,
            Some(other) => Statement::block(vec![other]),
            None => Statement::block(Vec::new()),
        };
        self.inlined.insert(replacement.id);
        replacement
    }
}

/// Simplifies constant branches in every body of `unit`.
///
/// Returns the unit and the number of `if` statements folded.
pub fn simplify_constant_branches(unit: CompilationUnit) -> (CompilationUnit, usize) {
    let mut s = BranchSimplifier::default();
    let unit = fold_unit(&mut s, unit);
    (unit, s.folded)
}
