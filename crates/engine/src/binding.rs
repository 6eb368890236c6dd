use ir::{Block, Expression, JavaType, NodeId, Statement, StatementKind};
use patterns::MethodMatcher;

#[derive(Debug, Clone, PartialEq)]
/// Identifier that receives the result of a matched creation call.
pub struct CandidateBinding {
    pub name: String,
    /// Declared type of the variable, or the attributed type of the
    /// assigned identifier.
    pub declared_type: Option<JavaType>,
    /// Statement holding the assignment or declaration.
    pub statement: NodeId,
    /// The matched invocation itself.
    pub call: NodeId,
}

fn matched_call<'a>(expr: &'a Expression, create: &MethodMatcher) -> Option<&'a Expression> {
    create.match_expression(expr).map(|_| expr)
}

/// Binding introduced by `stmt`, if it is `x = create(..);` with a plain
/// identifier on the left or `T x = create(..);` declaring a single name.
///
/// Anything else, including aliases through intermediate copies, yields
/// `None`.
pub fn resolve(stmt: &Statement, create: &MethodMatcher) -> Option<CandidateBinding> {
    match &stmt.kind {
        StatementKind::Expression(expr) => {
            let assignment = expr.as_assignment()?;
            let name = assignment.variable.as_identifier()?;
            let call = matched_call(&assignment.value, create)?;
            Some(CandidateBinding {
                name: name.to_string(),
                declared_type: assignment.variable.ty.clone(),
                statement: stmt.id,
                call: call.id,
            })
        }
        StatementKind::VariableDeclarations(decls) => {
            let [var] = decls.variables.as_slice() else {
                return None;
            };
            let call = matched_call(var.initializer.as_ref()?, create)?;
            Some(CandidateBinding {
                name: var.name.clone(),
                declared_type: Some(decls.declared_type.clone()),
                statement: stmt.id,
                call: call.id,
            })
        }
        _ => None,
    }
}

/// Bindings made by the direct statements of `block`, in program order.
pub fn bindings(block: &Block, create: &MethodMatcher) -> Vec<CandidateBinding> {
    block
        .statements
        .iter()
        .filter_map(|s| resolve(s, create))
        .collect()
}
