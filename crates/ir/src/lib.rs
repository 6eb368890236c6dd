//! Typed Java syntax tree shared by the rewrite rules.
//!
//! The front end hands over one [`CompilationUnit`] per source file,
//! usually as JSON. Rules consume the tree and return a new one; the
//! [`render`] module turns any node back into Java text for inspection.

pub mod ast;
pub mod render;
pub mod types;

pub use ast::{
    Assignment, Binary, BinaryOperator, Block, Cast, Catch, ClassDeclaration, CompilationUnit,
    Conditional, DoWhileLoop, Expression, ExpressionKind, FieldAccess, FieldDeclaration,
    ForEachLoop, ForLoop, If, Import, Initializer, Labeled, Lambda, LambdaBody, Literal,
    MethodDeclaration, MethodInvocation, NamedVariable, NewClass, NodeId, Parameter, Statement,
    StatementKind, Switch, SwitchCase, Synchronized, Try, Unary, UnaryOperator,
    VariableDeclarations, WhileLoop,
};
pub use types::{JavaType, MethodType, Primitive, JAVA_LANG_OBJECT, JAVA_LANG_STRING};

impl CompilationUnit {
    /// Reads a unit from its JSON interchange form.
    pub fn from_json(data: &str) -> serde_json::Result<Self> {
        serde_json::from_str(data)
    }

    /// Exports the unit to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests;
