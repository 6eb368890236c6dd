//! Typed syntax tree for Java compilation units.
//!
//! Nodes are plain values: a rewrite produces new nodes instead of mutating
//! the input. Every [`Statement`] and [`Expression`] carries a [`NodeId`] so
//! passes can refer to a node without holding a pointer into the tree.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::types::{JavaType, MethodType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(Uuid);

impl NodeId {
    /// Identity for a freshly synthesized node.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One source file as handed over by the front end.
pub struct CompilationUnit {
    pub source_path: String,
    /// Major language level declared for the unit, if known.
    #[serde(default)]
    pub java_version: Option<u32>,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

impl CompilationUnit {
    pub fn new(source_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            java_version: None,
            package: None,
            imports: Vec::new(),
            classes: Vec::new(),
        }
    }

    pub fn has_import(&self, name: &str) -> bool {
        self.imports.iter().any(|i| !i.is_static && i.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Import {
    pub name: String,
    #[serde(default)]
    pub is_static: bool,
}

impl Import {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Class, interface or enum body. Anonymous classes have an empty `name`.
///
/// Members are grouped by kind; each group keeps source order and renders
/// in the order declared here.
pub struct ClassDeclaration {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDeclaration>,
    #[serde(default)]
    pub initializers: Vec<Initializer>,
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
    /// Member classes.
    #[serde(default)]
    pub classes: Vec<ClassDeclaration>,
}

impl ClassDeclaration {
    pub fn new(name: impl Into<String>, methods: Vec<MethodDeclaration>) -> Self {
        Self {
            id: NodeId::random(),
            name: name.into(),
            fields: Vec::new(),
            initializers: Vec::new(),
            methods,
            classes: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDeclaration) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_initializer(mut self, is_static: bool, body: Block) -> Self {
        self.initializers.push(Initializer {
            id: NodeId::random(),
            is_static,
            body,
        });
        self
    }

    pub fn with_class(mut self, class: ClassDeclaration) -> Self {
        self.classes.push(class);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDeclaration {
    pub id: NodeId,
    /// Modifiers as written, e.g. `private static final`.
    #[serde(default)]
    pub modifiers: Vec<String>,
    pub declarations: VariableDeclarations,
}

impl FieldDeclaration {
    /// Single-variable field `modifiers ty name = init;`.
    pub fn new(modifiers: &[&str], ty: JavaType, name: impl Into<String>, init: Option<Expression>) -> Self {
        Self {
            id: NodeId::random(),
            modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
            declarations: VariableDeclarations {
                declared_type: ty,
                variables: vec![NamedVariable::new(name, init)],
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Instance or `static` initializer block.
pub struct Initializer {
    pub id: NodeId,
    #[serde(default)]
    pub is_static: bool,
    pub body: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodDeclaration {
    pub id: NodeId,
    pub name: String,
    /// `None` for `void`.
    #[serde(default)]
    pub return_type: Option<JavaType>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub throws: Vec<JavaType>,
    /// Absent for abstract and interface methods.
    #[serde(default)]
    pub body: Option<Block>,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>, body: Block) -> Self {
        Self {
            id: NodeId::random(),
            name: name.into(),
            return_type: None,
            parameters: Vec::new(),
            throws: Vec::new(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: JavaType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Braced statement sequence. Order is program order.
pub struct Block {
    pub id: NodeId,
    #[serde(default)]
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            id: NodeId::random(),
            statements,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statement {
    pub id: NodeId,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum StatementKind {
    Block(Block),
    /// Expression evaluated for its effect: calls, assignments.
    Expression(Expression),
    VariableDeclarations(VariableDeclarations),
    If(If),
    ForLoop(ForLoop),
    ForEachLoop(ForEachLoop),
    WhileLoop(WhileLoop),
    DoWhileLoop(DoWhileLoop),
    Try(Try),
    Switch(Switch),
    Synchronized(Synchronized),
    Labeled(Labeled),
    /// `break`, with an optional label.
    Break(Option<String>),
    Continue(Option<String>),
    Return(Option<Expression>),
    Throw(Expression),
    Empty,
}

impl Statement {
    pub fn new(kind: StatementKind) -> Self {
        Self {
            id: NodeId::random(),
            kind,
        }
    }

    pub fn expression(expr: Expression) -> Self {
        Self::new(StatementKind::Expression(expr))
    }

    pub fn block(statements: Vec<Statement>) -> Self {
        Self::new(StatementKind::Block(Block::new(statements)))
    }

    /// Single-variable declaration `ty name = init;`.
    pub fn declaration(ty: JavaType, name: impl Into<String>, init: Option<Expression>) -> Self {
        Self::new(StatementKind::VariableDeclarations(VariableDeclarations {
            declared_type: ty,
            variables: vec![NamedVariable::new(name, init)],
        }))
    }

    pub fn if_then(condition: Expression, then_part: Statement, else_part: Option<Statement>) -> Self {
        Self::new(StatementKind::If(If {
            condition,
            then_part: Box::new(then_part),
            else_part: else_part.map(Box::new),
        }))
    }

    pub fn while_loop(condition: Expression, body: Statement) -> Self {
        Self::new(StatementKind::WhileLoop(WhileLoop {
            condition,
            body: Box::new(body),
        }))
    }

    pub fn do_while(body: Statement, condition: Expression) -> Self {
        Self::new(StatementKind::DoWhileLoop(DoWhileLoop {
            body: Box::new(body),
            condition,
        }))
    }

    pub fn throw(expr: Expression) -> Self {
        Self::new(StatementKind::Throw(expr))
    }

    pub fn switch(selector: Expression, cases: Vec<SwitchCase>) -> Self {
        Self::new(StatementKind::Switch(Switch { selector, cases }))
    }

    pub fn synchronized(lock: Expression, statements: Vec<Statement>) -> Self {
        Self::new(StatementKind::Synchronized(Synchronized {
            lock,
            body: Block::new(statements),
        }))
    }

    pub fn labeled(label: impl Into<String>, body: Statement) -> Self {
        Self::new(StatementKind::Labeled(Labeled {
            label: label.into(),
            body: Box::new(body),
        }))
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match &self.kind {
            StatementKind::Expression(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match &self.kind {
            StatementKind::Block(b) => Some(b),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariableDeclarations {
    pub declared_type: JavaType,
    pub variables: Vec<NamedVariable>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NamedVariable {
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expression>,
}

impl NamedVariable {
    pub fn new(name: impl Into<String>, initializer: Option<Expression>) -> Self {
        Self {
            id: NodeId::random(),
            name: name.into(),
            initializer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct If {
    pub condition: Expression,
    pub then_part: Box<Statement>,
    #[serde(default)]
    pub else_part: Option<Box<Statement>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForLoop {
    #[serde(default)]
    pub init: Vec<Statement>,
    #[serde(default)]
    pub condition: Option<Expression>,
    #[serde(default)]
    pub update: Vec<Statement>,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForEachLoop {
    pub variable: Parameter,
    pub iterable: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DoWhileLoop {
    pub body: Box<Statement>,
    pub condition: Expression,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Try {
    pub body: Block,
    #[serde(default)]
    pub catches: Vec<Catch>,
    #[serde(default)]
    pub finally: Option<Block>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catch {
    pub parameter: Parameter,
    pub body: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Switch {
    pub selector: Expression,
    #[serde(default)]
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One `case` group. No labels means `default`.
pub struct SwitchCase {
    #[serde(default)]
    pub labels: Vec<Expression>,
    /// Statements of the group; printed without braces.
    pub body: Block,
}

impl SwitchCase {
    pub fn new(labels: Vec<Expression>, statements: Vec<Statement>) -> Self {
        Self {
            labels,
            body: Block::new(statements),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Synchronized {
    pub lock: Expression,
    pub body: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Labeled {
    pub label: String,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expression {
    pub id: NodeId,
    pub kind: ExpressionKind,
    /// Static type attributed by the front end.
    #[serde(default)]
    pub ty: Option<JavaType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExpressionKind {
    Identifier(String),
    Literal(Literal),
    MethodInvocation(MethodInvocation),
    NewClass(NewClass),
    FieldAccess(FieldAccess),
    Assignment(Assignment),
    Binary(Binary),
    Unary(Unary),
    Parentheses(Box<Expression>),
    /// `condition ? then_part : else_part`
    Conditional(Conditional),
    Cast(Cast),
    Lambda(Lambda),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Int(i64),
    Char(char),
    String(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MethodInvocation {
    /// Receiver; absent for unqualified calls.
    #[serde(default)]
    pub select: Option<Box<Expression>>,
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
    #[serde(default)]
    pub method_type: Option<MethodType>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewClass {
    /// Class name as written.
    pub class: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
    /// Anonymous class body.
    #[serde(default)]
    pub body: Option<Box<ClassDeclaration>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldAccess {
    pub target: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub variable: Box<Expression>,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BinaryOperator {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Addition => "+",
            BinaryOperator::Subtraction => "-",
            BinaryOperator::Multiplication => "*",
            BinaryOperator::Division => "/",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Binary {
    pub operator: BinaryOperator,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unary {
    pub operator: UnaryOperator,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conditional {
    pub condition: Box<Expression>,
    pub then_part: Box<Expression>,
    pub else_part: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cast {
    pub ty: JavaType,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lambda {
    /// Parameter names; types are left to inference.
    #[serde(default)]
    pub parameters: Vec<String>,
    pub body: LambdaBody,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LambdaBody {
    Expression(Box<Expression>),
    Block(Block),
}

impl Expression {
    pub fn new(kind: ExpressionKind, ty: Option<JavaType>) -> Self {
        Self {
            id: NodeId::random(),
            kind,
            ty,
        }
    }

    pub fn identifier(name: impl Into<String>, ty: Option<JavaType>) -> Self {
        Self::new(ExpressionKind::Identifier(name.into()), ty)
    }

    pub fn null() -> Self {
        Self::new(ExpressionKind::Literal(Literal::Null), Some(JavaType::Null))
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(
            ExpressionKind::Literal(Literal::Boolean(value)),
            Some(JavaType::boolean()),
        )
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(
            ExpressionKind::Literal(Literal::String(value.into())),
            Some(JavaType::string()),
        )
    }

    pub fn invocation(
        select: Option<Expression>,
        name: impl Into<String>,
        arguments: Vec<Expression>,
        method_type: Option<MethodType>,
    ) -> Self {
        let ty = method_type.as_ref().and_then(|m| m.return_type.clone());
        Self::new(
            ExpressionKind::MethodInvocation(MethodInvocation {
                select: select.map(Box::new),
                name: name.into(),
                arguments,
                method_type,
            }),
            ty,
        )
    }

    pub fn new_class(fqn: &str, arguments: Vec<Expression>) -> Self {
        let ty = JavaType::class(fqn);
        Self::new(
            ExpressionKind::NewClass(NewClass {
                class: ty.simple_name().to_string(),
                arguments,
                body: None,
            }),
            Some(ty),
        )
    }

    pub fn field_access(target: Expression, name: impl Into<String>, ty: Option<JavaType>) -> Self {
        Self::new(
            ExpressionKind::FieldAccess(FieldAccess {
                target: Box::new(target),
                name: name.into(),
            }),
            ty,
        )
    }

    pub fn assignment(variable: Expression, value: Expression) -> Self {
        let ty = variable.ty.clone();
        Self::new(
            ExpressionKind::Assignment(Assignment {
                variable: Box::new(variable),
                value: Box::new(value),
            }),
            ty,
        )
    }

    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression, ty: Option<JavaType>) -> Self {
        Self::new(
            ExpressionKind::Binary(Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
            ty,
        )
    }

    pub fn not(expression: Expression) -> Self {
        Self::new(
            ExpressionKind::Unary(Unary {
                operator: UnaryOperator::Not,
                expression: Box::new(expression),
            }),
            Some(JavaType::boolean()),
        )
    }

    pub fn parentheses(inner: Expression) -> Self {
        let ty = inner.ty.clone();
        Self::new(ExpressionKind::Parentheses(Box::new(inner)), ty)
    }

    pub fn conditional(condition: Expression, then_part: Expression, else_part: Expression) -> Self {
        let ty = then_part.ty.clone().or_else(|| else_part.ty.clone());
        Self::new(
            ExpressionKind::Conditional(Conditional {
                condition: Box::new(condition),
                then_part: Box::new(then_part),
                else_part: Box::new(else_part),
            }),
            ty,
        )
    }

    pub fn cast(ty: JavaType, expression: Expression) -> Self {
        Self::new(
            ExpressionKind::Cast(Cast {
                ty: ty.clone(),
                expression: Box::new(expression),
            }),
            Some(ty),
        )
    }

    /// Lambda with an expression body.
    pub fn lambda(parameters: &[&str], body: Expression, ty: Option<JavaType>) -> Self {
        Self::new(
            ExpressionKind::Lambda(Lambda {
                parameters: parameters.iter().map(|p| p.to_string()).collect(),
                body: LambdaBody::Expression(Box::new(body)),
            }),
            ty,
        )
    }

    /// Lambda with a block body.
    pub fn lambda_block(parameters: &[&str], statements: Vec<Statement>, ty: Option<JavaType>) -> Self {
        Self::new(
            ExpressionKind::Lambda(Lambda {
                parameters: parameters.iter().map(|p| p.to_string()).collect(),
                body: LambdaBody::Block(Block::new(statements)),
            }),
            ty,
        )
    }

    /// `new T(args) { body }` for an anonymous class.
    pub fn anonymous_class(fqn: &str, arguments: Vec<Expression>, body: ClassDeclaration) -> Self {
        let mut expr = Self::new_class(fqn, arguments);
        if let ExpressionKind::NewClass(n) = &mut expr.kind {
            n.body = Some(Box::new(body));
        }
        expr
    }

    pub fn as_method_invocation(&self) -> Option<&MethodInvocation> {
        match &self.kind {
            ExpressionKind::MethodInvocation(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            ExpressionKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_assignment(&self) -> Option<&Assignment> {
        match &self.kind {
            ExpressionKind::Assignment(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self.kind, ExpressionKind::Literal(Literal::Null))
    }
}
