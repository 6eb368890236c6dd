#![allow(dead_code)]

use engine::CompilationUnit;
use ir::{
    Block, ClassDeclaration, Expression, Import, JavaType, MethodDeclaration, MethodType,
    Statement,
};

pub const FILE: &str = "java.io.File";

pub fn file_ty() -> JavaType {
    JavaType::class(FILE)
}

pub fn var(name: &str) -> Expression {
    Expression::identifier(name, Some(file_ty()))
}

pub fn create(args: Vec<Expression>) -> Expression {
    Expression::invocation(
        Some(Expression::identifier("File", Some(file_ty()))),
        "createTempFile",
        args,
        Some(MethodType {
            declaring_type: FILE.into(),
            name: "createTempFile".into(),
            parameter_types: Vec::new(),
            return_type: Some(file_ty()),
            is_static: true,
        }),
    )
}

pub fn call(receiver: &str, method: &str) -> Expression {
    Expression::invocation(
        Some(var(receiver)),
        method,
        Vec::new(),
        Some(MethodType {
            declaring_type: FILE.into(),
            name: method.into(),
            parameter_types: Vec::new(),
            return_type: Some(JavaType::boolean()),
            is_static: false,
        }),
    )
}

/// `File <name> = File.createTempFile("hello", "world");`
pub fn temp_file(name: &str) -> Statement {
    Statement::declaration(
        file_ty(),
        name,
        Some(create(vec![Expression::string("hello"), Expression::string("world")])),
    )
}

pub fn unit(path: &str, body: Vec<Statement>) -> CompilationUnit {
    let mut unit = CompilationUnit::new(path);
    unit.java_version = Some(17);
    unit.imports.push(Import::new(FILE));
    unit.classes.push(ClassDeclaration::new(
        "Test",
        vec![MethodDeclaration::new("test", Block::new(body))],
    ));
    unit
}

pub fn body_text(unit: &CompilationUnit) -> Vec<String> {
    unit.classes[0].methods[0]
        .body
        .as_ref()
        .map(|b| b.statements.iter().map(|s| s.to_java()).collect())
        .unwrap_or_default()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
