//! Builders for attributed `java.io.File` code used across unit tests.

use ir::{
    Block, ClassDeclaration, CompilationUnit, Expression, Import, JavaType, MethodDeclaration,
    MethodType, Statement,
};

use crate::calls::JAVA_IO_FILE;

pub(crate) fn file_ty() -> JavaType {
    JavaType::class(JAVA_IO_FILE)
}

pub(crate) fn var(name: &str) -> Expression {
    Expression::identifier(name, Some(file_ty()))
}

/// `File.createTempFile(args..)`
pub(crate) fn create(args: Vec<Expression>) -> Expression {
    Expression::invocation(
        Some(Expression::identifier("File", Some(file_ty()))),
        "createTempFile",
        args,
        Some(MethodType {
            declaring_type: JAVA_IO_FILE.into(),
            name: "createTempFile".into(),
            parameter_types: Vec::new(),
            return_type: Some(file_ty()),
            is_static: true,
        }),
    )
}

pub(crate) fn new_file(path: &str) -> Expression {
    Expression::new_class(JAVA_IO_FILE, vec![Expression::string(path)])
}

/// `receiver.method()` returning `boolean`.
pub(crate) fn call(receiver: &str, method: &str) -> Expression {
    Expression::invocation(
        Some(var(receiver)),
        method,
        Vec::new(),
        Some(MethodType {
            declaring_type: JAVA_IO_FILE.into(),
            name: method.into(),
            parameter_types: Vec::new(),
            return_type: Some(JavaType::boolean()),
            is_static: false,
        }),
    )
}

pub(crate) fn io_exception(msg: &str) -> Statement {
    Statement::throw(Expression::new_class(
        "java.io.IOException",
        vec![Expression::string(msg)],
    ))
}

/// A unit at `path` holding one method with `body`, importing `java.io.File`.
pub(crate) fn unit(path: &str, body: Vec<Statement>) -> CompilationUnit {
    let mut unit = CompilationUnit::new(path);
    unit.java_version = Some(11);
    unit.imports.push(Import::new(JAVA_IO_FILE));
    unit.classes.push(ClassDeclaration::new(
        "Test",
        vec![MethodDeclaration::new("test", Block::new(body))],
    ));
    unit
}

pub(crate) fn body(unit: &CompilationUnit) -> &Block {
    match unit.classes[0].methods[0].body.as_ref() {
        Some(b) => b,
        None => panic!("test unit without a body"),
    }
}

pub(crate) fn body_text(unit: &CompilationUnit) -> Vec<String> {
    body(unit).statements.iter().map(|s| s.to_java()).collect()
}
