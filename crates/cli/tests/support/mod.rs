#![allow(dead_code)]

use assert_cmd::prelude::*;
use ir::{
    Block, ClassDeclaration, CompilationUnit, Expression, Import, JavaType, MethodDeclaration,
    MethodType, Statement,
};
use std::fs;
use std::path::Path;
use std::process::Command;

const FILE: &str = "java.io.File";

fn file_ty() -> JavaType {
    JavaType::class(FILE)
}

fn call(receiver: &str, method: &str) -> Statement {
    Statement::expression(Expression::invocation(
        Some(Expression::identifier(receiver, Some(file_ty()))),
        method,
        Vec::new(),
        Some(MethodType {
            declaring_type: FILE.into(),
            name: method.into(),
            parameter_types: Vec::new(),
            return_type: Some(JavaType::boolean()),
            is_static: false,
        }),
    ))
}

/// `File t = File.createTempFile("hello", "world");`
fn temp_file() -> Statement {
    Statement::declaration(
        file_ty(),
        "t",
        Some(Expression::invocation(
            Some(Expression::identifier("File", Some(file_ty()))),
            "createTempFile",
            vec![Expression::string("hello"), Expression::string("world")],
            Some(MethodType {
                declaring_type: FILE.into(),
                name: "createTempFile".into(),
                parameter_types: vec![JavaType::string(), JavaType::string()],
                return_type: Some(file_ty()),
                is_static: true,
            }),
        )),
    )
}

fn unit(source_path: &str, body: Vec<Statement>) -> CompilationUnit {
    let mut unit = CompilationUnit::new(source_path);
    unit.java_version = Some(11);
    unit.imports.push(Import::new(FILE));
    unit.classes.push(ClassDeclaration::new(
        "Temp",
        vec![MethodDeclaration::new("create", Block::new(body))],
    ));
    unit
}

/// Unit with a single direct `createTempFile` call.
pub fn direct_unit(source_path: &str) -> CompilationUnit {
    unit(source_path, vec![temp_file()])
}

/// Unit creating a temp file, deleting it and recreating it as a directory.
pub fn chain_unit(source_path: &str) -> CompilationUnit {
    unit(
        source_path,
        vec![temp_file(), call("t", "delete"), call("t", "mkdir")],
    )
}

pub fn write_unit(path: &Path, unit: &CompilationUnit) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, unit.to_json()?)?;
    Ok(())
}

pub fn read_unit(path: &Path) -> Result<CompilationUnit, Box<dyn std::error::Error>> {
    Ok(CompilationUnit::from_json(&fs::read_to_string(path)?)?)
}

/// `tempguard` with `HOME` pointed at `home` so no user config leaks in.
pub fn tempguard(home: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("tempguard")?;
    cmd.env("HOME", home).env("NO_COLOR", "1");
    Ok(cmd)
}
