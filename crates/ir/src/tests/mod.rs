use super::*;

fn file_type() -> JavaType {
    JavaType::class("java.io.File")
}

fn sample_unit() -> CompilationUnit {
    let create = Expression::invocation(
        Some(Expression::identifier("File", Some(file_type()))),
        "createTempFile",
        vec![Expression::string("a"), Expression::string("b")],
        Some(MethodType {
            declaring_type: "java.io.File".into(),
            name: "createTempFile".into(),
            parameter_types: vec![JavaType::string(), JavaType::string()],
            return_type: Some(file_type()),
            is_static: true,
        }),
    );
    let guard = Statement::if_then(
        Expression::not(Expression::invocation(
            Some(Expression::identifier("f", Some(file_type()))),
            "delete",
            vec![],
            None,
        )),
        Statement::block(vec![Statement::throw(Expression::new_class(
            "java.io.IOException",
            vec![],
        ))]),
        None,
    );
    let body = Block::new(vec![
        Statement::declaration(file_type(), "f", Some(create)),
        guard,
    ]);
    let mut unit = CompilationUnit::new("src/main/java/A.java");
    unit.imports.push(Import::new("java.io.File"));
    unit.classes
        .push(ClassDeclaration::new("A", vec![MethodDeclaration::new("run", body)]));
    unit
}

#[test]
fn renders_unit_as_java() {
    let expected = "import java.io.File;\n\
\n\
class A {\n    void run() {\n        File f = File.createTempFile(\"a\", \"b\");\n        if (!f.delete()) {\n            throw new IOException();\n        }\n    }\n}\n";
    assert_eq!(sample_unit().to_java(), expected);
}

#[test]
fn renders_empty_bodies_inline() {
    let stmt = Statement::if_then(
        Expression::identifier("ok", Some(JavaType::boolean())),
        Statement::new(StatementKind::Block(Block::empty())),
        None,
    );
    assert_eq!(stmt.to_java(), "if (ok) {}");
}

#[test]
fn renders_do_while_tail() {
    let stmt = Statement::do_while(
        Statement::block(vec![Statement::expression(Expression::invocation(
            None,
            "step",
            vec![],
            None,
        ))]),
        Expression::not(Expression::identifier("done", None)),
    );
    assert_eq!(stmt.to_java(), "do {\n    step();\n} while (!done);\n");
}

#[test]
fn escapes_string_literals() {
    let e = Expression::string("a\"b\\c");
    assert_eq!(e.to_java(), r#""a\"b\\c""#);
}

#[test]
fn json_interchange_preserves_identity_and_types() {
    let unit = sample_unit();
    let json = unit.to_json().unwrap();
    let back = CompilationUnit::from_json(&json).unwrap();
    assert_eq!(back, unit);

    let body = back.classes[0].methods[0].body.as_ref().unwrap();
    let original = unit.classes[0].methods[0].body.as_ref().unwrap();
    assert_eq!(body.statements[0].id, original.statements[0].id);
}

#[test]
fn optional_fields_default_when_absent() {
    let unit = CompilationUnit::from_json(r#"{"source_path": "A.java"}"#).unwrap();
    assert_eq!(unit.java_version, None);
    assert!(unit.imports.is_empty());
    assert!(unit.classes.is_empty());
}

#[test]
fn simple_names_and_assignability() {
    assert_eq!(file_type().simple_name(), "File");
    assert_eq!(JavaType::boolean().simple_name(), "boolean");
    assert!(file_type().is_assignable_to(&JavaType::object()));
    assert!(JavaType::Null.is_assignable_to(&JavaType::string()));
    assert!(!JavaType::Null.is_assignable_to(&JavaType::boolean()));
    assert!(!JavaType::string().is_assignable_to(&file_type()));
    assert!(!file_type().is_assignable_to(&JavaType::string()));
}

#[test]
fn class_types_without_hierarchy_are_assumed_compatible() {
    let cache_dir = JavaType::class("com.acme.CacheDir");
    assert!(cache_dir.is_assignable_to(&file_type()));
    assert!(!cache_dir.is_assignable_to(&JavaType::boolean()));
    assert!(!JavaType::class("java.lang.Integer").is_assignable_to(&file_type()));
}

#[test]
fn synthesized_ids_are_unique() {
    let a = Expression::null();
    let b = Expression::null();
    assert_ne!(a.id, b.id);
    assert_ne!(a, b);
}

#[test]
fn static_imports_do_not_count_as_type_imports() {
    let mut unit = CompilationUnit::new("A.java");
    unit.imports.push(Import {
        name: "java.nio.file.Files".into(),
        is_static: true,
    });
    assert!(!unit.has_import("java.nio.file.Files"));
}

fn call(name: &str) -> Statement {
    Statement::expression(Expression::invocation(None, name, vec![], None))
}

fn member_unit() -> CompilationUnit {
    let runnable = || JavaType::class("java.lang.Runnable");
    let worker = Expression::anonymous_class(
        "java.lang.Runnable",
        vec![],
        ClassDeclaration::new("", vec![MethodDeclaration::new("run", Block::new(vec![call("work")]))]),
    );
    let spin = Statement::labeled(
        "outer",
        Statement::while_loop(
            Expression::boolean(true),
            Statement::block(vec![Statement::new(StatementKind::Break(Some("outer".into())))]),
        ),
    );
    let body = Block::new(vec![
        Statement::synchronized(Expression::identifier("lock", None), vec![spin]),
        Statement::declaration(
            runnable(),
            "r",
            Some(Expression::lambda_block(&[], vec![call("work")], Some(runnable()))),
        ),
    ]);
    let class = ClassDeclaration::new("A", vec![MethodDeclaration::new("run", body)])
        .with_field(FieldDeclaration::new(&["private", "static"], runnable(), "TASK", Some(worker)))
        .with_initializer(true, Block::new(vec![call("boot")]))
        .with_class(ClassDeclaration::new("Inner", vec![]));
    let mut unit = CompilationUnit::new("src/main/java/A.java");
    unit.classes.push(class);
    unit
}

#[test]
fn renders_class_members_and_nested_bodies() {
    let expected = [
        "class A {",
        "    private static Runnable TASK = new Runnable() {",
        "        void run() {",
        "            work();",
        "        }",
        "    };",
        "    static {",
        "        boot();",
        "    }",
        "    void run() {",
        "        synchronized (lock) {",
        "            outer:",
        "            while (true) {",
        "                break outer;",
        "            }",
        "        }",
        "        Runnable r = () -> {",
        "            work();",
        "        };",
        "    }",
        "    class Inner {",
        "    }",
        "}",
    ]
    .join("\n")
        + "\n";
    assert_eq!(member_unit().to_java(), expected);
}

#[test]
fn renders_conditional_cast_and_lambda_parameters() {
    let pick = Expression::conditional(
        Expression::identifier("fresh", Some(JavaType::boolean())),
        Expression::cast(JavaType::class("java.io.File"), Expression::identifier("o", None)),
        Expression::null(),
    );
    assert_eq!(pick.to_java(), "fresh ? (File) o : null");
    let one = Expression::lambda(&["f"], Expression::identifier("f", None), None);
    let two = Expression::lambda(&["a", "b"], Expression::identifier("a", None), None);
    assert_eq!(one.to_java(), "f -> f");
    assert_eq!(two.to_java(), "(a, b) -> a");
}

#[test]
fn class_members_survive_json_and_default_when_absent() {
    let unit = member_unit();
    let back = CompilationUnit::from_json(&unit.to_json().unwrap()).unwrap();
    assert_eq!(back, unit);

    let bare = r#"{"source_path": "A.java", "classes": [{"id": "6f1c1a9e-3c2b-4f57-9d7e-0b8a3c1d2e4f", "name": "A"}]}"#;
    let unit = CompilationUnit::from_json(bare).unwrap();
    let class = &unit.classes[0];
    assert!(class.fields.is_empty() && class.initializers.is_empty() && class.classes.is_empty());
}
