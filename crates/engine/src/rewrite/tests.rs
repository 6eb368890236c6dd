use super::*;
use crate::testing::*;
use ir::{FieldDeclaration, ForLoop, Statement, SwitchCase};

fn rewrite(unit: CompilationUnit) -> (CompilationUnit, RewriteSummary) {
    secure_temp_files(unit).unwrap()
}

#[test]
fn two_argument_call_becomes_files_create_temp_file() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "tempDir",
            Some(create(vec![Expression::string("hello"), Expression::string("world")])),
        )],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"File tempDir = Files.createTempFile("hello", "world").toFile();"#]
    );
    assert_eq!(summary.calls, 1);
    assert!(summary.requests.add.contains(JAVA_NIO_FILE_FILES));
}

#[test]
fn directory_argument_goes_through_to_path() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "tempDir",
            Some(create(vec![
                Expression::string("hello"),
                Expression::string("world"),
                new_file("."),
            ])),
        )],
    );
    let (out, _) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"File tempDir = Files.createTempFile(new File(".").toPath(), "hello", "world").toFile();"#]
    );
}

#[test]
fn subclass_typed_directory_goes_through_to_path() {
    let cache_dir = Expression::identifier("cacheDir", Some(JavaType::class("com.acme.CacheDir")));
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "t",
            Some(create(vec![Expression::string("a"), Expression::string("b"), cache_dir])),
        )],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"File t = Files.createTempFile(cacheDir.toPath(), "a", "b").toFile();"#]
    );
    assert_eq!(summary.calls, 1);
}

#[test]
fn null_directory_degrades_to_two_arguments() {
    let three = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "temp",
            Some(create(vec![
                Expression::string("random"),
                Expression::string("file"),
                Expression::null(),
            ])),
        )],
    );
    let two = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "temp",
            Some(create(vec![Expression::string("random"), Expression::string("file")])),
        )],
    );
    let (a, _) = rewrite(three);
    let (b, _) = rewrite(two);
    assert_eq!(body_text(&a), body_text(&b));
    assert_eq!(
        body_text(&a),
        [r#"File temp = Files.createTempFile("random", "file").toFile();"#]
    );
}

#[test]
fn call_used_as_argument_is_rewritten() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::expression(Expression::invocation(
            None,
            "use",
            vec![create(vec![Expression::string("a"), Expression::string("b")])],
            None,
        ))],
    );
    let (out, _) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"use(Files.createTempFile("a", "b").toFile());"#]
    );
}

fn chain_unit() -> CompilationUnit {
    unit(
        "src/main/java/Test.java",
        vec![
            Statement::declaration(
                file_ty(),
                "tempdir",
                Some(create(vec![Expression::string("hello"), Expression::string("world")])),
            ),
            Statement::expression(call("tempdir", "delete")),
            Statement::expression(call("tempdir", "mkdir")),
        ],
    )
}

#[test]
fn complete_chain_collapses_to_directory_creation() {
    let (out, summary) = rewrite(chain_unit());
    assert_eq!(
        body_text(&out),
        [r#"File tempdir = Files.createTempDirectory("hello" + "world").toFile();"#]
    );
    assert_eq!(summary.chains, 1);
    assert_eq!(summary.calls, 0);
    assert!(summary.requests.maybe_remove.contains(JAVA_IO_FILE));
}

#[test]
fn chain_with_directory_keeps_it() {
    let input = unit(
        "src/main/java/Test.java",
        vec![
            Statement::expression(Expression::assignment(
                var("dir"),
                create(vec![
                    Expression::string("p"),
                    Expression::string("s"),
                    var("parent"),
                ]),
            )),
            Statement::expression(call("dir", "delete")),
            Statement::expression(call("dir", "mkdirs")),
        ],
    );
    let (out, _) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"dir = Files.createTempDirectory(parent.toPath(), "p" + "s").toFile();"#]
    );
}

#[test]
fn chain_with_null_directory_uses_default_location() {
    let input = unit(
        "src/main/java/Test.java",
        vec![
            Statement::declaration(
                file_ty(),
                "dir",
                Some(create(vec![
                    Expression::string("p"),
                    Expression::string("s"),
                    Expression::null(),
                ])),
            ),
            Statement::expression(call("dir", "delete")),
            Statement::expression(call("dir", "mkdir")),
        ],
    );
    let (out, _) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [r#"File dir = Files.createTempDirectory("p" + "s").toFile();"#]
    );
}

#[test]
fn guarded_chain_keeps_branches_with_true() {
    let input = unit(
        "src/main/java/Test.java",
        vec![
            Statement::declaration(
                file_ty(),
                "temp",
                Some(create(vec![Expression::string("a"), Expression::string("b")])),
            ),
            Statement::if_then(
                Expression::not(call("temp", "delete")),
                io_exception("delete"),
                None,
            ),
            Statement::if_then(
                Expression::not(call("temp", "mkdir")),
                io_exception("mkdir"),
                None,
            ),
            Statement::new(StatementKind::Return(Some(var("temp")))),
        ],
    );
    let (out, _) = rewrite(input);
    assert_eq!(
        body_text(&out),
        [
            r#"File temp = Files.createTempDirectory("a" + "b").toFile();"#,
            "if (!true)\n    throw new IOException(\"delete\");\n",
            "if (!true)\n    throw new IOException(\"mkdir\");\n",
            "return temp;",
        ]
    );
}

#[test]
fn incomplete_chain_only_gets_the_direct_rewrite() {
    let input = unit(
        "src/main/java/Test.java",
        vec![
            Statement::declaration(
                file_ty(),
                "temp",
                Some(create(vec![Expression::string("a"), Expression::string("b")])),
            ),
            Statement::expression(call("temp", "delete")),
            Statement::expression(call("other", "mkdir")),
        ],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.chains, 0);
    assert_eq!(
        body_text(&out),
        [
            r#"File temp = Files.createTempFile("a", "b").toFile();"#,
            "temp.delete();",
            "other.mkdir();",
        ]
    );
}

#[test]
fn lone_mkdir_guard_is_untouched() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::if_then(
            Expression::not(call("tempDirChild", "mkdir")),
            io_exception("could not create"),
            None,
        )],
    );
    let (out, summary) = rewrite(input.clone());
    assert_eq!(out, input);
    assert_eq!(summary, RewriteSummary::default());
}

#[test]
fn chain_in_nested_block_is_rewritten() {
    let inner = vec![
        Statement::declaration(
            file_ty(),
            "t",
            Some(create(vec![Expression::string("a"), Expression::string("b")])),
        ),
        Statement::expression(call("t", "delete")),
        Statement::expression(call("t", "mkdir")),
    ];
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::if_then(
            Expression::identifier("enabled", Some(JavaType::boolean())),
            Statement::block(inner),
            None,
        )],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.chains, 1);
    assert_eq!(
        body_text(&out),
        ["if (enabled) {\n    File t = Files.createTempDirectory(\"a\" + \"b\").toFile();\n}\n"]
    );
}

#[test]
fn chain_across_for_update_is_rewritten() {
    let input = unit(
        "src/main/java/Test.java",
        vec![
            Statement::declaration(
                file_ty(),
                "t",
                Some(create(vec![Expression::string("a"), Expression::string("b")])),
            ),
            Statement::new(StatementKind::ForLoop(ForLoop {
                init: vec![],
                condition: None,
                update: vec![Statement::expression(call("t", "mkdir"))],
                body: Box::new(Statement::block(vec![Statement::expression(call("t", "delete"))])),
            })),
        ],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.chains, 1);
    assert_eq!(
        body_text(&out),
        [
            r#"File t = Files.createTempDirectory("a" + "b").toFile();"#,
            "for (; ; ) {}",
        ]
    );
}

#[test]
fn field_initializer_is_rewritten() {
    let mut input = unit("src/main/java/Test.java", vec![]);
    input.classes[0].fields.push(FieldDeclaration::new(
        &["static", "final"],
        file_ty(),
        "CACHE",
        Some(create(vec![Expression::string("cache"), Expression::string(".bin")])),
    ));
    let (out, summary) = rewrite(input);
    assert_eq!(summary.calls, 1);
    assert!(out
        .to_java()
        .contains(r#"    static final File CACHE = Files.createTempFile("cache", ".bin").toFile();"#));
    assert!(summary.requests.add.contains(JAVA_NIO_FILE_FILES));
}

#[test]
fn lambda_body_is_rewritten() {
    let supplier = Expression::lambda(
        &[],
        create(vec![Expression::string("a"), Expression::string("b")]),
        Some(JavaType::class("java.util.function.Supplier")),
    );
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            JavaType::class("java.util.function.Supplier"),
            "next",
            Some(supplier),
        )],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.calls, 1);
    assert_eq!(
        body_text(&out),
        [r#"Supplier next = () -> Files.createTempFile("a", "b").toFile();"#]
    );
}

#[test]
fn switch_arm_is_rewritten() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::switch(
            Expression::identifier("mode", Some(JavaType::class("java.lang.String"))),
            vec![SwitchCase::new(
                vec![Expression::string("scratch")],
                vec![
                    Statement::expression(Expression::assignment(
                        var("out"),
                        create(vec![Expression::string("a"), Expression::string("b")]),
                    )),
                    Statement::new(StatementKind::Break(None)),
                ],
            )],
        )],
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.calls, 1);
    assert_eq!(
        body_text(&out),
        ["switch (mode) {\n    case \"scratch\":\n        out = Files.createTempFile(\"a\", \"b\").toFile();\n        break;\n}\n"]
    );
}

#[test]
fn chain_in_static_initializer_is_rewritten() {
    let mut input = unit("src/main/java/Test.java", vec![]);
    input.classes[0] = input.classes[0].clone().with_initializer(
        true,
        Block::new(vec![
            Statement::expression(Expression::assignment(
                var("WORK"),
                create(vec![Expression::string("work"), Expression::string("")]),
            )),
            Statement::expression(call("WORK", "delete")),
            Statement::expression(call("WORK", "mkdirs")),
        ]),
    );
    let (out, summary) = rewrite(input);
    assert_eq!(summary.chains, 1);
    assert_eq!(
        out.classes[0].initializers[0].body.to_java(),
        "{\n    WORK = Files.createTempDirectory(\"work\" + \"\").toFile();\n}\n"
    );
}

#[test]
fn rewriting_twice_changes_nothing() {
    let (once, _) = rewrite(chain_unit());
    let (twice, summary) = rewrite(once.clone());
    assert_eq!(twice, once);
    assert_eq!(summary.chains + summary.calls, 0);
}

#[test]
fn mistyped_argument_aborts_the_pass() {
    let input = unit(
        "src/main/java/Test.java",
        vec![Statement::declaration(
            file_ty(),
            "t",
            Some(create(vec![Expression::string("a"), Expression::boolean(true)])),
        )],
    );
    let err = secure_temp_files(input).unwrap_err();
    assert!(matches!(err, TemplateError::TypeMismatch { slot: 1, .. }));
}

#[test]
fn templates_declare_files_import() {
    let t = SecureTemplates::get();
    for template in [&t.temp_file, &t.temp_file_in, &t.temp_directory, &t.temp_directory_in] {
        assert_eq!(template.imports(), [JAVA_NIO_FILE_FILES]);
    }
    assert_eq!(t.temp_directory_in.slots().len(), 3);
}
