//! Replaces `File.createTempFile` with the `java.nio.file.Files` primitives.
//!
//! Chains that recreate the temporary file as a directory are rewritten
//! first, block by block from the innermost one outwards. Every remaining
//! `createTempFile` call is then rewritten in place.

use ir::{Block, CompilationUnit, Expression, JavaType, Statement, StatementKind};
use patterns::{Skeleton, Template, TemplateError};
use std::sync::OnceLock;
use tracing::debug;

use crate::calls::{self, JAVA_IO_FILE, JAVA_NIO_FILE_FILES, JAVA_NIO_FILE_PATH};
use crate::chain;
use crate::delete::delete_statement;
use crate::imports::ImportRequests;
use crate::visit::{fold_block_children, fold_expression_children, fold_unit, Fold};

/// Templates producing the secure replacements.
pub struct SecureTemplates {
    pub temp_file: Template,
    pub temp_file_in: Template,
    pub temp_directory: Template,
    pub temp_directory_in: Template,
}

fn path() -> JavaType {
    JavaType::class(JAVA_NIO_FILE_PATH)
}

fn to_path(dir: Skeleton) -> Skeleton {
    dir.call(JAVA_IO_FILE, "toPath", vec![], path())
}

fn to_file(path: Skeleton) -> Skeleton {
    path.call(JAVA_NIO_FILE_PATH, "toFile", vec![], JavaType::class(JAVA_IO_FILE))
}

fn files(name: &str, args: Vec<Skeleton>) -> Skeleton {
    to_file(Skeleton::static_call(JAVA_NIO_FILE_FILES, name, args, path()))
}

impl SecureTemplates {
    pub fn get() -> &'static SecureTemplates {
        static TEMPLATES: OnceLock<SecureTemplates> = OnceLock::new();
        TEMPLATES.get_or_init(SecureTemplates::build)
    }

    fn build() -> Self {
        let string = JavaType::string;
        let file = || JavaType::class(JAVA_IO_FILE);
        let suffixed = Skeleton::concat(Skeleton::slot(0), Skeleton::slot(1));
        let suffixed_in = Skeleton::concat(Skeleton::slot(1), Skeleton::slot(2));
        Self {
            temp_file: Template::new(
                "Files.createTempFile(#{any(String)}, #{any(String)}).toFile()",
                vec![string(), string()],
                files("createTempFile", vec![Skeleton::slot(0), Skeleton::slot(1)]),
            )
            .with_import(JAVA_NIO_FILE_FILES),
            temp_file_in: Template::new(
                "Files.createTempFile(#{any(java.io.File)}.toPath(), #{any(String)}, #{any(String)}).toFile()",
                vec![file(), string(), string()],
                files(
                    "createTempFile",
                    vec![to_path(Skeleton::slot(0)), Skeleton::slot(1), Skeleton::slot(2)],
                ),
            )
            .with_import(JAVA_NIO_FILE_FILES),
            temp_directory: Template::new(
                "Files.createTempDirectory(#{any(String)} + #{any(String)}).toFile()",
                vec![string(), string()],
                files("createTempDirectory", vec![suffixed]),
            )
            .with_import(JAVA_NIO_FILE_FILES),
            temp_directory_in: Template::new(
                "Files.createTempDirectory(#{any(java.io.File)}.toPath(), #{any(String)} + #{any(String)}).toFile()",
                vec![file(), string(), string()],
                files(
                    "createTempDirectory",
                    vec![to_path(Skeleton::slot(0)), suffixed_in],
                ),
            )
            .with_import(JAVA_NIO_FILE_FILES),
        }
    }
}

/// Splits `createTempFile(prefix, suffix[, dir])` arguments into the
/// directory, if one is given and not a literal `null`, and the rest.
fn split_arguments(mut args: Vec<Expression>) -> Option<(Option<Expression>, Vec<Expression>)> {
    match args.len() {
        2 => Some((None, args)),
        3 => {
            let dir = args.pop()?;
            Some(((!dir.is_null_literal()).then_some(dir), args))
        }
        _ => None,
    }
}

fn instantiate(
    plain: &Template,
    rooted: &Template,
    args: Vec<Expression>,
    requests: &mut ImportRequests,
) -> Option<Result<Expression, TemplateError>> {
    let (dir, rest) = split_arguments(args)?;
    let (template, args) = match dir {
        None => (plain, rest),
        Some(dir) => (rooted, std::iter::once(dir).chain(rest).collect()),
    };
    for fqn in template.imports() {
        requests.add(fqn.as_str());
    }
    Some(template.instantiate(args))
}

fn take_arguments(expr: Expression) -> Vec<Expression> {
    match expr.kind {
        ir::ExpressionKind::MethodInvocation(m) => m.arguments,
        _ => Vec::new(),
    }
}

/// Rewrites complete hijack chains into a single directory creation.
struct ChainRewriter<'a> {
    templates: &'a SecureTemplates,
    requests: ImportRequests,
    error: Option<TemplateError>,
    chains: usize,
}

impl ChainRewriter<'_> {
    /// Replaces the creation call inside `stmt`, keeping its shape.
    fn secure_create(&mut self, stmt: &Statement) -> Option<Result<Statement, TemplateError>> {
        let mut stmt = stmt.clone();
        let slot: &mut Expression = match &mut stmt.kind {
            StatementKind::Expression(e) => match &mut e.kind {
                ir::ExpressionKind::Assignment(a) => &mut a.value,
                _ => return None,
            },
            StatementKind::VariableDeclarations(d) => d.variables.first_mut()?.initializer.as_mut()?,
            _ => return None,
        };
        let original = std::mem::replace(slot, Expression::null());
        match instantiate(
            &self.templates.temp_directory,
            &self.templates.temp_directory_in,
            take_arguments(original),
            &mut self.requests,
        )? {
            Ok(secured) => *slot = secured,
            Err(e) => return Some(Err(e)),
        }
        Some(Ok(stmt))
    }

    fn rewrite_chains(&mut self, mut block: Block) -> Result<Block, TemplateError> {
        for mut record in chain::scan_all(&block, calls::create_temp_file()) {
            if !record.has_all_roles() {
                continue;
            }
            let Some(create) = block.statements.iter().find(|s| Some(s.id) == record.create) else {
                continue;
            };
            record.secure_create = match self.secure_create(create) {
                Some(result) => Some(result?),
                None => None,
            };
            let (Some(secure), Some(delete), Some(mkdir)) =
                (record.secure_create.take(), record.delete, record.mkdir)
            else {
                continue;
            };
            debug!(variable = %record.binding.name, "Hijack chain rewritten");
            for stmt in &mut block.statements {
                if stmt.id == secure.id {
                    *stmt = secure;
                    break;
                }
            }
            for target in [delete, mkdir] {
                let (next, removed) = delete_statement(block, target);
                block = next;
                self.requests.maybe_remove(removed);
            }
            self.chains += 1;
        }
        Ok(block)
    }
}

impl Fold for ChainRewriter<'_> {
    fn fold_block(&mut self, block: Block) -> Block {
        let block = fold_block_children(self, block);
        if self.error.is_some() {
            return block;
        }
        let fallback = block.clone();
        match self.rewrite_chains(block) {
            Ok(block) => block,
            Err(e) => {
                self.error = Some(e);
                fallback
            }
        }
    }
}

/// Rewrites every `File.createTempFile` call into `Files.createTempFile`.
struct DirectRewriter<'a> {
    templates: &'a SecureTemplates,
    requests: ImportRequests,
    error: Option<TemplateError>,
    calls: usize,
}

impl Fold for DirectRewriter<'_> {
    fn fold_expression(&mut self, expr: Expression) -> Expression {
        let expr = fold_expression_children(self, expr);
        if self.error.is_some() || calls::create_temp_file().match_expression(&expr).is_none() {
            return expr;
        }
        let fallback = expr.clone();
        match instantiate(
            &self.templates.temp_file,
            &self.templates.temp_file_in,
            take_arguments(expr),
            &mut self.requests,
        ) {
            Some(Ok(secured)) => {
                self.calls += 1;
                secured
            }
            Some(Err(e)) => {
                self.error = Some(e);
                fallback
            }
            None => fallback,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
/// What one secure rewrite pass did to a unit.
pub struct RewriteSummary {
    pub chains: usize,
    pub calls: usize,
    pub requests: ImportRequests,
}

/// Runs the chain rewrite and then the direct rewrite over `unit`.
///
/// A template failure aborts the pass; no partially rewritten unit is
/// returned.
pub fn secure_temp_files(
    unit: CompilationUnit,
) -> Result<(CompilationUnit, RewriteSummary), TemplateError> {
    let templates = SecureTemplates::get();

    let mut chains = ChainRewriter {
        templates,
        requests: ImportRequests::default(),
        error: None,
        chains: 0,
    };
    let unit = fold_unit(&mut chains, unit);
    if let Some(e) = chains.error {
        return Err(e);
    }

    let mut direct = DirectRewriter {
        templates,
        requests: ImportRequests::default(),
        error: None,
        calls: 0,
    };
    let unit = fold_unit(&mut direct, unit);
    if let Some(e) = direct.error {
        return Err(e);
    }

    let mut requests = chains.requests;
    requests.add.extend(direct.requests.add);
    requests.maybe_remove.extend(direct.requests.maybe_remove);
    Ok((
        unit,
        RewriteSummary {
            chains: chains.chains,
            calls: direct.calls,
            requests,
        },
    ))
}

#[cfg(test)]
mod tests;
