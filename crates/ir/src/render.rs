//! Renders the tree back to Java text.
//!
//! The output is canonical (four-space indentation, one statement per line)
//! and meant for inspection and assertions, not for preserving formatting.

use crate::ast::*;

const INDENT: &str = "    ";

struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    /// Writes `text` at the current depth. Embedded newlines come from
    /// multi-line expressions and are indented line by line.
    fn line(&mut self, text: &str) {
        for l in text.split('\n') {
            if !l.is_empty() {
                for _ in 0..self.depth {
                    self.out.push_str(INDENT);
                }
            }
            self.out.push_str(l);
            self.out.push('\n');
        }
    }

    fn unit(&mut self, unit: &CompilationUnit) {
        if let Some(pkg) = &unit.package {
            self.line(&format!("package {pkg};"));
            self.out.push('\n');
        }
        for import in &unit.imports {
            if import.is_static {
                self.line(&format!("import static {};", import.name));
            } else {
                self.line(&format!("import {};", import.name));
            }
        }
        if !unit.imports.is_empty() {
            self.out.push('\n');
        }
        for class in &unit.classes {
            self.class(class);
        }
    }

    fn class(&mut self, class: &ClassDeclaration) {
        self.line(&format!("class {} {{", class.name));
        self.members(class);
        self.line("}");
    }

    fn members(&mut self, class: &ClassDeclaration) {
        self.depth += 1;
        for field in &class.fields {
            let decl = declarations(&field.declarations);
            if field.modifiers.is_empty() {
                self.line(&format!("{decl};"));
            } else {
                self.line(&format!("{} {decl};", field.modifiers.join(" ")));
            }
        }
        for init in &class.initializers {
            self.block(if init.is_static { "static" } else { "" }, &init.body, "");
        }
        for method in &class.methods {
            self.method(method);
        }
        for nested in &class.classes {
            self.class(nested);
        }
        self.depth -= 1;
    }

    fn method(&mut self, method: &MethodDeclaration) {
        let ret = method
            .return_type
            .as_ref()
            .map(|t| t.simple_name().to_string())
            .unwrap_or_else(|| "void".into());
        let params = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.ty.simple_name(), p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let mut header = format!("{ret} {}({params})", method.name);
        if !method.throws.is_empty() {
            let throws = method
                .throws
                .iter()
                .map(|t| t.simple_name())
                .collect::<Vec<_>>()
                .join(", ");
            header.push_str(&format!(" throws {throws}"));
        }
        match &method.body {
            Some(body) => self.block(&header, body, ""),
            None => self.line(&format!("{header};")),
        }
    }

    /// Prints `head {`, the statements, then `}tail`.
    fn block(&mut self, head: &str, block: &Block, tail: &str) {
        let open = if head.is_empty() {
            "{".to_string()
        } else {
            format!("{head} {{")
        };
        if block.statements.is_empty() {
            self.line(&format!("{}}}{tail}", open));
            return;
        }
        self.line(&open);
        self.depth += 1;
        for stmt in &block.statements {
            self.statement(stmt);
        }
        self.depth -= 1;
        self.line(&format!("}}{tail}"));
    }

    /// Body of a control construct; blocks stay on the header line.
    fn body(&mut self, head: &str, body: &Statement, tail: &str) {
        match &body.kind {
            StatementKind::Block(b) => self.block(head, b, tail),
            _ => {
                self.line(head);
                self.depth += 1;
                self.statement(body);
                self.depth -= 1;
                if !tail.is_empty() {
                    self.line(tail.trim_start());
                }
            }
        }
    }

    fn statement(&mut self, stmt: &Statement) {
        match &stmt.kind {
            StatementKind::Block(b) => self.block("", b, ""),
            StatementKind::If(i) => {
                let head = format!("if ({})", expression(&i.condition));
                match &i.else_part {
                    None => self.body(&head, &i.then_part, ""),
                    Some(else_part) => {
                        self.body(&head, &i.then_part, "");
                        match &else_part.kind {
                            StatementKind::If(_) => {
                                let nested = render_statement(else_part);
                                self.line(&format!("else {}", nested.trim_end()));
                            }
                            _ => self.body("else", else_part, ""),
                        }
                    }
                }
            }
            StatementKind::ForLoop(f) => {
                let init = f
                    .init
                    .iter()
                    .map(inline_statement)
                    .collect::<Vec<_>>()
                    .join(", ");
                let cond = f.condition.as_ref().map(expression).unwrap_or_default();
                let update = f
                    .update
                    .iter()
                    .map(inline_statement)
                    .collect::<Vec<_>>()
                    .join(", ");
                self.body(&format!("for ({init}; {cond}; {update})"), &f.body, "");
            }
            StatementKind::ForEachLoop(f) => {
                let head = format!(
                    "for ({} {} : {})",
                    f.variable.ty.simple_name(),
                    f.variable.name,
                    expression(&f.iterable)
                );
                self.body(&head, &f.body, "");
            }
            StatementKind::WhileLoop(w) => {
                self.body(&format!("while ({})", expression(&w.condition)), &w.body, "");
            }
            StatementKind::DoWhileLoop(d) => {
                let tail = format!(" while ({});", expression(&d.condition));
                self.body("do", &d.body, &tail);
            }
            StatementKind::Try(t) => {
                let mut head = "try".to_string();
                let mut current = &t.body;
                for catch in &t.catches {
                    self.block(&head, current, "");
                    head = format!(
                        "catch ({} {})",
                        catch.parameter.ty.simple_name(),
                        catch.parameter.name
                    );
                    current = &catch.body;
                }
                if let Some(finally) = &t.finally {
                    self.block(&head, current, "");
                    head = "finally".into();
                    current = finally;
                }
                self.block(&head, current, "");
            }
            StatementKind::Switch(sw) => {
                self.line(&format!("switch ({}) {{", expression(&sw.selector)));
                self.depth += 1;
                for case in &sw.cases {
                    if case.labels.is_empty() {
                        self.line("default:");
                    } else {
                        self.line(&format!("case {}:", arguments(&case.labels)));
                    }
                    self.depth += 1;
                    for stmt in &case.body.statements {
                        self.statement(stmt);
                    }
                    self.depth -= 1;
                }
                self.depth -= 1;
                self.line("}");
            }
            StatementKind::Synchronized(s) => {
                self.block(&format!("synchronized ({})", expression(&s.lock)), &s.body, "");
            }
            StatementKind::Labeled(l) => {
                self.line(&format!("{}:", l.label));
                self.statement(&l.body);
            }
            _ => {
                let text = inline_statement(stmt);
                self.line(&format!("{text};"));
            }
        }
    }
}

/// Simple statements without the trailing semicolon.
fn inline_statement(stmt: &Statement) -> String {
    match &stmt.kind {
        StatementKind::Expression(e) => expression(e),
        StatementKind::VariableDeclarations(v) => declarations(v),
        StatementKind::Break(None) => "break".into(),
        StatementKind::Break(Some(label)) => format!("break {label}"),
        StatementKind::Continue(None) => "continue".into(),
        StatementKind::Continue(Some(label)) => format!("continue {label}"),
        StatementKind::Return(Some(e)) => format!("return {}", expression(e)),
        StatementKind::Return(None) => "return".into(),
        StatementKind::Throw(e) => format!("throw {}", expression(e)),
        StatementKind::Empty => String::new(),
        _ => render_statement(stmt).trim_end().to_string(),
    }
}

fn declarations(v: &VariableDeclarations) -> String {
    let vars = v
        .variables
        .iter()
        .map(|var| match &var.initializer {
            Some(init) => format!("{} = {}", var.name, expression(init)),
            None => var.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} {vars}", v.declared_type.simple_name())
}

fn arguments(args: &[Expression]) -> String {
    args.iter().map(expression).collect::<Vec<_>>().join(", ")
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

fn expression(expr: &Expression) -> String {
    match &expr.kind {
        ExpressionKind::Identifier(name) => name.clone(),
        ExpressionKind::Literal(lit) => match lit {
            Literal::Null => "null".into(),
            Literal::Boolean(b) => b.to_string(),
            Literal::Int(i) => i.to_string(),
            Literal::Char(c) => format!("'{c}'"),
            Literal::String(s) => format!("\"{}\"", escape(s)),
        },
        ExpressionKind::MethodInvocation(m) => match &m.select {
            Some(select) => format!(
                "{}.{}({})",
                expression(select),
                m.name,
                arguments(&m.arguments)
            ),
            None => format!("{}({})", m.name, arguments(&m.arguments)),
        },
        ExpressionKind::NewClass(n) => {
            let head = format!("new {}({})", n.class, arguments(&n.arguments));
            match &n.body {
                Some(body) => {
                    let mut p = Printer::new();
                    p.members(body);
                    format!("{head} {{\n{}}}", p.out)
                }
                None => head,
            }
        }
        ExpressionKind::FieldAccess(f) => format!("{}.{}", expression(&f.target), f.name),
        ExpressionKind::Assignment(a) => {
            format!("{} = {}", expression(&a.variable), expression(&a.value))
        }
        ExpressionKind::Binary(b) => format!(
            "{} {} {}",
            expression(&b.left),
            b.operator.symbol(),
            expression(&b.right)
        ),
        ExpressionKind::Unary(u) => match u.operator {
            UnaryOperator::Not => format!("!{}", expression(&u.expression)),
            UnaryOperator::Negative => format!("-{}", expression(&u.expression)),
        },
        ExpressionKind::Parentheses(inner) => format!("({})", expression(inner)),
        ExpressionKind::Conditional(c) => format!(
            "{} ? {} : {}",
            expression(&c.condition),
            expression(&c.then_part),
            expression(&c.else_part)
        ),
        ExpressionKind::Cast(c) => format!("({}) {}", c.ty.simple_name(), expression(&c.expression)),
        ExpressionKind::Lambda(l) => {
            let params = match l.parameters.as_slice() {
                [single] => single.clone(),
                many => format!("({})", many.join(", ")),
            };
            match &l.body {
                LambdaBody::Expression(e) => format!("{params} -> {}", expression(e)),
                LambdaBody::Block(b) => {
                    let mut p = Printer::new();
                    p.block("", b, "");
                    format!("{params} -> {}", p.out.trim_end())
                }
            }
        }
    }
}

fn render_statement(stmt: &Statement) -> String {
    let mut p = Printer::new();
    p.statement(stmt);
    p.out
}

impl CompilationUnit {
    pub fn to_java(&self) -> String {
        let mut p = Printer::new();
        p.unit(self);
        p.out
    }
}

impl Block {
    pub fn to_java(&self) -> String {
        let mut p = Printer::new();
        p.block("", self, "");
        p.out
    }
}

impl Statement {
    /// Renders the statement; multi-line constructs end with a newline,
    /// simple statements do not.
    ///
    /// # Example
    /// ```
    /// use ir::{Expression, JavaType, Statement};
    /// let s = Statement::declaration(JavaType::string(), "s", Some(Expression::string("x")));
    /// assert_eq!(s.to_java(), "String s = \"x\";");
    /// ```
    pub fn to_java(&self) -> String {
        let out = render_statement(self);
        if out.lines().count() == 1 {
            out.trim_end().to_string()
        } else {
            out
        }
    }
}

impl Expression {
    pub fn to_java(&self) -> String {
        expression(self)
    }
}
