//! Generic traversal over the Java tree.
//!
//! [`Visit`] walks by reference and [`Fold`] rebuilds by value. Each pass
//! overrides the node kinds it cares about and delegates to the `walk_*` /
//! `fold_*_children` functions for everything else.

use ir::{
    Block, ClassDeclaration, CompilationUnit, Expression, ExpressionKind, LambdaBody, Statement,
    StatementKind,
};

pub trait Visit {
    fn visit_class(&mut self, class: &ClassDeclaration) {
        walk_class(self, class);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

pub fn walk_unit<V: Visit + ?Sized>(v: &mut V, unit: &CompilationUnit) {
    for class in &unit.classes {
        v.visit_class(class);
    }
}

/// Field initializers, initializer blocks, method bodies, then member
/// classes.
pub fn walk_class<V: Visit + ?Sized>(v: &mut V, class: &ClassDeclaration) {
    for field in &class.fields {
        for var in &field.declarations.variables {
            if let Some(init) = &var.initializer {
                v.visit_expression(init);
            }
        }
    }
    for init in &class.initializers {
        v.visit_block(&init.body);
    }
    for method in &class.methods {
        if let Some(body) = &method.body {
            v.visit_block(body);
        }
    }
    for nested in &class.classes {
        v.visit_class(nested);
    }
}

pub fn walk_block<V: Visit + ?Sized>(v: &mut V, block: &Block) {
    for stmt in &block.statements {
        v.visit_statement(stmt);
    }
}

pub fn walk_statement<V: Visit + ?Sized>(v: &mut V, stmt: &Statement) {
    match &stmt.kind {
        StatementKind::Block(b) => v.visit_block(b),
        StatementKind::Expression(e) | StatementKind::Throw(e) => v.visit_expression(e),
        StatementKind::Return(e) => {
            if let Some(e) = e {
                v.visit_expression(e);
            }
        }
        StatementKind::VariableDeclarations(decls) => {
            for var in &decls.variables {
                if let Some(init) = &var.initializer {
                    v.visit_expression(init);
                }
            }
        }
        StatementKind::If(i) => {
            v.visit_expression(&i.condition);
            v.visit_statement(&i.then_part);
            if let Some(e) = &i.else_part {
                v.visit_statement(e);
            }
        }
        StatementKind::ForLoop(f) => {
            for s in &f.init {
                v.visit_statement(s);
            }
            if let Some(c) = &f.condition {
                v.visit_expression(c);
            }
            v.visit_statement(&f.body);
            for s in &f.update {
                v.visit_statement(s);
            }
        }
        StatementKind::ForEachLoop(f) => {
            v.visit_expression(&f.iterable);
            v.visit_statement(&f.body);
        }
        StatementKind::WhileLoop(w) => {
            v.visit_expression(&w.condition);
            v.visit_statement(&w.body);
        }
        StatementKind::DoWhileLoop(d) => {
            v.visit_statement(&d.body);
            v.visit_expression(&d.condition);
        }
        StatementKind::Try(t) => {
            v.visit_block(&t.body);
            for c in &t.catches {
                v.visit_block(&c.body);
            }
            if let Some(f) = &t.finally {
                v.visit_block(f);
            }
        }
        StatementKind::Switch(sw) => {
            v.visit_expression(&sw.selector);
            for case in &sw.cases {
                for label in &case.labels {
                    v.visit_expression(label);
                }
                v.visit_block(&case.body);
            }
        }
        StatementKind::Synchronized(s) => {
            v.visit_expression(&s.lock);
            v.visit_block(&s.body);
        }
        StatementKind::Labeled(l) => v.visit_statement(&l.body),
        StatementKind::Break(_) | StatementKind::Continue(_) | StatementKind::Empty => {}
    }
}

/// Children are visited in evaluation order: receiver, then arguments.
pub fn walk_expression<V: Visit + ?Sized>(v: &mut V, expr: &Expression) {
    match &expr.kind {
        ExpressionKind::Identifier(_) | ExpressionKind::Literal(_) => {}
        ExpressionKind::MethodInvocation(m) => {
            if let Some(s) = &m.select {
                v.visit_expression(s);
            }
            for a in &m.arguments {
                v.visit_expression(a);
            }
        }
        ExpressionKind::NewClass(n) => {
            for a in &n.arguments {
                v.visit_expression(a);
            }
            if let Some(body) = &n.body {
                v.visit_class(body);
            }
        }
        ExpressionKind::FieldAccess(f) => v.visit_expression(&f.target),
        ExpressionKind::Assignment(a) => {
            v.visit_expression(&a.variable);
            v.visit_expression(&a.value);
        }
        ExpressionKind::Binary(b) => {
            v.visit_expression(&b.left);
            v.visit_expression(&b.right);
        }
        ExpressionKind::Unary(u) => v.visit_expression(&u.expression),
        ExpressionKind::Parentheses(inner) => v.visit_expression(inner),
        ExpressionKind::Conditional(c) => {
            v.visit_expression(&c.condition);
            v.visit_expression(&c.then_part);
            v.visit_expression(&c.else_part);
        }
        ExpressionKind::Cast(c) => v.visit_expression(&c.expression),
        ExpressionKind::Lambda(l) => match &l.body {
            LambdaBody::Expression(e) => v.visit_expression(e),
            LambdaBody::Block(b) => v.visit_block(b),
        },
    }
}

pub trait Fold {
    fn fold_class(&mut self, class: ClassDeclaration) -> ClassDeclaration {
        fold_class_children(self, class)
    }

    fn fold_block(&mut self, block: Block) -> Block {
        fold_block_children(self, block)
    }

    fn fold_statement(&mut self, stmt: Statement) -> Statement {
        fold_statement_children(self, stmt)
    }

    fn fold_expression(&mut self, expr: Expression) -> Expression {
        fold_expression_children(self, expr)
    }
}

pub fn fold_unit<F: Fold + ?Sized>(f: &mut F, mut unit: CompilationUnit) -> CompilationUnit {
    unit.classes = unit.classes.into_iter().map(|c| f.fold_class(c)).collect();
    unit
}

/// Same member order as [`walk_class`].
pub fn fold_class_children<F: Fold + ?Sized>(f: &mut F, mut class: ClassDeclaration) -> ClassDeclaration {
    for field in &mut class.fields {
        for var in &mut field.declarations.variables {
            var.initializer = var.initializer.take().map(|e| f.fold_expression(e));
        }
    }
    for init in &mut class.initializers {
        let body = std::mem::replace(&mut init.body, Block::empty());
        init.body = f.fold_block(body);
    }
    for method in &mut class.methods {
        if let Some(body) = method.body.take() {
            method.body = Some(f.fold_block(body));
        }
    }
    class.classes = class.classes.into_iter().map(|c| f.fold_class(c)).collect();
    class
}

pub fn fold_block_children<F: Fold + ?Sized>(f: &mut F, block: Block) -> Block {
    Block {
        id: block.id,
        statements: block
            .statements
            .into_iter()
            .map(|s| f.fold_statement(s))
            .collect(),
    }
}

fn fold_boxed<F: Fold + ?Sized>(f: &mut F, stmt: Box<Statement>) -> Box<Statement> {
    Box::new(f.fold_statement(*stmt))
}

fn fold_boxed_expr<F: Fold + ?Sized>(f: &mut F, expr: Box<Expression>) -> Box<Expression> {
    Box::new(f.fold_expression(*expr))
}

pub fn fold_statement_children<F: Fold + ?Sized>(f: &mut F, stmt: Statement) -> Statement {
    let kind = match stmt.kind {
        StatementKind::Block(b) => StatementKind::Block(f.fold_block(b)),
        StatementKind::Expression(e) => StatementKind::Expression(f.fold_expression(e)),
        StatementKind::Throw(e) => StatementKind::Throw(f.fold_expression(e)),
        StatementKind::Return(e) => StatementKind::Return(e.map(|e| f.fold_expression(e))),
        StatementKind::VariableDeclarations(mut decls) => {
            for var in &mut decls.variables {
                var.initializer = var.initializer.take().map(|e| f.fold_expression(e));
            }
            StatementKind::VariableDeclarations(decls)
        }
        StatementKind::If(mut i) => {
            i.condition = f.fold_expression(i.condition);
            i.then_part = fold_boxed(f, i.then_part);
            i.else_part = i.else_part.map(|e| fold_boxed(f, e));
            StatementKind::If(i)
        }
        StatementKind::ForLoop(mut l) => {
            l.init = l.init.into_iter().map(|s| f.fold_statement(s)).collect();
            l.condition = l.condition.map(|c| f.fold_expression(c));
            l.body = fold_boxed(f, l.body);
            l.update = l.update.into_iter().map(|s| f.fold_statement(s)).collect();
            StatementKind::ForLoop(l)
        }
        StatementKind::ForEachLoop(mut l) => {
            l.iterable = f.fold_expression(l.iterable);
            l.body = fold_boxed(f, l.body);
            StatementKind::ForEachLoop(l)
        }
        StatementKind::WhileLoop(mut l) => {
            l.condition = f.fold_expression(l.condition);
            l.body = fold_boxed(f, l.body);
            StatementKind::WhileLoop(l)
        }
        StatementKind::DoWhileLoop(mut l) => {
            l.body = fold_boxed(f, l.body);
            l.condition = f.fold_expression(l.condition);
            StatementKind::DoWhileLoop(l)
        }
        StatementKind::Try(mut t) => {
            t.body = f.fold_block(t.body);
            for c in &mut t.catches {
                let body = std::mem::replace(&mut c.body, Block::empty());
                c.body = f.fold_block(body);
            }
            t.finally = t.finally.map(|b| f.fold_block(b));
            StatementKind::Try(t)
        }
        StatementKind::Switch(mut sw) => {
            sw.selector = f.fold_expression(sw.selector);
            for case in &mut sw.cases {
                let labels = std::mem::take(&mut case.labels);
                case.labels = labels.into_iter().map(|e| f.fold_expression(e)).collect();
                let body = std::mem::replace(&mut case.body, Block::empty());
                case.body = f.fold_block(body);
            }
            StatementKind::Switch(sw)
        }
        StatementKind::Synchronized(mut s) => {
            s.lock = f.fold_expression(s.lock);
            s.body = f.fold_block(s.body);
            StatementKind::Synchronized(s)
        }
        StatementKind::Labeled(mut l) => {
            l.body = fold_boxed(f, l.body);
            StatementKind::Labeled(l)
        }
        k @ (StatementKind::Break(_) | StatementKind::Continue(_) | StatementKind::Empty) => k,
    };
    Statement { id: stmt.id, kind }
}

pub fn fold_expression_children<F: Fold + ?Sized>(f: &mut F, expr: Expression) -> Expression {
    let kind = match expr.kind {
        k @ (ExpressionKind::Identifier(_) | ExpressionKind::Literal(_)) => k,
        ExpressionKind::MethodInvocation(mut m) => {
            m.select = m.select.map(|s| fold_boxed_expr(f, s));
            m.arguments = m.arguments.into_iter().map(|a| f.fold_expression(a)).collect();
            ExpressionKind::MethodInvocation(m)
        }
        ExpressionKind::NewClass(mut n) => {
            n.arguments = n.arguments.into_iter().map(|a| f.fold_expression(a)).collect();
            n.body = n.body.map(|b| Box::new(f.fold_class(*b)));
            ExpressionKind::NewClass(n)
        }
        ExpressionKind::FieldAccess(mut a) => {
            a.target = fold_boxed_expr(f, a.target);
            ExpressionKind::FieldAccess(a)
        }
        ExpressionKind::Assignment(mut a) => {
            a.variable = fold_boxed_expr(f, a.variable);
            a.value = fold_boxed_expr(f, a.value);
            ExpressionKind::Assignment(a)
        }
        ExpressionKind::Binary(mut b) => {
            b.left = fold_boxed_expr(f, b.left);
            b.right = fold_boxed_expr(f, b.right);
            ExpressionKind::Binary(b)
        }
        ExpressionKind::Unary(mut u) => {
            u.expression = fold_boxed_expr(f, u.expression);
            ExpressionKind::Unary(u)
        }
        ExpressionKind::Parentheses(inner) => {
            ExpressionKind::Parentheses(fold_boxed_expr(f, inner))
        }
        ExpressionKind::Conditional(mut c) => {
            c.condition = fold_boxed_expr(f, c.condition);
            c.then_part = fold_boxed_expr(f, c.then_part);
            c.else_part = fold_boxed_expr(f, c.else_part);
            ExpressionKind::Conditional(c)
        }
        ExpressionKind::Cast(mut c) => {
            c.expression = fold_boxed_expr(f, c.expression);
            ExpressionKind::Cast(c)
        }
        ExpressionKind::Lambda(mut l) => {
            l.body = match l.body {
                LambdaBody::Expression(e) => LambdaBody::Expression(fold_boxed_expr(f, e)),
                LambdaBody::Block(b) => LambdaBody::Block(f.fold_block(b)),
            };
            ExpressionKind::Lambda(l)
        }
    };
    Expression {
        id: expr.id,
        kind,
        ty: expr.ty,
    }
}
