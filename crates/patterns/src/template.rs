use ir::{BinaryOperator, Expression, JavaType, MethodType};

use crate::TemplateError;

#[derive(Debug, Clone, PartialEq)]
/// Fixed shape of a synthesized expression with numbered holes.
pub enum Skeleton {
    /// Positional placeholder bound at instantiation.
    Slot(usize),
    /// `Owner.name(args)` on a fully qualified owner.
    StaticCall {
        owner: String,
        name: String,
        args: Vec<Skeleton>,
        returns: JavaType,
    },
    /// `target.name(args)`; `owner` is the declaring type of `name`.
    Call {
        target: Box<Skeleton>,
        owner: String,
        name: String,
        args: Vec<Skeleton>,
        returns: JavaType,
    },
    /// String concatenation `left + right`.
    Concat(Box<Skeleton>, Box<Skeleton>),
}

impl Skeleton {
    pub fn slot(index: usize) -> Self {
        Skeleton::Slot(index)
    }

    pub fn static_call(owner: &str, name: &str, args: Vec<Skeleton>, returns: JavaType) -> Self {
        Skeleton::StaticCall {
            owner: owner.into(),
            name: name.into(),
            args,
            returns,
        }
    }

    /// Chains an instance call onto `self`.
    pub fn call(self, owner: &str, name: &str, args: Vec<Skeleton>, returns: JavaType) -> Self {
        Skeleton::Call {
            target: Box::new(self),
            owner: owner.into(),
            name: name.into(),
            args,
            returns,
        }
    }

    pub fn concat(left: Skeleton, right: Skeleton) -> Self {
        Skeleton::Concat(Box::new(left), Box::new(right))
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Code template: a skeleton plus the declared type of every slot.
///
/// `pattern` is the human readable form used in diagnostics, e.g.
/// `Files.createTempFile(#{any(String)}, #{any(String)}).toFile()`.
pub struct Template {
    pattern: String,
    slots: Vec<JavaType>,
    skeleton: Skeleton,
    imports: Vec<String>,
}

impl Template {
    pub fn new(pattern: impl Into<String>, slots: Vec<JavaType>, skeleton: Skeleton) -> Self {
        Self {
            pattern: pattern.into(),
            slots,
            skeleton,
            imports: Vec::new(),
        }
    }

    /// Declares a type the synthesized code references.
    pub fn with_import(mut self, fqn: impl Into<String>) -> Self {
        self.imports.push(fqn.into());
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn slots(&self) -> &[JavaType] {
        &self.slots
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }

    /// Binds `args` to the slots in order and builds a fresh expression.
    ///
    /// Arguments without an attributed type are accepted for any slot.
    pub fn instantiate(&self, args: Vec<Expression>) -> Result<Expression, TemplateError> {
        if args.len() != self.slots.len() {
            return Err(TemplateError::ArityMismatch {
                template: self.pattern.clone(),
                expected: self.slots.len(),
                found: args.len(),
            });
        }
        for (slot, (arg, expected)) in args.iter().zip(&self.slots).enumerate() {
            if let Some(found) = &arg.ty {
                if !found.is_assignable_to(expected) {
                    return Err(TemplateError::TypeMismatch {
                        template: self.pattern.clone(),
                        slot,
                        expected: expected.clone(),
                        found: found.clone(),
                    });
                }
            }
        }
        let mut bound: Vec<Option<Expression>> = args.into_iter().map(Some).collect();
        self.build(&self.skeleton, &mut bound)
    }

    fn build(
        &self,
        skeleton: &Skeleton,
        bound: &mut [Option<Expression>],
    ) -> Result<Expression, TemplateError> {
        match skeleton {
            Skeleton::Slot(index) => bound
                .get_mut(*index)
                .and_then(Option::take)
                .ok_or_else(|| TemplateError::UnboundSlot {
                    template: self.pattern.clone(),
                    slot: *index,
                }),
            Skeleton::StaticCall {
                owner,
                name,
                args,
                returns,
            } => {
                let owner_ty = JavaType::class(owner.as_str());
                let select = Expression::identifier(owner_ty.simple_name(), Some(owner_ty.clone()));
                let args = self.build_all(args, bound)?;
                Ok(invocation(Some(select), owner, name, args, returns, true))
            }
            Skeleton::Call {
                target,
                owner,
                name,
                args,
                returns,
            } => {
                let select = self.build(target, bound)?;
                let args = self.build_all(args, bound)?;
                Ok(invocation(Some(select), owner, name, args, returns, false))
            }
            Skeleton::Concat(left, right) => {
                let left = self.build(left, bound)?;
                let right = self.build(right, bound)?;
                Ok(Expression::binary(
                    BinaryOperator::Addition,
                    left,
                    right,
                    Some(JavaType::string()),
                ))
            }
        }
    }

    fn build_all(
        &self,
        skeletons: &[Skeleton],
        bound: &mut [Option<Expression>],
    ) -> Result<Vec<Expression>, TemplateError> {
        skeletons.iter().map(|s| self.build(s, bound)).collect()
    }
}

fn invocation(
    select: Option<Expression>,
    owner: &str,
    name: &str,
    args: Vec<Expression>,
    returns: &JavaType,
    is_static: bool,
) -> Expression {
    let method_type = MethodType {
        declaring_type: owner.to_string(),
        name: name.to_string(),
        parameter_types: args
            .iter()
            .map(|a| a.ty.clone().unwrap_or_else(JavaType::object))
            .collect(),
        return_type: Some(returns.clone()),
        is_static,
    };
    Expression::invocation(select, name, args, Some(method_type))
}
