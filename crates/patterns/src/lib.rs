//! Structural building blocks shared by rewrite rules: call-site matchers
//! and typed code templates.

use ir::JavaType;
use thiserror::Error;

mod matcher;
mod template;

pub use matcher::{Arity, MethodMatcher};
pub use template::{Skeleton, Template};

#[derive(Debug, Error, PartialEq)]
pub enum PatternError {
    #[error("invalid method signature '{0}': expected '<owner> <name>(<args>)'")]
    InvalidSignature(String),
}

#[derive(Debug, Error, PartialEq)]
/// Raised when a template is instantiated with arguments that violate its
/// declared slots. Always a defect in the calling rule.
pub enum TemplateError {
    #[error("template `{template}` expects {expected} arguments, got {found}")]
    ArityMismatch {
        template: String,
        expected: usize,
        found: usize,
    },
    #[error("template `{template}` slot {slot} expects {expected}, got {found}")]
    TypeMismatch {
        template: String,
        slot: usize,
        expected: JavaType,
        found: JavaType,
    },
    #[error("template `{template}` references unbound slot {slot}")]
    UnboundSlot { template: String, slot: usize },
}
