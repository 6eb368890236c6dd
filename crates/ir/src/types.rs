//! Static type attribution attached to syntax nodes by the front end.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_STRING: &str = "java.lang.String";

/// JDK classes declared `final`: no other class type can be a subtype.
const FINAL_CLASSES: &[&str] = &[
    JAVA_LANG_STRING,
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.Class",
    "java.nio.file.Files",
    "java.nio.file.Paths",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Type of an expression or declaration.
pub enum JavaType {
    Primitive(Primitive),
    /// Fully qualified class type, e.g. `java.io.File`.
    Class(String),
    /// Type of the `null` literal.
    Null,
}

impl JavaType {
    pub fn class(fqn: impl Into<String>) -> Self {
        JavaType::Class(fqn.into())
    }

    pub fn string() -> Self {
        JavaType::class(JAVA_LANG_STRING)
    }

    pub fn object() -> Self {
        JavaType::class(JAVA_LANG_OBJECT)
    }

    pub fn boolean() -> Self {
        JavaType::Primitive(Primitive::Boolean)
    }

    /// Fully qualified name for class types.
    pub fn fully_qualified(&self) -> Option<&str> {
        match self {
            JavaType::Class(fqn) => Some(fqn),
            _ => None,
        }
    }

    pub fn is_class(&self, fqn: &str) -> bool {
        self.fully_qualified() == Some(fqn)
    }

    /// Name as written in source without the package prefix.
    pub fn simple_name(&self) -> &str {
        match self {
            JavaType::Primitive(p) => p.keyword(),
            JavaType::Class(fqn) => fqn.rsplit('.').next().unwrap_or(fqn),
            JavaType::Null => "null",
        }
    }

    /// Whether a value of this type can be passed where `expected` is declared.
    ///
    /// Attribution carries no class hierarchy, so two distinct class types
    /// are taken as compatible unless either one is a known `final` class.
    ///
    /// # Example
    /// ```
    /// use ir::JavaType;
    /// let file = JavaType::class("java.io.File");
    /// assert!(JavaType::Null.is_assignable_to(&file));
    /// assert!(JavaType::class("com.acme.CacheDir").is_assignable_to(&file));
    /// assert!(!JavaType::string().is_assignable_to(&file));
    /// ```
    pub fn is_assignable_to(&self, expected: &JavaType) -> bool {
        match (self, expected) {
            (a, b) if a == b => true,
            (JavaType::Null, JavaType::Class(_)) => true,
            (JavaType::Class(_), JavaType::Class(fqn)) if fqn == JAVA_LANG_OBJECT => true,
            (JavaType::Class(found), JavaType::Class(fqn)) => {
                !FINAL_CLASSES.contains(&found.as_str()) && !FINAL_CLASSES.contains(&fqn.as_str())
            }
            _ => false,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Class(fqn) => f.write_str(fqn),
            JavaType::Null => f.write_str("null"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// Resolved signature of a method invocation.
pub struct MethodType {
    /// Fully qualified owner of the invoked method.
    pub declaring_type: String,
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<JavaType>,
    /// `None` for `void` methods.
    #[serde(default)]
    pub return_type: Option<JavaType>,
    #[serde(default)]
    pub is_static: bool,
}
