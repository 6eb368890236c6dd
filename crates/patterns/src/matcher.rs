use ir::{Expression, MethodInvocation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PatternError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Accepted argument lists for a matched method.
pub enum Arity {
    /// `(..)`: any number of arguments of any type.
    Any,
    /// Exact parameter list, by fully qualified type name.
    Exact(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Matches invocations by declaring type, name and argument list.
///
/// Only the attributed [`ir::MethodType`] is consulted, never the textual
/// shape of the receiver, so `File.createTempFile(..)`, `f.mkdir()` and
/// `holder.dir().mkdir()` all match on the same terms.
///
/// # Example
/// ```
/// use patterns::MethodMatcher;
/// let m: MethodMatcher = "java.io.File mkdir()".parse().unwrap();
/// assert_eq!(m.owner(), "java.io.File");
/// assert_eq!(m.name(), "mkdir");
/// ```
pub struct MethodMatcher {
    owner: String,
    name: String,
    arity: Arity,
}

impl MethodMatcher {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, arity: Arity) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            arity,
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> &Arity {
        &self.arity
    }

    pub fn matches(&self, call: &MethodInvocation) -> bool {
        let Some(method) = &call.method_type else {
            return false;
        };
        if method.declaring_type != self.owner || call.name != self.name {
            return false;
        }
        match &self.arity {
            Arity::Any => true,
            Arity::Exact(params) => {
                if call.arguments.len() != params.len() {
                    return false;
                }
                // Unattributed parameter lists are accepted on arity alone.
                method.parameter_types.is_empty()
                    || method
                        .parameter_types
                        .iter()
                        .map(|t| t.to_string())
                        .eq(params.iter().cloned())
            }
        }
    }

    /// Returns the invocation and its argument count when `expr` matches.
    pub fn match_expression<'a>(&self, expr: &'a Expression) -> Option<(&'a MethodInvocation, usize)> {
        let call = expr.as_method_invocation()?;
        self.matches(call).then_some((call, call.arguments.len()))
    }
}

impl FromStr for MethodMatcher {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PatternError::InvalidSignature(s.to_string());
        let (owner, rest) = s.trim().split_once(char::is_whitespace).ok_or_else(invalid)?;
        let rest = rest.trim();
        let open = rest.find('(').ok_or_else(invalid)?;
        let args = rest[open + 1..].strip_suffix(')').ok_or_else(invalid)?.trim();
        let name = rest[..open].trim();
        if owner.is_empty() || name.is_empty() || name.contains(char::is_whitespace) {
            return Err(invalid());
        }
        let arity = match args {
            ".." => Arity::Any,
            "" => Arity::Exact(Vec::new()),
            list => {
                let params: Vec<String> = list.split(',').map(|p| p.trim().to_string()).collect();
                if params.iter().any(|p| p.is_empty() || p == "..") {
                    return Err(invalid());
                }
                Arity::Exact(params)
            }
        };
        Ok(Self::new(owner, name, arity))
    }
}

impl TryFrom<String> for MethodMatcher {
    type Error = PatternError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MethodMatcher> for String {
    fn from(m: MethodMatcher) -> Self {
        m.to_string()
    }
}

impl fmt::Display for MethodMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = match &self.arity {
            Arity::Any => "..".to_string(),
            Arity::Exact(params) => params.join(", "),
        };
        write!(f, "{} {}({args})", self.owner, self.name)
    }
}
