use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Top-level layout shared by YAML and JSON rule files.
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Rule entry as written by the user. Options are validated when the
/// entry is compiled into a [`RuleConfig`](crate::RuleConfig).
pub struct RuleEntry {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub target: Option<String>,
}
