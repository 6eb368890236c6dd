use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Invalid rule option, reported before any unit is scanned.
pub enum ConfigError {
    #[error("unknown target: `null` (expected one of {})", TargetMode::expected())]
    MissingTarget,
    #[error("unknown target: `empty` (expected one of {})", TargetMode::expected())]
    EmptyTarget,
    #[error("unknown target: {0} (expected one of {})", TargetMode::expected())]
    UnknownTarget(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// Which source units a rule instance rewrites.
pub enum TargetMode {
    AllSource,
    /// Non-test sources first; widened to all sources once a non-test
    /// source has been changed.
    AllSourceWhenNonTestDetected,
    NonTestSource,
}

impl TargetMode {
    pub const ALL_SOURCE: &'static str = "All Source";
    pub const ALL_SOURCE_IF_DETECTED: &'static str = "All Source if detected in Non Test Source";
    pub const NON_TEST_SOURCE: &'static str = "Non-Test Source";

    pub const VALUES: [&'static str; 3] = [
        Self::ALL_SOURCE,
        Self::ALL_SOURCE_IF_DETECTED,
        Self::NON_TEST_SOURCE,
    ];

    /// Parses an optional option value, distinguishing absent from empty.
    ///
    /// # Example
    /// ```
    /// use loader::{ConfigError, TargetMode};
    /// assert_eq!(TargetMode::parse(Some("All Source")), Ok(TargetMode::AllSource));
    /// assert_eq!(TargetMode::parse(None), Err(ConfigError::MissingTarget));
    /// ```
    pub fn parse(value: Option<&str>) -> Result<Self, ConfigError> {
        value.ok_or(ConfigError::MissingTarget)?.parse()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TargetMode::AllSource => Self::ALL_SOURCE,
            TargetMode::AllSourceWhenNonTestDetected => Self::ALL_SOURCE_IF_DETECTED,
            TargetMode::NonTestSource => Self::NON_TEST_SOURCE,
        }
    }

    /// Whether units classified as test sources are left untouched.
    pub fn skips_test_sources(self) -> bool {
        matches!(
            self,
            TargetMode::NonTestSource | TargetMode::AllSourceWhenNonTestDetected
        )
    }

    fn expected() -> String {
        Self::VALUES
            .iter()
            .map(|v| format!("\"{v}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for TargetMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ALL_SOURCE => Ok(TargetMode::AllSource),
            Self::ALL_SOURCE_IF_DETECTED => Ok(TargetMode::AllSourceWhenNonTestDetected),
            Self::NON_TEST_SOURCE => Ok(TargetMode::NonTestSource),
            "" => Err(ConfigError::EmptyTarget),
            other => Err(ConfigError::UnknownTarget(other.to_string())),
        }
    }
}

impl TryFrom<String> for TargetMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetMode> for String {
    fn from(mode: TargetMode) -> Self {
        mode.as_str().to_string()
    }
}

impl fmt::Display for TargetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_documented_value() {
        for value in TargetMode::VALUES {
            let mode: TargetMode = value.parse().unwrap();
            assert_eq!(mode.as_str(), value);
        }
    }

    #[test]
    fn distinguishes_missing_empty_and_unknown() {
        assert_eq!(TargetMode::parse(None), Err(ConfigError::MissingTarget));
        assert_eq!(TargetMode::parse(Some("")), Err(ConfigError::EmptyTarget));
        assert_eq!(
            TargetMode::parse(Some("all source")),
            Err(ConfigError::UnknownTarget("all source".into()))
        );
        assert!(ConfigError::MissingTarget.to_string().contains("`null`"));
        assert!(ConfigError::EmptyTarget.to_string().contains("`empty`"));
        let unknown = ConfigError::UnknownTarget("Tests".into()).to_string();
        assert!(unknown.starts_with("unknown target: Tests"));
        assert!(unknown.contains("\"Non-Test Source\""));
    }

    #[test]
    fn only_all_source_covers_tests() {
        assert!(!TargetMode::AllSource.skips_test_sources());
        assert!(TargetMode::NonTestSource.skips_test_sources());
        assert!(TargetMode::AllSourceWhenNonTestDetected.skips_test_sources());
    }

    #[test]
    fn serializes_as_option_string() {
        let json = serde_json::to_string(&TargetMode::NonTestSource).unwrap();
        assert_eq!(json, "\"Non-Test Source\"");
        let back: TargetMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TargetMode::NonTestSource);
        assert!(serde_json::from_str::<TargetMode>("\"bogus\"").is_err());
    }
}
