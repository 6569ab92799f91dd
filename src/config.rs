//! Registry configuration.

use serde::{Deserialize, Serialize};

/// Name used for the combination with no flags when none is configured.
pub const DEFAULT_EMPTY_STATE_NAME: &str = "empty";

/// Configuration of a [`Multistate`](crate::Multistate) registry.
///
/// All fields are optional when deserializing:
///
/// ```rust
/// use multistate::{LintLevel, MultistateConfig};
///
/// let config = MultistateConfig::from_json(r#"{ "lint": "deny" }"#).unwrap();
///
/// assert_eq!(config.lint, LintLevel::Deny);
/// assert_eq!(config.empty_state_name(), "empty");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultistateConfig {
    /// Label of the combination with no flags set.
    pub empty_state_name: Option<String>,
    /// What to do with lint violations found at compile time.
    pub lint: LintLevel,
}

impl MultistateConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_empty_state_name(mut self, name: impl Into<String>) -> Self {
        self.empty_state_name = Some(name.into());
        self
    }

    pub fn with_lint(mut self, lint: LintLevel) -> Self {
        self.lint = lint;
        self
    }

    /// The configured empty-state label, or [`DEFAULT_EMPTY_STATE_NAME`].
    pub fn empty_state_name(&self) -> &str {
        match self.empty_state_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_EMPTY_STATE_NAME,
        }
    }
}

/// Handling of lint violations during compile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintLevel {
    /// Skip the lint pass.
    #[default]
    Allow,
    /// Log every violation and carry on.
    Warn,
    /// Fail the compile.
    Deny,
}
