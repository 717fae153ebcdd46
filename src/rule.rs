//! Rule options and their validation
//!
//! Option payloads arrive as raw JSON values, the shape a configuration
//! file produces. Validation checks them against the rule's enumerated
//! schema before any traversal happens; on rejection the engine aborts with
//! no reports and no fixes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid primary option: {0}")]
    InvalidPrimary(String),

    #[error("invalid secondary options: {0}")]
    InvalidSecondary(String),
}

/// Primary option: when an empty line is required before the closing brace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primary {
    /// Require an empty line before `}` in multi-line blocks
    AlwaysMultiLine,
    /// Disallow empty lines before `}`
    Never,
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primary::AlwaysMultiLine => write!(f, "always-multi-line"),
            Primary::Never => write!(f, "never"),
        }
    }
}

impl std::str::FromStr for Primary {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always-multi-line" => Ok(Primary::AlwaysMultiLine),
            "never" => Ok(Primary::Never),
            other => Err(ConfigError::InvalidPrimary(other.to_string())),
        }
    }
}

/// The only recognized `except` entry
pub const EXCEPT_AFTER_CLOSING_BRACE: &str = "after-closing-brace";

/// Validated options for the rule
///
/// The raw secondary payload is retained so the check can interpret
/// `except` through the option matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOptions {
    pub primary: Primary,
    secondary: Option<Value>,
}

impl RuleOptions {
    /// Options with no secondary payload
    pub fn new(primary: Primary) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Options with `except: ["after-closing-brace"]`
    pub fn with_except_after_closing_brace(primary: Primary) -> Self {
        Self {
            primary,
            secondary: Some(serde_json::json!({
                "except": [EXCEPT_AFTER_CLOSING_BRACE],
            })),
        }
    }

    /// Validate a raw option payload against the rule schema.
    ///
    /// Primary must be `"always-multi-line"` or `"never"`. Secondary, when
    /// present, must be an object whose only key is `except`, holding the
    /// string `"after-closing-brace"` or a list of it.
    pub fn validate(primary: &Value, secondary: Option<&Value>) -> Result<Self, ConfigError> {
        let primary = match primary {
            Value::String(s) => s.parse::<Primary>()?,
            other => return Err(ConfigError::InvalidPrimary(other.to_string())),
        };

        if let Some(secondary) = secondary {
            let Value::Object(map) = secondary else {
                return Err(ConfigError::InvalidSecondary(format!(
                    "expected an object, got {secondary}"
                )));
            };

            for (key, value) in map {
                if key != "except" {
                    return Err(ConfigError::InvalidSecondary(format!(
                        "unknown option `{key}`"
                    )));
                }
                validate_except(value)?;
            }
        }

        Ok(Self {
            primary,
            secondary: secondary.cloned(),
        })
    }

    /// The raw secondary payload, for option matching
    pub fn secondary(&self) -> Option<&Value> {
        self.secondary.as_ref()
    }
}

fn validate_except(value: &Value) -> Result<(), ConfigError> {
    let entries: Vec<&Value> = match value {
        Value::Array(list) => list.iter().collect(),
        other => vec![other],
    };

    for entry in entries {
        match entry.as_str() {
            Some(EXCEPT_AFTER_CLOSING_BRACE) => {}
            Some(other) => {
                return Err(ConfigError::InvalidSecondary(format!(
                    "unknown except value `{other}`"
                )))
            }
            None => {
                return Err(ConfigError::InvalidSecondary(format!(
                    "except entries must be strings, got {entry}"
                )))
            }
        }
    }

    Ok(())
}

/// Fix-mode context passed alongside the options
///
/// `newline` is the line-ending convention used when rewriting whitespace.
/// Fix mode without a newline convention skips fixing instead of failing;
/// that behavior is preserved as the explicit `FixSkipped` check outcome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixContext {
    pub fix: bool,
    pub newline: Option<String>,
}

impl FixContext {
    /// Report violations, never rewrite
    pub fn report_only() -> Self {
        Self::default()
    }

    /// Rewrite violations using the given line ending
    pub fn fix(newline: &str) -> Self {
        Self {
            fix: true,
            newline: Some(newline.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_primary_from_str() {
        assert_eq!(
            "always-multi-line".parse::<Primary>().unwrap(),
            Primary::AlwaysMultiLine
        );
        assert_eq!("never".parse::<Primary>().unwrap(), Primary::Never);
        assert!("always".parse::<Primary>().is_err());
    }

    #[test]
    fn test_primary_display_round_trip() {
        for primary in [Primary::AlwaysMultiLine, Primary::Never] {
            assert_eq!(primary.to_string().parse::<Primary>().unwrap(), primary);
        }
    }

    #[test]
    fn test_validate_primary_only() {
        let options = RuleOptions::validate(&json!("never"), None).unwrap();
        assert_eq!(options.primary, Primary::Never);
        assert!(options.secondary().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_primary() {
        assert!(RuleOptions::validate(&json!("sometimes"), None).is_err());
        assert!(RuleOptions::validate(&json!(true), None).is_err());
        assert!(RuleOptions::validate(&json!(["never"]), None).is_err());
    }

    #[test]
    fn test_validate_except() {
        let secondary = json!({ "except": ["after-closing-brace"] });
        let options =
            RuleOptions::validate(&json!("always-multi-line"), Some(&secondary)).unwrap();
        assert_eq!(options.secondary(), Some(&secondary));

        // Scalar form is accepted too
        let secondary = json!({ "except": "after-closing-brace" });
        assert!(RuleOptions::validate(&json!("never"), Some(&secondary)).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_secondary() {
        let unknown_key = json!({ "ignore": ["after-closing-brace"] });
        assert!(RuleOptions::validate(&json!("never"), Some(&unknown_key)).is_err());

        let unknown_value = json!({ "except": ["before-opening-brace"] });
        assert!(RuleOptions::validate(&json!("never"), Some(&unknown_value)).is_err());

        let not_an_object = json!(["except"]);
        assert!(RuleOptions::validate(&json!("never"), Some(&not_an_object)).is_err());

        let non_string_entry = json!({ "except": [42] });
        assert!(RuleOptions::validate(&json!("never"), Some(&non_string_entry)).is_err());
    }

    #[test]
    fn test_fix_context() {
        assert!(!FixContext::report_only().fix);
        let ctx = FixContext::fix("\n");
        assert!(ctx.fix);
        assert_eq!(ctx.newline.as_deref(), Some("\n"));
    }
}
