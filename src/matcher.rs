//! Pattern matching for rule option values
//!
//! Rule options frequently accept either a literal string or a regular
//! expression written in string form. A string is treated as a regex when it
//! is wrapped in `/` delimiters, optionally with a trailing `i` for
//! case-insensitive matching:
//!
//! ```text
//! "color"      literal comparison
//! "/^c/"       regex comparison
//! "/^c/i"      case-insensitive regex comparison
//! ```
//!
//! Both the input and the comparison may be a single value or a list; the
//! first successful match wins and later candidates are not evaluated.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error constructing a pattern from configuration
#[derive(Debug, Error)]
pub enum MatcherError {
    #[error("invalid regex pattern `/{pattern}/`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A single match target parsed from a configuration string
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Plain string, compared for equality
    Literal(String),
    /// Compiled regular expression from the `/.../` form
    Regex {
        regex: Regex,
        source: String,
        case_insensitive: bool,
    },
}

impl Pattern {
    /// Parse a configuration string into a tagged pattern.
    ///
    /// The embedded-regex convention: the string denotes a regex iff its
    /// first character is `/` and it either ends with `/` or ends with `/i`.
    /// Anything else, including strings shorter than two characters, is a
    /// literal. A regex body that fails to compile is an error, not a
    /// literal fallback.
    pub fn parse(raw: &str) -> Result<Self, MatcherError> {
        let bytes = raw.as_bytes();

        if bytes.len() >= 2 && bytes[0] == b'/' {
            if bytes[bytes.len() - 1] == b'/' {
                return Self::compile(&raw[1..raw.len() - 1], false);
            }

            if bytes[bytes.len() - 1] == b'i' && bytes[bytes.len() - 2] == b'/' {
                // "/i" itself has an empty body
                let body = if raw.len() > 3 { &raw[1..raw.len() - 2] } else { "" };
                return Self::compile(body, true);
            }
        }

        Ok(Pattern::Literal(raw.to_string()))
    }

    fn compile(source: &str, case_insensitive: bool) -> Result<Self, MatcherError> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| MatcherError::InvalidRegex {
                pattern: source.to_string(),
                source: e,
            })?;

        Ok(Pattern::Regex {
            regex,
            source: source.to_string(),
            case_insensitive,
        })
    }

    /// The literal text or regex body this pattern was built from
    pub fn source(&self) -> &str {
        match self {
            Pattern::Literal(text) => text,
            Pattern::Regex { source, .. } => source,
        }
    }

    /// Apply this pattern to a single value
    fn apply(&self, value: &str) -> Option<MatchResult> {
        match self {
            Pattern::Literal(text) => {
                if value == text {
                    Some(MatchResult {
                        matched_input: value.to_string(),
                        pattern: self.clone(),
                        substring: value.to_string(),
                    })
                } else {
                    None
                }
            }
            Pattern::Regex { regex, .. } => regex.find(value).map(|m| MatchResult {
                matched_input: value.to_string(),
                pattern: self.clone(),
                substring: m.as_str().to_string(),
            }),
        }
    }

    /// Whether this pattern is the regex variant
    pub fn is_regex(&self) -> bool {
        matches!(self, Pattern::Regex { .. })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Literal(a), Pattern::Literal(b)) => a == b,
            (
                Pattern::Regex {
                    source: a,
                    case_insensitive: ai,
                    ..
                },
                Pattern::Regex {
                    source: b,
                    case_insensitive: bi,
                    ..
                },
            ) => a == b && ai == bi,
            _ => false,
        }
    }
}

/// One comparison string or an ordered list of them, as written in options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Comparison {
    Single(String),
    List(Vec<String>),
}

impl Comparison {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        match self {
            Comparison::Single(s) => std::slice::from_ref(s).iter(),
            Comparison::List(list) => list.iter(),
        }
        .map(String::as_str)
    }
}

impl From<&str> for Comparison {
    fn from(s: &str) -> Self {
        Comparison::Single(s.to_string())
    }
}

impl From<Vec<&str>> for Comparison {
    fn from(list: Vec<&str>) -> Self {
        Comparison::List(list.into_iter().map(String::from).collect())
    }
}

/// One input string or an ordered list of them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Input {
    Single(String),
    List(Vec<String>),
}

impl From<&str> for Input {
    fn from(s: &str) -> Self {
        Input::Single(s.to_string())
    }
}

impl From<Vec<&str>> for Input {
    fn from(list: Vec<&str>) -> Self {
        Input::List(list.into_iter().map(String::from).collect())
    }
}

/// Details of a successful match
///
/// `substring` is always a contiguous slice of `matched_input`; for literal
/// patterns it equals the whole input, and an empty regex match yields an
/// empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// The input element that matched
    pub matched_input: String,
    /// The comparison element it matched against
    pub pattern: Pattern,
    /// The matched portion of the input
    pub substring: String,
}

/// Match an input (string or list) against a comparison (pattern or list).
///
/// Returns the first successful match in input order, then comparison order;
/// `Ok(None)` means no element matched. A malformed embedded regex surfaces
/// as an error rather than a non-match.
pub fn matches(input: &Input, comparison: &Comparison) -> Result<Option<MatchResult>, MatcherError> {
    match input {
        Input::Single(value) => match_value(value, comparison),
        Input::List(values) => {
            for value in values {
                if let Some(result) = match_value(value, comparison)? {
                    return Ok(Some(result));
                }
            }
            Ok(None)
        }
    }
}

fn match_value(value: &str, comparison: &Comparison) -> Result<Option<MatchResult>, MatcherError> {
    for raw in comparison.candidates() {
        let pattern = Pattern::parse(raw)?;
        if let Some(result) = pattern.apply(value) {
            return Ok(Some(result));
        }
    }
    Ok(None)
}

/// True when `options[property]` holds a comparison that matches `input`.
///
/// A boolean convenience over [`matches`] for raw secondary-option payloads:
/// false when the options are absent, the property is missing or not a
/// usable comparison, or the input value is not a string. Regex compile
/// errors inside a present comparison still propagate.
pub fn options_matches(
    options: Option<&Value>,
    property: &str,
    input: &Value,
) -> Result<bool, MatcherError> {
    let Some(options) = options else {
        return Ok(false);
    };
    let Some(value) = options.get(property) else {
        return Ok(false);
    };

    // Mirror option truthiness: null, false, and "" read as "not set"
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => return Ok(false),
        Value::String(s) if s.is_empty() => return Ok(false),
        _ => {}
    }

    let Ok(comparison) = serde_json::from_value::<Comparison>(value.clone()) else {
        return Ok(false);
    };

    let Some(input) = input.as_str() else {
        return Ok(false);
    };

    Ok(match_value(input, &comparison)?.is_some())
}
