//! `block-closing-brace-empty-line-before`
//!
//! Requires or disallows an empty line before the closing brace of rule and
//! at-rule blocks. With `primary: always-multi-line`, multi-line blocks must
//! end with an empty line; with `primary: never`, no block may. The
//! `except: after-closing-brace` secondary option inverts the expectation
//! for at-rules whose block contains no declarations (blocks that only wrap
//! other rules, such as `@media`).
//!
//! The per-statement decision is pure: it reads the statement and returns a
//! [`CheckOutcome`]; the engine is responsible for mutating the tree or
//! pushing a diagnostic.

use crate::document::{NodeType, Statement, StatementKind};
use crate::matcher::{options_matches, MatcherError};
use crate::rule::{FixContext, Primary, RuleOptions, EXCEPT_AFTER_CLOSING_BRACE};
use regex::Regex;
use serde_json::Value;

/// Rule identifier
pub const RULE_NAME: &str = "block-closing-brace-empty-line-before";

/// Message when an empty line is required but missing
pub const MESSAGE_EXPECTED: &str = "Expected empty line before closing brace";

/// Message when an empty line is present but disallowed
pub const MESSAGE_REJECTED: &str = "Unexpected empty line before closing brace";

/// Whitespace rewrite the engine should apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixAction {
    /// An empty line is expected and missing
    InsertEmptyLine,
    /// An empty line is present and disallowed
    CollapseEmptyLines,
}

/// A violation to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub message: &'static str,
    /// Byte offset of the closing brace within the statement serialization
    pub index: usize,
}

/// Outcome of checking a single statement
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Expectation met, nothing to do
    NoViolation,
    /// Violation found, fix mode off
    Report(Violation),
    /// Violation found, fix mode on with a newline convention
    Fix(FixAction),
    /// Violation found, fix mode on but no newline convention supplied.
    /// Preserved silent-skip behavior; the engine only counts it.
    FixSkipped,
}

/// Check one statement against the rule.
///
/// Statements without a block, or with an empty block, never produce a
/// violation. A malformed pattern in the `except` comparison surfaces as an
/// error.
pub fn check(
    statement: &Statement,
    options: &RuleOptions,
    ctx: &FixContext,
) -> Result<CheckOutcome, MatcherError> {
    let Some(block) = statement.block() else {
        return Ok(CheckOutcome::NoViolation);
    };
    if block.is_empty() {
        return Ok(CheckOutcome::NoViolation);
    }

    // Trailing whitespace with any stray semicolons dropped
    let before = strip_stray_semicolons(block.after());

    let css = statement.to_css();
    let mut index = css.len() - 1;
    if index >= 1 && css.as_bytes()[index - 1] == b'\r' {
        index -= 1;
    }

    let expect_empty_line = if is_excepted_at_rule(statement, options)? {
        options.primary == Primary::Never
    } else {
        options.primary == Primary::AlwaysMultiLine && !is_single_line(&statement.block_to_css())
    };

    let has_empty_line_before = has_empty_line(&before);

    if expect_empty_line == has_empty_line_before {
        return Ok(CheckOutcome::NoViolation);
    }

    if ctx.fix {
        if ctx.newline.is_none() {
            return Ok(CheckOutcome::FixSkipped);
        }
        let action = if expect_empty_line {
            FixAction::InsertEmptyLine
        } else {
            FixAction::CollapseEmptyLines
        };
        return Ok(CheckOutcome::Fix(action));
    }

    let message = if expect_empty_line {
        MESSAGE_EXPECTED
    } else {
        MESSAGE_REJECTED
    };

    Ok(CheckOutcome::Report(Violation { message, index }))
}

/// The `after-closing-brace` override: at-rules whose block holds no
/// declarations get the inverted expectation.
fn is_excepted_at_rule(statement: &Statement, options: &RuleOptions) -> Result<bool, MatcherError> {
    if statement.kind() != StatementKind::AtRule {
        return Ok(false);
    }

    let excepted = options_matches(
        options.secondary(),
        "except",
        &Value::from(EXCEPT_AFTER_CLOSING_BRACE),
    )?;
    if !excepted {
        return Ok(false);
    }

    let has_declaration = statement
        .block()
        .map(|block| {
            block
                .nodes()
                .iter()
                .any(|node| node.node_type() == NodeType::Declaration)
        })
        .unwrap_or(false);

    Ok(!has_declaration)
}

/// At least one fully empty line: two line breaks with only whitespace
/// between them, tolerating a carriage return before each.
fn has_empty_line(text: &str) -> bool {
    Regex::new(r"\r?\n\s*\r?\n").unwrap().is_match(text)
}

/// No line break of any flavor
fn is_single_line(text: &str) -> bool {
    !text.contains('\n') && !text.contains('\r')
}

/// Drop the first run of redundant statement separators
fn strip_stray_semicolons(after: &str) -> String {
    Regex::new(";+").unwrap().replacen(after, 1, "").into_owned()
}
