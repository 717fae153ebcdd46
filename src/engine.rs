//! Traversal runner
//!
//! Validates the option payload, walks every statement in document order,
//! and applies each check outcome: fixes mutate the statement in place,
//! reports are pushed onto the result's diagnostics list. The walk is a
//! single synchronous pass; a fix only touches the statement being visited,
//! so earlier decisions stay valid.

use crate::diagnostic::{Diagnostic, Severity};
use crate::document::Document;
use crate::fixer::{add_empty_line_before_close, remove_empty_lines_before_close};
use crate::matcher::MatcherError;
use crate::rule::{ConfigError, FixContext, RuleOptions};
use crate::rules::empty_line_before::{self, CheckOutcome, FixAction, RULE_NAME};
use log::debug;
use serde_json::Value;
use thiserror::Error;

/// Error aborting a lint run
#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Matcher(#[from] MatcherError),
}

/// Result of linting one document
#[derive(Debug, Default)]
pub struct LintResult {
    /// All diagnostics, in traversal order
    pub diagnostics: Vec<Diagnostic>,

    /// Statements visited
    pub statements_checked: usize,

    /// Fixes applied to the tree
    pub fixes_applied: usize,

    /// Fixes skipped because no newline convention was supplied
    pub fixes_skipped: usize,
}

impl LintResult {
    /// Check if result is clean (no diagnostics)
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of warning-level diagnostics
    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: LintResult) {
        self.diagnostics.extend(other.diagnostics);
        self.statements_checked += other.statements_checked;
        self.fixes_applied += other.fixes_applied;
        self.fixes_skipped += other.fixes_skipped;
    }
}

/// Validate a raw option payload and lint the document.
///
/// Invalid options abort before traversal: no reports, no fixes.
pub fn lint(
    document: &mut Document,
    primary: &Value,
    secondary: Option<&Value>,
    ctx: &FixContext,
) -> Result<LintResult, LintError> {
    let options = RuleOptions::validate(primary, secondary)?;
    lint_with_options(document, &options, ctx)
}

/// Lint the document with already-validated options
pub fn lint_with_options(
    document: &mut Document,
    options: &RuleOptions,
    ctx: &FixContext,
) -> Result<LintResult, LintError> {
    let mut result = LintResult::default();
    let mut first_error: Option<MatcherError> = None;

    document.walk_statements_mut(&mut |statement| {
        if first_error.is_some() {
            return;
        }
        result.statements_checked += 1;

        let outcome = match empty_line_before::check(statement, options, ctx) {
            Ok(outcome) => outcome,
            Err(e) => {
                first_error = Some(e);
                return;
            }
        };

        match outcome {
            CheckOutcome::NoViolation => {}
            CheckOutcome::FixSkipped => {
                debug!("{RULE_NAME}: fix requested without a newline convention, skipping");
                result.fixes_skipped += 1;
            }
            CheckOutcome::Fix(action) => {
                // check() only returns Fix when a newline convention exists
                let newline = ctx.newline.as_deref().unwrap_or("\n");
                match action {
                    FixAction::InsertEmptyLine => add_empty_line_before_close(statement, newline),
                    FixAction::CollapseEmptyLines => {
                        remove_empty_lines_before_close(statement, newline)
                    }
                }
                result.fixes_applied += 1;
            }
            CheckOutcome::Report(violation) => {
                debug!(
                    "{RULE_NAME}: {} at {} index {}",
                    violation.message,
                    statement.prelude(),
                    violation.index
                );
                result.diagnostics.push(Diagnostic::new(
                    RULE_NAME,
                    Severity::Warning,
                    violation.message,
                    statement.prelude(),
                    violation.index,
                ));
            }
        }
    });

    match first_error {
        Some(e) => Err(e.into()),
        None => Ok(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Statement;
    use crate::rule::Primary;
    use crate::rules::empty_line_before::{MESSAGE_EXPECTED, MESSAGE_REJECTED};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document_with(statements: Vec<Statement>) -> Document {
        Document::new(statements)
    }

    fn multi_line_rule(selector: &str, after: &str) -> Statement {
        Statement::rule(selector)
            .with_declaration("\n  ", "color", "red")
            .with_after(after)
    }

    #[test]
    fn test_reports_in_traversal_order() {
        let mut document = document_with(vec![
            multi_line_rule(".a", "\n"),
            multi_line_rule(".b", "\n\n"),
            multi_line_rule(".c", "\n"),
        ]);

        let result = lint(
            &mut document,
            &json!("always-multi-line"),
            None,
            &FixContext::report_only(),
        )
        .unwrap();

        assert_eq!(result.statements_checked, 3);
        let statements: Vec<&str> = result
            .diagnostics
            .iter()
            .map(|d| d.statement.as_str())
            .collect();
        assert_eq!(statements, vec![".a", ".c"]);
        assert!(result
            .diagnostics
            .iter()
            .all(|d| d.message == MESSAGE_EXPECTED && d.rule_id == RULE_NAME));
        assert_eq!(result.warning_count(), 2);
        assert!(!result.is_clean());
    }

    #[test]
    fn test_never_reports_unexpected() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n\n")]);

        let result = lint(
            &mut document,
            &json!("never"),
            None,
            &FixContext::report_only(),
        )
        .unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].message, MESSAGE_REJECTED);
    }

    #[test]
    fn test_invalid_options_abort_before_traversal() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n")]);
        let original = document.to_css();

        let err = lint(
            &mut document,
            &json!("sometimes"),
            None,
            &FixContext::fix("\n"),
        )
        .unwrap_err();

        assert!(matches!(err, LintError::Config(_)));
        assert_eq!(document.to_css(), original);
    }

    #[test]
    fn test_fix_inserts_empty_line() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n")]);

        let result = lint(
            &mut document,
            &json!("always-multi-line"),
            None,
            &FixContext::fix("\n"),
        )
        .unwrap();

        assert_eq!(result.fixes_applied, 1);
        assert!(result.is_clean());
        assert_eq!(document.to_css(), ".a {\n  color: red;\n\n}");
    }

    #[test]
    fn test_fix_collapses_empty_lines() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n\n")]);

        let result = lint(&mut document, &json!("never"), None, &FixContext::fix("\n")).unwrap();

        assert_eq!(result.fixes_applied, 1);
        assert_eq!(document.to_css(), ".a {\n  color: red;\n}");
    }

    #[test]
    fn test_fix_is_idempotent_at_rule_level() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n")]);
        let ctx = FixContext::fix("\n");

        let first = lint(&mut document, &json!("always-multi-line"), None, &ctx).unwrap();
        assert_eq!(first.fixes_applied, 1);
        let fixed = document.to_css();

        let second = lint(&mut document, &json!("always-multi-line"), None, &ctx).unwrap();
        assert_eq!(second.fixes_applied, 0);
        assert!(second.is_clean());
        assert_eq!(document.to_css(), fixed);
    }

    #[test]
    fn test_fix_without_newline_is_counted_as_skipped() {
        let mut document = document_with(vec![multi_line_rule(".a", "\n")]);
        let original = document.to_css();
        let ctx = FixContext {
            fix: true,
            newline: None,
        };

        let result = lint(&mut document, &json!("always-multi-line"), None, &ctx).unwrap();

        assert_eq!(result.fixes_applied, 0);
        assert_eq!(result.fixes_skipped, 1);
        assert!(result.is_clean());
        assert_eq!(document.to_css(), original);
    }

    #[test]
    fn test_nested_statements_are_visited() {
        let nested = multi_line_rule(".a", "\n  ");
        let mut document = document_with(vec![Statement::at_rule("@media screen")
            .with_nested("\n  ", nested)
            .with_after("\n")]);

        let result = lint(
            &mut document,
            &json!("always-multi-line"),
            None,
            &FixContext::report_only(),
        )
        .unwrap();

        assert_eq!(result.statements_checked, 2);
        // Both the at-rule and the nested rule lack the empty line
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.diagnostics[0].statement, "@media screen");
        assert_eq!(result.diagnostics[1].statement, ".a");
    }

    #[test]
    fn test_except_option_round_trip_through_validation() {
        let nested = multi_line_rule(".a", "\n\n  ");
        let mut document = document_with(vec![Statement::at_rule("@media screen")
            .with_nested("\n  ", nested)
            .with_after("\n")]);

        let secondary = json!({ "except": ["after-closing-brace"] });
        let result = lint(
            &mut document,
            &json!("always-multi-line"),
            Some(&secondary),
            &FixContext::report_only(),
        )
        .unwrap();

        // The at-rule is excepted (wraps only a rule); the nested rule complies
        assert!(result.is_clean());
    }

    #[test]
    fn test_merge() {
        let mut a = LintResult {
            diagnostics: vec![Diagnostic::new(RULE_NAME, Severity::Warning, "m", ".a", 1)],
            statements_checked: 2,
            fixes_applied: 1,
            fixes_skipped: 0,
        };
        let b = LintResult {
            diagnostics: vec![Diagnostic::new(RULE_NAME, Severity::Warning, "m", ".b", 2)],
            statements_checked: 3,
            fixes_applied: 0,
            fixes_skipped: 1,
        };

        a.merge(b);
        assert_eq!(a.diagnostics.len(), 2);
        assert_eq!(a.statements_checked, 5);
        assert_eq!(a.fixes_applied, 1);
        assert_eq!(a.fixes_skipped, 1);
    }
}
