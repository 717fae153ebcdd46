//! Casslint - CSS blank-line lint core
//!
//! A small building block of a style-sheet linting framework: a reusable
//! option pattern matcher and the `block-closing-brace-empty-line-before`
//! rule that polices empty lines before the closing brace of rule and
//! at-rule blocks.
//!
//! # Architecture
//!
//! ```text
//! option payload -> validation -> engine walk -> check -> fix | report
//! ```
//!
//! The engine validates the raw option payload, walks every statement of an
//! already-materialized [`document::Document`] depth-first, and applies each
//! pure check outcome: fix mode rewrites the statement's trailing
//! whitespace in place, report mode collects a [`Diagnostic`].
//!
//! # Example
//!
//! ```
//! use casslint::{lint, Document, FixContext, Statement};
//! use serde_json::json;
//!
//! let mut document = Document::new(vec![
//!     Statement::rule(".a")
//!         .with_declaration("\n  ", "color", "red")
//!         .with_after("\n"),
//! ]);
//!
//! let result = lint(
//!     &mut document,
//!     &json!("always-multi-line"),
//!     None,
//!     &FixContext::report_only(),
//! )
//! .unwrap();
//!
//! assert_eq!(result.diagnostics.len(), 1);
//! ```

pub mod diagnostic;
pub mod document;
pub mod engine;
pub mod fixer;
pub mod matcher;
pub mod rule;
pub mod rules;

// Re-export main types
pub use diagnostic::{Diagnostic, Severity};
pub use document::{Block, Document, Node, NodeType, Statement, StatementKind};
pub use engine::{lint, lint_with_options, LintError, LintResult};
pub use fixer::{add_empty_line_before_close, remove_empty_lines_before_close};
pub use matcher::{matches, options_matches, Comparison, Input, MatchResult, MatcherError, Pattern};
pub use rule::{ConfigError, FixContext, Primary, RuleOptions};
pub use rules::empty_line_before::{CheckOutcome, FixAction, Violation, RULE_NAME};
