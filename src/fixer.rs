//! Whitespace-editing primitives for auto-fix
//!
//! Both operations rewrite only a statement's trailing whitespace (the raw
//! text between its last child and the closing brace). They are applied by
//! the engine when a check decides a fix is due; a statement that already
//! complies is never handed to them, which keeps fixing idempotent at the
//! rule level.

use crate::document::Statement;
use regex::Regex;

/// Insert an empty line into the statement's trailing whitespace.
///
/// If the whitespace has no line break yet, the newline convention is
/// prefixed twice; otherwise one extra newline is inserted before the first
/// existing line break, preserving any indentation that follows it.
pub fn add_empty_line_before_close(statement: &mut Statement, newline: &str) {
    let after = statement.after().to_string();
    let line_break = Regex::new(r"\r?\n").unwrap();

    let rewritten = if line_break.is_match(&after) {
        line_break
            .replacen(&after, 1, format!("{newline}${{0}}"))
            .into_owned()
    } else {
        format!("{newline}{newline}{after}")
    };

    statement.set_after(rewritten);
}

/// Collapse every empty line in the statement's trailing whitespace.
///
/// Each run of two or more line breaks (with any whitespace between them)
/// becomes a single newline.
pub fn remove_empty_lines_before_close(statement: &mut Statement, newline: &str) {
    let empty_lines = Regex::new(r"(\r?\n\s*\r?\n)+").unwrap();
    let rewritten = empty_lines
        .replace_all(statement.after(), newline)
        .into_owned();

    statement.set_after(rewritten);
}
