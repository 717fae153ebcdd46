//! Minimal CSS statement tree
//!
//! This crate is not a CSS parser; the tree is an already-materialized model
//! of the statements a rule inspects. Statements own their children, carry
//! the raw whitespace slices a formatting rule cares about, and serialize
//! back to CSS text so checks can compute source-relative indices.

use std::fmt;

/// Kind of a brace-owning statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// Style rule, e.g. `.a { ... }`
    Rule,
    /// At-rule, e.g. `@media screen { ... }`
    AtRule,
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatementKind::Rule => write!(f, "rule"),
            StatementKind::AtRule => write!(f, "atrule"),
        }
    }
}

/// Discriminant for child nodes inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Declaration,
    Comment,
    Rule,
    AtRule,
}

/// A property declaration inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Raw text before the declaration (indentation, line breaks)
    pub before: String,
    pub prop: String,
    pub value: String,
}

/// A comment inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Raw text before the comment
    pub before: String,
    pub text: String,
}

/// Any node that can appear inside a block
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Declaration(Declaration),
    Comment(Comment),
    Statement(Statement),
}

impl Node {
    /// The node's type discriminant
    pub fn node_type(&self) -> NodeType {
        match self {
            Node::Declaration(_) => NodeType::Declaration,
            Node::Comment(_) => NodeType::Comment,
            Node::Statement(s) => match s.kind() {
                StatementKind::Rule => NodeType::Rule,
                StatementKind::AtRule => NodeType::AtRule,
            },
        }
    }

    fn write_css(&self, out: &mut String) {
        match self {
            Node::Declaration(decl) => {
                out.push_str(&decl.before);
                out.push_str(&decl.prop);
                out.push_str(": ");
                out.push_str(&decl.value);
                out.push(';');
            }
            Node::Comment(comment) => {
                out.push_str(&comment.before);
                out.push_str("/*");
                out.push_str(&comment.text);
                out.push_str("*/");
            }
            Node::Statement(statement) => {
                out.push_str(&statement.before);
                statement.write_css(out);
            }
        }
    }
}

/// The brace-delimited body of a statement
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    nodes: Vec<Node>,
    /// Raw text between the last child and the closing brace, including any
    /// stray statement separators
    after: String,
}

impl Block {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn after(&self) -> &str {
        &self.after
    }
}

/// A style rule or at-rule statement
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    kind: StatementKind,
    /// Selector for rules, `@name params` for at-rules
    prelude: String,
    /// Raw text before the statement when nested (indentation, line breaks)
    before: String,
    /// Raw text between the prelude and the opening brace
    between: String,
    /// `None` for blockless at-rules such as `@import`
    block: Option<Block>,
}

impl Statement {
    /// Create a style rule with an empty block
    pub fn rule(selector: &str) -> Self {
        Self {
            kind: StatementKind::Rule,
            prelude: selector.to_string(),
            before: String::new(),
            between: " ".to_string(),
            block: Some(Block::default()),
        }
    }

    /// Create an at-rule with an empty block
    pub fn at_rule(prelude: &str) -> Self {
        Self {
            kind: StatementKind::AtRule,
            prelude: prelude.to_string(),
            before: String::new(),
            between: " ".to_string(),
            block: Some(Block::default()),
        }
    }

    /// Create a blockless at-rule such as `@import url(x.css)`
    pub fn at_rule_without_block(prelude: &str) -> Self {
        Self {
            kind: StatementKind::AtRule,
            prelude: prelude.to_string(),
            before: String::new(),
            between: String::new(),
            block: None,
        }
    }

    /// Append a declaration child, with its leading raw text
    pub fn with_declaration(mut self, before: &str, prop: &str, value: &str) -> Self {
        self.block
            .get_or_insert_with(Block::default)
            .nodes
            .push(Node::Declaration(Declaration {
                before: before.to_string(),
                prop: prop.to_string(),
                value: value.to_string(),
            }));
        self
    }

    /// Append a comment child, with its leading raw text
    pub fn with_comment(mut self, before: &str, text: &str) -> Self {
        self.block
            .get_or_insert_with(Block::default)
            .nodes
            .push(Node::Comment(Comment {
                before: before.to_string(),
                text: text.to_string(),
            }));
        self
    }

    /// Append a nested statement child, with its leading raw text
    pub fn with_nested(mut self, before: &str, mut statement: Statement) -> Self {
        statement.before = before.to_string();
        self.block
            .get_or_insert_with(Block::default)
            .nodes
            .push(Node::Statement(statement));
        self
    }

    /// Set the raw text between the last child and the closing brace
    pub fn with_after(mut self, after: &str) -> Self {
        if let Some(block) = &mut self.block {
            block.after = after.to_string();
        }
        self
    }

    /// Set the raw text between the prelude and the opening brace
    pub fn with_between(mut self, between: &str) -> Self {
        self.between = between.to_string();
        self
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn prelude(&self) -> &str {
        &self.prelude
    }

    pub fn block(&self) -> Option<&Block> {
        self.block.as_ref()
    }

    pub fn has_block(&self) -> bool {
        self.block.is_some()
    }

    /// Raw trailing whitespace of the block, empty for blockless statements
    pub fn after(&self) -> &str {
        self.block.as_ref().map(|b| b.after.as_str()).unwrap_or("")
    }

    /// Replace the block's trailing whitespace. No-op on blockless statements.
    pub fn set_after(&mut self, after: String) {
        if let Some(block) = &mut self.block {
            block.after = after;
        }
    }

    fn write_css(&self, out: &mut String) {
        out.push_str(&self.prelude);
        match &self.block {
            Some(block) => {
                out.push_str(&self.between);
                out.push('{');
                for node in &block.nodes {
                    node.write_css(out);
                }
                out.push_str(&block.after);
                out.push('}');
            }
            None => out.push(';'),
        }
    }

    /// Serialize the statement back to CSS text
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        self.write_css(&mut out);
        out
    }

    /// Serialize only the braces-inclusive body, `{...}`
    pub fn block_to_css(&self) -> String {
        let css = self.to_css();
        match css.find('{') {
            Some(pos) => css[pos..].to_string(),
            None => css,
        }
    }
}

/// A materialized stylesheet: the root list of statements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    statements: Vec<Statement>,
}

impl Document {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Visit every statement depth-first in document order.
    ///
    /// A parent statement is visited before the statements nested in its
    /// block. The callback may mutate the statement it is handed.
    pub fn walk_statements_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Statement),
    {
        for statement in &mut self.statements {
            walk_statement_mut(statement, f);
        }
    }

    /// Serialize the whole document back to CSS text
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            out.push_str(&statement.before);
            statement.write_css(&mut out);
        }
        out
    }
}

fn walk_statement_mut<F>(statement: &mut Statement, f: &mut F)
where
    F: FnMut(&mut Statement),
{
    f(statement);
    if let Some(block) = &mut statement.block {
        for node in &mut block.nodes {
            if let Node::Statement(nested) = node {
                walk_statement_mut(nested, f);
            }
        }
    }
}
