//! Built-in rules

pub mod empty_line_before;
