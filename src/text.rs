//! Text manipulation utilities.
//!
//! This module provides the raw-line primitives the rewriter works with:
//! - Splitting and joining source text without losing trailing empty lines
//! - Locating inline literal boundaries by their quote markers

pub mod lines;
pub mod literal;

pub use lines::{join_lines, leading_indentation, split_lines};
pub use literal::{
    EMPTY_LITERAL_CALL_SUFFIX, LiteralScanner, MULTILINE_DELIMITER, extract_literal,
};
