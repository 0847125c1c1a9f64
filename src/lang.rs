//! The bot language front end.
//!
//! Program text is tokenized and then parsed into every syntax tree it
//! derives. The grammar is deliberately ambiguous (`-` is both subtraction
//! and direction difference, `|` both absolute value and `or`, operators
//! have no precedence); choosing among the trees is the disambiguator's job.

mod ast;
mod parser;
mod token;

pub use ast::{Assignment, BoolExpr, Command, Direction, Expr, NumExpr, PredicateExpr, Program};
pub use parser::{MAX_NESTING, Parsed, parse_tokens};
pub use token::{Keyword, Token, TokenKind, tokenize};

use crate::error::ParseError;

/// Default number of candidate trees kept for one program.
pub const DEFAULT_MAX_CANDIDATES: usize = 4096;

/// Parse program text with the default candidate limit.
///
/// # Errors
///
/// Returns a [`ParseError`] if the text does not tokenize, derives no tree,
/// or nests deeper than [`MAX_NESTING`].
pub fn parse(source: &str) -> Result<Parsed, ParseError> {
    parse_with_limit(source, DEFAULT_MAX_CANDIDATES)
}

/// Parse program text, keeping the first `limit` candidate trees in
/// emission order.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with_limit(source: &str, limit: usize) -> Result<Parsed, ParseError> {
    let tokens = tokenize(source)?;
    parse_tokens(&tokens, limit)
}
