//! Front end of a chapter-gated Scheme toolchain.
//!
//! Source text goes through three stages:
//!
//! 1. [`scan_tokens`]: text into tokens.
//! 2. [`group`]: tokens into bracketed data.
//! 3. [`parse`]: data into [`Expression`] trees, with chapter gating and
//!    `syntax-rules` validation.
//!
//! Every stage stops at the first problem and returns a [`SyntaxError`].
//!
//! ```
//! use scheme_front::{parse, ParseOptions, SourceText};
//!
//! let source = SourceText::anonymous("(define (square x) (* x x))");
//! let program = parse(&source, ParseOptions::with_chapter(1)).unwrap();
//! assert_eq!(program[0].type_name(), "FunctionDefinition");
//! ```

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod syntax;

pub use crate::ast::{Atomic, Expression, Extended};
pub use crate::diagnostics::{ErrorCategory, ErrorKind, ErrorReporting, SyntaxError};
pub use crate::syntax::{
    Chapter, Datum, Group, Location, ParseOptions, Position, SourceText, Token, TokenType,
};

use crate::syntax::{Grouper, Parser, DEFAULT_MAX_DEPTH};

/// Parses a whole source into top-level expressions.
pub fn parse(source: &SourceText, options: ParseOptions) -> Result<Vec<Expression>, SyntaxError> {
    Parser::new(source, options).parse()
}

/// Scans a source into tokens, ending with an end-of-input token.
pub fn scan_tokens(source: &SourceText) -> Result<Vec<Token>, SyntaxError> {
    syntax::scan_tokens(source)
}

/// Groups a source into its top-level data.
pub fn group(source: &SourceText) -> Result<Vec<Datum>, SyntaxError> {
    group_with_depth(source, DEFAULT_MAX_DEPTH)
}

/// Groups a source, failing once nesting exceeds `max_depth`.
pub fn group_with_depth(source: &SourceText, max_depth: usize) -> Result<Vec<Datum>, SyntaxError> {
    let tokens = scan_tokens(source)?;
    Grouper::new(tokens, source, max_depth).group_all()
}
