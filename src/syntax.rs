//! Syntax module for the Scheme front end
//!
//! This module owns the source-location types shared by every stage and the
//! three stages of the pipeline:
//!
//! - [`lexer`]: raw text into a flat [`Token`] sequence.
//! - [`grouper`]: tokens into a forest of [`Datum`] (tokens and validated [`Group`]s).
//! - [`parser`]: data into [`Expression`](crate::ast::Expression) nodes, with the
//!   special forms in [`forms`] and `syntax-rules` checking in [`validator`].

use std::fmt;
use std::sync::Arc;

use miette::NamedSource;
use serde::{Deserialize, Serialize};

use crate::diagnostics::SourceArc;

pub mod datum;
pub mod forms;
pub mod grouper;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod token;
pub mod validator;

pub use datum::{Datum, Group};
pub use grouper::Grouper;
pub use lexer::{scan_tokens, Lexer};
pub use parser::{Parser, QuoteMode};
pub use token::{Literal, Token, TokenType};

// ============================================================================
// POSITIONS
// ============================================================================

/// A point in the source text.
///
/// Lines and columns are 1-based, columns count characters. The byte offset is
/// carried along so diagnostics can point into the raw text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// The position of the first character of any source.
    pub fn start() -> Self {
        Self::new(1, 1, 0)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span of source text; `end` is the position just past the last character.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

impl Location {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width location.
    pub fn point(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Returns the smallest location covering both `self` and `other`.
    pub fn merge(&self, other: &Location) -> Location {
        let start = if other.start.offset < self.start.offset {
            other.start
        } else {
            self.start
        };
        let end = if other.end.offset > self.end.offset {
            other.end
        } else {
            self.end
        };
        Location { start, end }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// CHAPTERS
// ============================================================================

/// The language level a source is parsed at.
///
/// Every keyword form names the chapter it first becomes available in; a form
/// used below its chapter is rejected with a disallowed-token error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Chapter(pub u32);

impl Chapter {
    /// `define`, `lambda`, `if`, `let`, `cond`, `import`, `export`.
    pub const BASIC: Chapter = Chapter(1);
    /// The quote family, short and long forms.
    pub const QUOTING: Chapter = Chapter(2);
    /// `#(...)` vector literals.
    pub const VECTOR: Chapter = Chapter(3);
    /// `set!` and `begin`.
    pub const MUTABLE: Chapter = Chapter(3);
    /// `delay`.
    pub const LAZY: Chapter = Chapter(3);
    /// `define-syntax`; also switches on the quoted second parse.
    pub const MACRO: Chapter = Chapter(5);
    /// No restriction.
    pub const UNBOUNDED: Chapter = Chapter(u32::MAX);

    /// Returns true if a construct introduced in `required` may be used at this chapter.
    pub fn allows(self, required: Chapter) -> bool {
        self >= required
    }

    pub fn macros_enabled(self) -> bool {
        self.allows(Self::MACRO)
    }
}

impl Default for Chapter {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl From<u32> for Chapter {
    fn from(value: u32) -> Self {
        Chapter(value)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::UNBOUNDED {
            write!(f, "unbounded")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ============================================================================
// OPTIONS
// ============================================================================

/// Default limit on nesting of parentheses and affectors.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Caller-supplied configuration of a parse.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub chapter: Chapter,
    pub max_depth: usize,
}

impl ParseOptions {
    pub fn with_chapter(chapter: impl Into<Chapter>) -> Self {
        Self {
            chapter: chapter.into(),
            ..Self::default()
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chapter: Chapter::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// SOURCE TEXT
// ============================================================================

/// A named piece of source text, shared by every stage for error reporting.
#[derive(Debug, Clone)]
pub struct SourceText {
    source: SourceArc,
}

impl SourceText {
    pub fn new(name: impl AsRef<str>, content: impl Into<String>) -> Self {
        Self {
            source: Arc::new(NamedSource::new(name, content.into())),
        }
    }

    /// Source text without a file behind it.
    pub fn anonymous(content: impl Into<String>) -> Self {
        Self::new("<input>", content)
    }

    pub fn name(&self) -> &str {
        self.source.name()
    }

    pub fn content(&self) -> &str {
        self.source.inner()
    }

    /// Returns the text of a 1-based line, without its terminator.
    pub fn line(&self, line: usize) -> Option<&str> {
        line.checked_sub(1)
            .and_then(|index| self.content().lines().nth(index))
    }

    /// Shared handle for attaching to diagnostics.
    pub fn to_named_source(&self) -> SourceArc {
        Arc::clone(&self.source)
    }
}
