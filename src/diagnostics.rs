//! Diagnostics for the Scheme front end.
//!
//! Every stage fails fast with a single [`SyntaxError`]. An error is made of
//! three parts:
//!
//! - **What** went wrong: an [`ErrorKind`], grouped into an [`ErrorCategory`]
//!   so callers can branch on lexical, structural, grammar and macro errors
//!   without looking at message text.
//! - **Where** it happened: a [`SourceInfo`] with the offending [`Location`],
//!   the whole named source and a one-line excerpt with a caret.
//! - **How** to fix it: an optional help line, filled in per kind.
//!
//! Errors are built through [`ErrorReporting`], implemented by [`SourceText`],
//! never by hand. `SyntaxError` implements [`miette::Diagnostic`], so a
//! `miette::Report` renders it with labelled source.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use thiserror::Error;
use unicode_width::UnicodeWidthChar;

use crate::syntax::{Chapter, Location, Position, SourceText};

pub type SourceArc = Arc<NamedSource<String>>;

/// Longest rendering of an offending form kept in a message.
const MAX_FOUND_WIDTH: usize = 48;

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Coarse classification of every [`ErrorKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Characters that do not form a token.
    Lexical,
    /// Tokens that do not form well-bracketed data.
    Structural,
    /// Data that does not form a valid expression.
    Grammar,
    /// `syntax-rules` patterns and templates.
    Macro,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Lexical => "lexical",
            ErrorCategory::Structural => "structural",
            ErrorCategory::Grammar => "grammar",
            ErrorCategory::Macro => "macro",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCategory::Lexical => "Lexical",
            ErrorCategory::Structural => "Structural",
            ErrorCategory::Grammar => "Grammar",
            ErrorCategory::Macro => "Macro",
        };
        f.write_str(label)
    }
}

/// Everything that can go wrong between source text and AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    // Lexical
    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated |identifier|")]
    UnterminatedIdentifier,

    // Structural
    #[error("unexpected token `{found}`")]
    UnexpectedToken { found: String },
    #[error("`{open}` is closed by `{close}`")]
    MismatchedParenthesis { open: String, close: String },
    #[error("`{open}` is never closed")]
    UnterminatedForm { open: String },
    #[error("expression nested deeper than {limit} levels")]
    TooDeeplyNested { limit: usize },

    // Grammar
    #[error("expected {expected}, found `{found}`")]
    ExpectedForm { expected: String, found: String },
    #[error("`{token}` requires chapter {required}, but chapter {chapter} is active")]
    DisallowedToken {
        token: String,
        chapter: Chapter,
        required: Chapter,
    },
    #[error("`{token}` is not supported here: {reason}")]
    UnsupportedToken { token: String, reason: String },
    #[error("unexpected form `{found}`")]
    UnexpectedForm { found: String },

    // Macro
    #[error("invalid syntax-rules pattern `{found}`: expected {expected}")]
    InvalidPattern { found: String, expected: String },
    #[error("invalid syntax-rules template `{found}`: expected {expected}")]
    InvalidTemplate { found: String, expected: String },
}

impl ErrorKind {
    pub fn category(&self) -> ErrorCategory {
        use ErrorKind::*;
        match self {
            UnexpectedCharacter(_)
            | UnterminatedString
            | UnterminatedComment
            | UnterminatedIdentifier => ErrorCategory::Lexical,
            UnexpectedToken { .. }
            | MismatchedParenthesis { .. }
            | UnterminatedForm { .. }
            | TooDeeplyNested { .. } => ErrorCategory::Structural,
            ExpectedForm { .. }
            | DisallowedToken { .. }
            | UnsupportedToken { .. }
            | UnexpectedForm { .. } => ErrorCategory::Grammar,
            InvalidPattern { .. } | InvalidTemplate { .. } => ErrorCategory::Macro,
        }
    }

    /// Stable snake_case name of the kind, used in diagnostic codes.
    pub fn code_suffix(&self) -> &'static str {
        use ErrorKind::*;
        match self {
            UnexpectedCharacter(_) => "unexpected_character",
            UnterminatedString => "unterminated_string",
            UnterminatedComment => "unterminated_comment",
            UnterminatedIdentifier => "unterminated_identifier",
            UnexpectedToken { .. } => "unexpected_token",
            MismatchedParenthesis { .. } => "mismatched_parenthesis",
            UnterminatedForm { .. } => "unterminated_form",
            TooDeeplyNested { .. } => "too_deeply_nested",
            ExpectedForm { .. } => "expected_form",
            DisallowedToken { .. } => "disallowed_token",
            UnsupportedToken { .. } => "unsupported_token",
            UnexpectedForm { .. } => "unexpected_form",
            InvalidPattern { .. } => "invalid_pattern",
            InvalidTemplate { .. } => "invalid_template",
        }
    }

    fn default_help(&self) -> Option<String> {
        use ErrorKind::*;
        match self {
            UnterminatedString => Some("add the closing `\"`".into()),
            UnterminatedComment => Some("block comments end with `|#`".into()),
            UnterminatedIdentifier => Some("add the closing `|`".into()),
            MismatchedParenthesis { open, .. } => Some(format!(
                "`{}` must be closed by `{}`",
                open,
                if open == "[" { "]" } else { ")" }
            )),
            UnterminatedForm { open } => Some(format!(
                "add the missing `{}`",
                if open == "[" { "]" } else { ")" }
            )),
            TooDeeplyNested { .. } => Some("split the expression or raise max_depth".into()),
            DisallowedToken { required, .. } => {
                Some(format!("this form is available from chapter {required}"))
            }
            InvalidPattern { .. } | InvalidTemplate { .. } => Some(
                "`...` must follow the element it repeats and may appear once per list in a pattern"
                    .into(),
            ),
            _ => None,
        }
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Where an error happened.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: SourceArc,
    pub location: Location,
    /// `line | text` followed by a caret line under the offending span.
    pub excerpt: String,
}

/// The single error type of the front end.
#[derive(Debug, Error)]
#[error("{} error at {}: {}", .kind.category(), .source_info.location.start, .kind)]
pub struct SyntaxError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn position(&self) -> Position {
        self.source_info.location.start
    }

    pub fn location(&self) -> Location {
        self.source_info.location
    }

    pub fn excerpt(&self) -> &str {
        &self.source_info.excerpt
    }

    /// Diagnostic code, e.g. `scheme::grammar::expected_form`.
    pub fn code_name(&self) -> String {
        format!(
            "scheme::{}::{}",
            self.category().as_str(),
            self.kind.code_suffix()
        )
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_name()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.source_info.source.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let location = self.source_info.location;
        let content_len = self.source_info.source.inner().len();
        let start = location.start.offset.min(content_len);
        // Zero-width spans inside the text still get one column so the label is visible.
        let len = match location.len() {
            0 if start < content_len => 1,
            n => n.min(content_len - start),
        };
        let label = LabeledSpan::new(Some(self.kind.to_string()), start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

/// Context-aware error creation.
pub trait ErrorReporting {
    /// Creates an error of `kind` at `location` with context-appropriate help.
    fn report(&self, kind: ErrorKind, location: Location) -> SyntaxError;

    fn unexpected_token(&self, found: &str, location: Location) -> SyntaxError {
        self.report(
            ErrorKind::UnexpectedToken {
                found: found.into(),
            },
            location,
        )
    }

    fn expected_form(
        &self,
        expected: &str,
        found: &dyn fmt::Display,
        location: Location,
    ) -> SyntaxError {
        self.report(
            ErrorKind::ExpectedForm {
                expected: expected.into(),
                found: abbreviate(&found.to_string()),
            },
            location,
        )
    }

    fn disallowed_token(
        &self,
        token: &str,
        chapter: Chapter,
        required: Chapter,
        location: Location,
    ) -> SyntaxError {
        self.report(
            ErrorKind::DisallowedToken {
                token: token.into(),
                chapter,
                required,
            },
            location,
        )
    }

    fn unsupported_token(&self, token: &str, reason: &str, location: Location) -> SyntaxError {
        self.report(
            ErrorKind::UnsupportedToken {
                token: token.into(),
                reason: reason.into(),
            },
            location,
        )
    }

    fn unexpected_form(&self, found: &dyn fmt::Display, location: Location) -> SyntaxError {
        self.report(
            ErrorKind::UnexpectedForm {
                found: abbreviate(&found.to_string()),
            },
            location,
        )
    }

    fn too_deeply_nested(&self, limit: usize, location: Location) -> SyntaxError {
        self.report(ErrorKind::TooDeeplyNested { limit }, location)
    }
}

impl ErrorReporting for SourceText {
    fn report(&self, kind: ErrorKind, location: Location) -> SyntaxError {
        let excerpt = render_excerpt(self, &location);
        let help = kind.default_help();
        SyntaxError {
            kind,
            source_info: SourceInfo {
                source: self.to_named_source(),
                location,
                excerpt,
            },
            help,
        }
    }
}

/// Shortens long renderings of offending forms for one-line messages.
pub fn abbreviate(text: &str) -> String {
    if text.chars().count() <= MAX_FOUND_WIDTH {
        return text.to_string();
    }
    let mut short: String = text.chars().take(MAX_FOUND_WIDTH - 3).collect();
    short.push_str("...");
    short
}

// ============================================================================
// EXCERPTS
// ============================================================================

/// Renders the first line of `location` with a caret under the span.
///
/// ```text
/// 3 | (define (f x) (g x]
///   |                   ^
/// ```
pub fn render_excerpt(source: &SourceText, location: &Location) -> String {
    let line_num = location.start.line;
    let line = source.line(line_num).unwrap_or("");
    let gutter = line_num.to_string().len();

    let mut pointer = String::new();
    let mut marked = 0;
    let start_col = location.start.column.max(1);
    let end_col = if location.end.line == line_num {
        location.end.column.max(start_col + 1)
    } else {
        line.chars().count() + 1
    };
    for (index, ch) in line.chars().enumerate() {
        let column = index + 1;
        if column >= end_col {
            break;
        }
        let width = ch.width().unwrap_or(0).max(1);
        if column < start_col {
            if ch == '\t' {
                pointer.push('\t');
            } else {
                pointer.push_str(&" ".repeat(width));
            }
            continue;
        }
        let mark = if marked == 0 { '^' } else { '-' };
        pointer.push(mark);
        pointer.extend(std::iter::repeat('-').take(width - 1));
        marked += 1;
    }
    if marked == 0 {
        // Past the end of the line, e.g. end of input.
        let padding = line
            .chars()
            .map(|ch| ch.width().unwrap_or(0).max(1))
            .sum::<usize>();
        pointer = " ".repeat(padding);
        pointer.push('^');
    }

    format!(
        "{:>width$} | {}\n{:>width$} | {}",
        line_num,
        line,
        "",
        pointer,
        width = gutter
    )
}

#[cfg(test)]
mod tests {
    use miette::Report;

    use super::*;

    fn location(line: usize, start: usize, end: usize, offset: usize) -> Location {
        Location::new(
            Position::new(line, start, offset),
            Position::new(line, end, offset + (end - start)),
        )
    }

    #[test]
    fn excerpt_places_caret_under_span() {
        let source = SourceText::anonymous("(if)\n(+ 1 2]");
        let excerpt = render_excerpt(&source, &location(2, 7, 8, 11));
        assert_eq!(excerpt, "2 | (+ 1 2]\n  |       ^");
    }

    #[test]
    fn excerpt_marks_multi_character_span() {
        let source = SourceText::anonymous("(delay 1)");
        let excerpt = render_excerpt(&source, &location(1, 2, 7, 1));
        assert_eq!(excerpt, "1 | (delay 1)\n  |  ^----");
    }

    #[test]
    fn excerpt_points_past_end_of_line() {
        let source = SourceText::anonymous("(a b");
        let excerpt = render_excerpt(&source, &location(1, 5, 5, 4));
        assert_eq!(excerpt, "1 | (a b\n  |     ^");
    }

    #[test]
    fn categories_follow_kinds() {
        assert_eq!(
            ErrorKind::UnterminatedString.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(
            ErrorKind::UnterminatedForm { open: "(".into() }.category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            ErrorKind::UnsupportedToken {
                token: ",".into(),
                reason: "outside quasiquote".into()
            }
            .category(),
            ErrorCategory::Grammar
        );
        assert_eq!(
            ErrorKind::InvalidTemplate {
                found: "(...)".into(),
                expected: "<template>".into()
            }
            .category(),
            ErrorCategory::Macro
        );
    }

    #[test]
    fn report_renders_code_label_and_help() {
        let source = SourceText::new("chapter.scm", "(delay 1)");
        let err = source.disallowed_token("delay", Chapter(1), Chapter::LAZY, location(1, 2, 7, 1));
        assert_eq!(err.code_name(), "scheme::grammar::disallowed_token");
        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("scheme::grammar::disallowed_token"));
        assert!(output.contains("available from chapter 3"));
    }

    #[test]
    fn abbreviate_keeps_short_text() {
        assert_eq!(abbreviate("(a b)"), "(a b)");
        let long = "x".repeat(100);
        assert_eq!(abbreviate(&long).chars().count(), MAX_FOUND_WIDTH);
    }
}
