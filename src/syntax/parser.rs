//! Scheme Parser - recursive descent over grouped data
//!
//! Converts the [`Datum`] forest produced by the grouper into [`Expression`]
//! nodes. Parenthesized groups dispatch on their first token; the special
//! forms themselves live in [`super::forms`].
//!
//! The parser carries a [`QuoteMode`]. Under `None` identifiers are variable
//! references and keywords start special forms. Under `Quote`/`Quasiquote`
//! everything becomes data: identifiers and keywords turn into symbols and
//! groups into lists. The mode is saved and restored around every nested
//! descent, so sibling subtrees never see each other's mode.
//!
//! The active [`Chapter`] gates each keyword form. At the macro chapter the
//! program is parsed twice: once normally, which validates every form, and
//! once entirely as quoted data for a later expansion stage, with top-level
//! imports from the first pass hoisted to the front.

use serde::Serialize;

use crate::ast::{
    Atomic, BooleanLiteral, Expression, Extended, Identifier, NumericLiteral, StringLiteral,
    Symbol,
};
use crate::diagnostics::{ErrorReporting, SyntaxError};

use super::datum::{Datum, Group};
use super::grouper::Grouper;
use super::lexer::scan_tokens;
use super::token::{Literal, Token, TokenType};
use super::{Chapter, Location, ParseOptions, SourceText};

/// How identifiers and groups are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuoteMode {
    None,
    Quote,
    Quasiquote,
}

impl QuoteMode {
    pub fn is_quoting(self) -> bool {
        self != QuoteMode::None
    }
}

/// A single-use parser over one source.
pub struct Parser<'a> {
    pub(super) source: &'a SourceText,
    pub(super) options: ParseOptions,
    pub(super) quote_mode: QuoteMode,
    depth: usize,
}

// ============================================================================
// PUBLIC API
// ============================================================================

impl<'a> Parser<'a> {
    pub fn new(source: &'a SourceText, options: ParseOptions) -> Self {
        Self {
            source,
            options,
            quote_mode: QuoteMode::None,
            depth: 0,
        }
    }

    /// Scans, groups and parses the whole source.
    pub fn parse(mut self) -> Result<Vec<Expression>, SyntaxError> {
        let tokens = scan_tokens(self.source)?;
        let data = Grouper::new(tokens, self.source, self.options.max_depth).group_all()?;
        self.parse_program(&data)
    }

    /// Parses already grouped top-level data.
    pub fn parse_program(&mut self, data: &[Datum]) -> Result<Vec<Expression>, SyntaxError> {
        let program = self.parse_all(data)?;
        if !self.chapter().macros_enabled() {
            return Ok(program);
        }

        let mut hoisted: Vec<Expression> = program
            .into_iter()
            .filter(Expression::is_import)
            .collect();
        let quoted = self.with_quote_mode(QuoteMode::Quote, |parser| parser.parse_all(data))?;
        hoisted.extend(quoted.into_iter().filter(|expr| !is_quoted_import(expr)));
        Ok(hoisted)
    }

    /// Parses one datum under the current quote mode.
    pub fn parse_expression(&mut self, datum: &Datum) -> Result<Expression, SyntaxError> {
        match datum {
            Datum::Token(token) => self.parse_token(token),
            Datum::Group(group) => match group.single_token() {
                Some(token) => self.parse_token(token),
                None => self.nested(group.location(), |parser| parser.parse_group(group)),
            },
        }
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

impl Parser<'_> {
    fn parse_all(&mut self, data: &[Datum]) -> Result<Vec<Expression>, SyntaxError> {
        data.iter()
            .map(|datum| self.parse_expression(datum))
            .collect()
    }

    fn parse_token(&mut self, token: &Token) -> Result<Expression, SyntaxError> {
        let location = token.location();
        let atomic = match (&token.kind, &token.literal) {
            (TokenType::Number, _) => Atomic::NumericLiteral(NumericLiteral {
                value: token.lexeme.clone(),
                location,
            }),
            (TokenType::Boolean, Some(Literal::Boolean(value))) => {
                Atomic::BooleanLiteral(BooleanLiteral {
                    value: *value,
                    location,
                })
            }
            (TokenType::String, Some(Literal::String(value))) => {
                Atomic::StringLiteral(StringLiteral {
                    value: value.clone(),
                    location,
                })
            }
            (TokenType::Identifier, _) => {
                if self.quote_mode.is_quoting() {
                    Atomic::Symbol(Symbol::new(token.text(), location))
                } else {
                    Atomic::Identifier(Identifier::new(token.text(), location))
                }
            }
            (kind, _) if kind.is_keyword() || kind.is_long_affector() => {
                if self.quote_mode.is_quoting() || self.chapter().macros_enabled() {
                    Atomic::Symbol(Symbol::new(token.lexeme.clone(), location))
                } else {
                    return Err(self.source.unexpected_form(token, location));
                }
            }
            _ => return Err(self.source.unexpected_form(token, location)),
        };
        Ok(atomic.into())
    }

    fn parse_group(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        if let Some((affector, target)) = group.affector() {
            return self.parse_affector(affector, target, group.location());
        }
        match self.quote_mode {
            QuoteMode::None => self.parse_normal_group(group),
            QuoteMode::Quote | QuoteMode::Quasiquote => self.parse_quoted_group(group),
        }
    }

    fn parse_normal_group(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        if group.is_empty() {
            if self.chapter().macros_enabled() {
                return Ok(Atomic::Nil {
                    location: group.location(),
                }
                .into());
            }
            return Err(self
                .source
                .expected_form("(<operator> <operand>*)", group, group.location()));
        }

        let Some(head) = group.head_token() else {
            return self.parse_application(group);
        };
        match head.kind {
            TokenType::Lambda => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_lambda(group)
            }
            TokenType::Define => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_define(group)
            }
            TokenType::If => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_conditional(group)
            }
            TokenType::Let => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_let(group)
            }
            TokenType::Cond => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_cond(group)
            }
            TokenType::Import => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_import(group)
            }
            TokenType::Export => {
                self.require_chapter(head, Chapter::BASIC)?;
                self.parse_export(group)
            }
            TokenType::Quote
            | TokenType::Quasiquote
            | TokenType::Unquote
            | TokenType::UnquoteSplicing => self.parse_long_affector(head, group),
            TokenType::Begin => {
                self.require_chapter(head, Chapter::MUTABLE)?;
                self.parse_begin(group)
            }
            TokenType::Set => {
                self.require_chapter(head, Chapter::MUTABLE)?;
                self.parse_set(group)
            }
            TokenType::Delay => {
                self.require_chapter(head, Chapter::LAZY)?;
                self.parse_delay(group)
            }
            TokenType::DefineSyntax => {
                self.require_chapter(head, Chapter::MACRO)?;
                self.parse_define_syntax(group)
            }
            TokenType::SyntaxRules => Err(self.source.unexpected_form(group, group.location())),
            _ => self.parse_application(group),
        }
    }

    fn parse_application(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        let Some((operator, operands)) = items.split_first() else {
            return Err(self
                .source
                .expected_form("(<operator> <operand>*)", group, group.location()));
        };
        let operator = self.parse_expression(operator)?;
        let operands = self.parse_all(operands)?;
        Ok(Atomic::Application {
            operator: Box::new(operator),
            operands,
            location: group.location(),
        }
        .into())
    }

    /// Turns a parenthesized group into list data.
    fn parse_quoted_group(&mut self, group: &Group) -> Result<Expression, SyntaxError> {
        let items = group.contents();
        if items.is_empty() {
            return Ok(Atomic::Nil {
                location: group.location(),
            }
            .into());
        }
        let (elements, terminator) = self.destructure_list(items, |_| Ok(()))?;
        Ok(Extended::List {
            elements,
            terminator: terminator.map(Box::new),
            location: group.location(),
        }
        .into())
    }
}

// ============================================================================
// AFFECTORS
// ============================================================================

impl Parser<'_> {
    /// `(quote x)` and friends: the long spelling of an affector.
    fn parse_long_affector(&mut self, head: &Token, group: &Group) -> Result<Expression, SyntaxError> {
        let expected = match head.kind.affector_name() {
            Some(name) => format!("({name} <datum>)"),
            None => "(quote <datum>)".to_string(),
        };
        match group.contents() {
            [_, target] => self.parse_affector(head, target, group.location()),
            _ => Err(self
                .source
                .expected_form(&expected, group, group.location())),
        }
    }

    fn parse_affector(
        &mut self,
        affector: &Token,
        target: &Datum,
        location: Location,
    ) -> Result<Expression, SyntaxError> {
        match affector.kind {
            TokenType::Apostrophe | TokenType::Quote => {
                self.require_chapter(affector, Chapter::QUOTING)?;
                self.parse_quoting(affector, target, QuoteMode::Quote, location)
            }
            TokenType::Backtick | TokenType::Quasiquote => {
                self.require_chapter(affector, Chapter::QUOTING)?;
                self.parse_quoting(affector, target, QuoteMode::Quasiquote, location)
            }
            TokenType::Comma | TokenType::Unquote => {
                self.require_chapter(affector, Chapter::QUOTING)?;
                self.parse_unquote(affector, target, false, location)
            }
            TokenType::CommaAt | TokenType::UnquoteSplicing => {
                self.require_chapter(affector, Chapter::QUOTING)?;
                self.parse_unquote(affector, target, true, location)
            }
            TokenType::HashVector => {
                self.require_chapter(affector, Chapter::VECTOR)?;
                self.parse_vector(target, location)
            }
            _ => Err(self.source.unexpected_form(affector, affector.location())),
        }
    }

    /// Enters quoting, or keeps a nested quote as `(quote x)` data.
    fn parse_quoting(
        &mut self,
        affector: &Token,
        target: &Datum,
        mode: QuoteMode,
        location: Location,
    ) -> Result<Expression, SyntaxError> {
        if self.quote_mode.is_quoting() {
            return self.affector_as_data(affector, target, location);
        }
        self.with_quote_mode(mode, |parser| parser.parse_expression(target))
    }

    fn parse_unquote(
        &mut self,
        affector: &Token,
        target: &Datum,
        splicing: bool,
        location: Location,
    ) -> Result<Expression, SyntaxError> {
        match self.quote_mode {
            QuoteMode::None => Err(self.source.unsupported_token(
                &affector.lexeme,
                "unquote is only valid inside a quasiquote",
                affector.location(),
            )),
            QuoteMode::Quote => self.affector_as_data(affector, target, location),
            QuoteMode::Quasiquote => {
                let value =
                    self.with_quote_mode(QuoteMode::None, |parser| parser.parse_expression(target))?;
                if !splicing {
                    return Ok(value);
                }
                let location = affector.location().merge(&value.location());
                Ok(Atomic::SpliceMarker {
                    value: Box::new(value),
                    location,
                }
                .into())
            }
        }
    }

    /// `(name target)` as list data, e.g. `''a` inside a quote.
    fn affector_as_data(
        &mut self,
        affector: &Token,
        target: &Datum,
        location: Location,
    ) -> Result<Expression, SyntaxError> {
        let name = affector.kind.affector_name().unwrap_or("quote");
        let symbol = Symbol::new(name, affector.location());
        let value = self.parse_expression(target)?;
        Ok(Extended::List {
            elements: vec![symbol.into(), value],
            terminator: None,
            location,
        }
        .into())
    }

    /// `#(...)`: elements are always data.
    fn parse_vector(&mut self, target: &Datum, location: Location) -> Result<Expression, SyntaxError> {
        let Some(list) = target.as_list() else {
            return Err(self
                .source
                .expected_form("#(<datum>*)", target, target.location()));
        };
        let elements = self.with_quote_mode(QuoteMode::Quote, |parser| {
            parser.parse_all(list.contents())
        })?;
        Ok(Atomic::Vector { elements, location }.into())
    }
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

impl Parser<'_> {
    pub(super) fn chapter(&self) -> Chapter {
        self.options.chapter
    }

    pub(super) fn require_chapter(&self, token: &Token, required: Chapter) -> Result<(), SyntaxError> {
        if self.chapter().allows(required) {
            return Ok(());
        }
        Err(self.source.disallowed_token(
            &token.lexeme,
            self.chapter(),
            required,
            token.location(),
        ))
    }

    /// Runs `f` under `mode`, restoring the previous mode afterwards.
    pub(super) fn with_quote_mode<T>(
        &mut self,
        mode: QuoteMode,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        let saved = self.quote_mode;
        self.quote_mode = mode;
        let result = f(self);
        self.quote_mode = saved;
        result
    }

    fn nested<T>(
        &mut self,
        location: Location,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= self.options.max_depth {
            return Err(self
                .source
                .too_deeply_nested(self.options.max_depth, location));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Splits list items into proper elements and an optional dotted tail.
    ///
    /// The list is dotted when its second-to-last item is a `.` token. The
    /// verifier sees every element and the tail before it is parsed.
    pub(super) fn destructure_list(
        &mut self,
        items: &[Datum],
        verify: impl Fn(&Datum) -> Result<(), SyntaxError>,
    ) -> Result<(Vec<Expression>, Option<Expression>), SyntaxError> {
        let dotted = items.len() >= 2 && items[items.len() - 2].is_token(TokenType::Dot);
        let (proper, tail) = match items {
            [prefix @ .., _, tail] if dotted => (prefix, Some(tail)),
            _ => (items, None),
        };
        if dotted && proper.is_empty() {
            let location = items
                .first()
                .map(Datum::location)
                .unwrap_or_default();
            return Err(self.source.expected_form(
                "(<datum>+ . <datum>)",
                &DisplayItems(items),
                location,
            ));
        }

        let mut elements = Vec::with_capacity(proper.len());
        for item in proper {
            verify(item)?;
            elements.push(self.parse_expression(item)?);
        }
        let terminator = match tail {
            Some(tail) => {
                verify(tail)?;
                Some(self.parse_expression(tail)?)
            }
            None => None,
        };
        Ok((elements, terminator))
    }
}

/// Top-level `(import ...)` forms captured by the quoted second pass.
fn is_quoted_import(expr: &Expression) -> bool {
    match expr {
        Expression::Extended(Extended::List { elements, .. }) => elements
            .first()
            .and_then(Expression::as_symbol)
            .is_some_and(|symbol| symbol.value == "import"),
        _ => false,
    }
}

/// Renders a run of data the way it appears between parentheses.
struct DisplayItems<'a>(&'a [Datum]);

impl std::fmt::Display for DisplayItems<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (index, item) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{item}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;

    fn parse(text: &str, chapter: u32) -> Result<Vec<Expression>, SyntaxError> {
        let source = SourceText::anonymous(text);
        Parser::new(&source, ParseOptions::with_chapter(chapter)).parse()
    }

    #[test]
    fn identifiers_become_symbols_under_quote() {
        let program = parse("x 'x", 4).unwrap();
        assert_eq!(program[0].type_name(), "Identifier");
        assert_eq!(program[1].type_name(), "Symbol");
    }

    #[test]
    fn quote_mode_is_restored_after_siblings() {
        let program = parse("(f 'a b)", 4).unwrap();
        let Expression::Atomic(Atomic::Application { operands, .. }) = &program[0] else {
            panic!("expected application, got {:?}", program[0]);
        };
        assert_eq!(operands[0].type_name(), "Symbol");
        assert_eq!(operands[1].type_name(), "Identifier");
    }

    #[test]
    fn keyword_outside_form_is_unexpected() {
        let err = parse("(f if)", 4).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedForm { .. }));
    }

    #[test]
    fn empty_application_needs_macro_chapter() {
        assert!(parse("()", 4).is_err());
        let program = parse("()", 5).unwrap();
        assert_eq!(program[0].type_name(), "Nil");
    }

    #[test]
    fn parser_depth_limit_is_enforced() {
        let source = SourceText::anonymous("(f (g (h x)))");
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::with_chapter(4)
        };
        let tokens = scan_tokens(&source).unwrap();
        let data = Grouper::new(tokens, &source, 16).group_all().unwrap();
        let err = Parser::new(&source, options)
            .parse_program(&data)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::TooDeeplyNested { limit: 2 });
    }

    #[test]
    fn lone_dot_before_tail_is_rejected() {
        let err = parse("'(. a)", 4).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ExpectedForm { .. }));
    }
}
