//! Shared helpers for the integration tests.

#![allow(dead_code)]

use scheme_front::ast::{NumericLiteral, StringLiteral};
use scheme_front::{
    Atomic, Datum, Expression, Extended, Location, ParseOptions, SourceText, SyntaxError, Token,
    TokenType,
};

/// Chapter below the macro chapter, so parses are single-pass.
pub const FULL: u32 = 4;

pub fn source(text: &str) -> SourceText {
    SourceText::new("test.scm", text)
}

pub fn tokens(text: &str) -> Vec<Token> {
    scheme_front::scan_tokens(&source(text)).expect("source should lex")
}

/// Token kinds without the trailing end-of-input token.
pub fn kinds(text: &str) -> Vec<TokenType> {
    tokens(text)
        .into_iter()
        .map(|token| token.kind)
        .filter(|kind| *kind != TokenType::Eof)
        .collect()
}

pub fn lex_error(text: &str) -> SyntaxError {
    scheme_front::scan_tokens(&source(text)).expect_err("source should not lex")
}

pub fn group(text: &str) -> Result<Vec<Datum>, SyntaxError> {
    scheme_front::group(&source(text))
}

pub fn parse_at(text: &str, chapter: u32) -> Result<Vec<Expression>, SyntaxError> {
    scheme_front::parse(&source(text), ParseOptions::with_chapter(chapter))
}

pub fn parse_ok(text: &str) -> Vec<Expression> {
    parse_at(text, FULL).unwrap_or_else(|err| panic!("{text} should parse: {err}"))
}

/// Parses a source holding exactly one expression.
pub fn parse_one(text: &str) -> Expression {
    let mut program = parse_ok(text);
    assert_eq!(program.len(), 1, "expected one expression in {text}");
    program.remove(0)
}

pub fn parse_err(text: &str, chapter: u32) -> SyntaxError {
    match parse_at(text, chapter) {
        Ok(program) => panic!("{text} should not parse, got {program:?}"),
        Err(err) => err,
    }
}

// ----------------------------------------------------------------------------
// Expected trees; locations are ignored by `equals`.
// ----------------------------------------------------------------------------

pub fn num(value: &str) -> Expression {
    Atomic::NumericLiteral(NumericLiteral {
        value: value.into(),
        location: Location::default(),
    })
    .into()
}

pub fn string(value: &str) -> Expression {
    Atomic::StringLiteral(StringLiteral {
        value: value.into(),
        location: Location::default(),
    })
    .into()
}

pub fn ident(name: &str) -> Expression {
    scheme_front::ast::Identifier::new(name, Location::default()).into()
}

pub fn sym(name: &str) -> Expression {
    scheme_front::ast::Symbol::new(name, Location::default()).into()
}

pub fn list(elements: Vec<Expression>) -> Expression {
    Extended::List {
        elements,
        terminator: None,
        location: Location::default(),
    }
    .into()
}

pub fn dotted(elements: Vec<Expression>, terminator: Expression) -> Expression {
    Extended::List {
        elements,
        terminator: Some(Box::new(terminator)),
        location: Location::default(),
    }
    .into()
}

pub fn apply(operator: Expression, operands: Vec<Expression>) -> Expression {
    Atomic::Application {
        operator: Box::new(operator),
        operands,
        location: Location::default(),
    }
    .into()
}

pub fn assert_equals(actual: &Expression, expected: &Expression) {
    assert!(
        actual.equals(expected),
        "expected {expected} ({expected:?}), got {actual} ({actual:?})"
    );
}
