//! Grouper: token stream into a forest of [`Datum`].
//!
//! Parentheses open a nested group that runs through the matching close.
//! Short affectors (`'`, `` ` ``, `,`, `,@`, `#`) bind to exactly the next
//! datum, and `#;` swallows the next datum. Shapes are checked eagerly by
//! [`Group::build`], so bracket errors surface here rather than in the parser.

use std::iter::Peekable;
use std::vec::IntoIter;

use crate::diagnostics::{ErrorKind, ErrorReporting, SyntaxError};

use super::datum::{Datum, Group};
use super::token::{Token, TokenType};
use super::SourceText;

pub struct Grouper<'a> {
    tokens: Peekable<IntoIter<Token>>,
    source: &'a SourceText,
    max_depth: usize,
    depth: usize,
}

impl<'a> Grouper<'a> {
    pub fn new(tokens: Vec<Token>, source: &'a SourceText, max_depth: usize) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            source,
            max_depth,
            depth: 0,
        }
    }

    /// Groups every remaining top-level datum.
    pub fn group_all(mut self) -> Result<Vec<Datum>, SyntaxError> {
        let mut data = Vec::new();
        while let Some(datum) = self.next_datum()? {
            data.push(datum);
        }
        Ok(data)
    }

    /// Returns the next top-level datum, or `None` at end of input.
    pub fn next_datum(&mut self) -> Result<Option<Datum>, SyntaxError> {
        while !self.is_at_end() {
            if let Some(datum) = self.read_datum()? {
                return Ok(Some(datum));
            }
        }
        Ok(None)
    }

    /// Reads one datum. Returns `None` when the tokens read only formed a
    /// datum comment.
    fn read_datum(&mut self) -> Result<Option<Datum>, SyntaxError> {
        let Some(token) = self.tokens.next() else {
            return Ok(None);
        };
        match token.kind {
            TokenType::LeftParen | TokenType::LeftBracket => {
                self.descend(&token)?;
                let list = self.read_list(token);
                self.depth -= 1;
                list.map(|group| Some(Datum::Group(group)))
            }
            TokenType::RightParen | TokenType::RightBracket => {
                Err(self.source.unexpected_token(&token.lexeme, token.location()))
            }
            TokenType::HashSemicolon => {
                self.descend(&token)?;
                let skipped = self.read_target(&token);
                self.depth -= 1;
                skipped.map(|_| None)
            }
            kind if kind.is_short_affector() => {
                self.descend(&token)?;
                let target = self.read_target(&token);
                self.depth -= 1;
                let group = Group::build(vec![Datum::Token(token), target?], self.source)?;
                Ok(Some(Datum::Group(group)))
            }
            TokenType::Eof => Ok(None),
            _ => Ok(Some(Datum::Token(token))),
        }
    }

    /// Reads through the close matching `open`.
    fn read_list(&mut self, open: Token) -> Result<Group, SyntaxError> {
        let open_location = open.location();
        let open_lexeme = open.lexeme.clone();
        let mut elements = vec![Datum::Token(open)];
        loop {
            match self.tokens.peek().map(|token| token.kind) {
                None | Some(TokenType::Eof) => {
                    return Err(self.source.report(
                        ErrorKind::UnterminatedForm { open: open_lexeme },
                        open_location,
                    ));
                }
                Some(kind) if kind.is_close() => {
                    if let Some(close) = self.tokens.next() {
                        elements.push(Datum::Token(close));
                    }
                    break;
                }
                Some(_) => {
                    if let Some(datum) = self.read_datum()? {
                        elements.push(datum);
                    }
                }
            }
        }
        Group::build(elements, self.source)
    }

    /// Reads the first real datum after an affector or `#;`.
    fn read_target(&mut self, affector: &Token) -> Result<Datum, SyntaxError> {
        loop {
            match self.tokens.peek() {
                None => {
                    return Err(self.source.unexpected_token("end of input", affector.location()))
                }
                Some(token) if token.kind == TokenType::Eof => {
                    return Err(self.source.unexpected_token("end of input", token.location()))
                }
                Some(token) if token.kind.is_close() => {
                    return Err(self.source.unexpected_token(&token.lexeme, token.location()))
                }
                Some(_) => {
                    if let Some(datum) = self.read_datum()? {
                        return Ok(datum);
                    }
                }
            }
        }
    }

    fn descend(&mut self, token: &Token) -> Result<(), SyntaxError> {
        if self.depth >= self.max_depth {
            return Err(self
                .source
                .too_deeply_nested(self.max_depth, token.location()));
        }
        self.depth += 1;
        Ok(())
    }

    fn is_at_end(&mut self) -> bool {
        self.tokens
            .peek()
            .map_or(true, |token| token.kind == TokenType::Eof)
    }
}
