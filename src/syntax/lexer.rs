//! Lexer: source text into a flat token sequence.
//!
//! The lexer looks at most one character ahead and keeps no state between
//! tokens other than its line/column cursor. Whitespace, `;` line comments and
//! `#| ... |#` block comments are dropped. The stream always ends with a single
//! zero-width [`TokenType::Eof`] token.

use crate::diagnostics::{ErrorKind, ErrorReporting, SyntaxError};

use super::numeric::{could_start_number, is_scheme_number};
use super::token::{Literal, Token, TokenType};
use super::{Location, Position, SourceText};

/// Scans a whole source into tokens.
pub fn scan_tokens(source: &SourceText) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).scan_tokens()
}

pub struct Lexer<'a> {
    source: &'a SourceText,
    text: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    start: Position,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a SourceText) -> Self {
        Self {
            source,
            text: source.content(),
            offset: 0,
            line: 1,
            column: 1,
            start: Position::start(),
            tokens: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<Token>, SyntaxError> {
        while !self.is_at_end() {
            self.start = self.position();
            self.scan_token()?;
        }
        let end = self.position();
        self.tokens
            .push(Token::new(TokenType::Eof, "", None, end, end));
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), SyntaxError> {
        let Some(c) = self.advance() else {
            return Ok(());
        };
        match c {
            '(' => self.add_token(TokenType::LeftParen, None),
            ')' => self.add_token(TokenType::RightParen, None),
            '[' => self.add_token(TokenType::LeftBracket, None),
            ']' => self.add_token(TokenType::RightBracket, None),
            '\'' => self.add_token(TokenType::Apostrophe, None),
            '`' => self.add_token(TokenType::Backtick, None),
            ',' => {
                if self.match_char('@') {
                    self.add_token(TokenType::CommaAt, None);
                } else {
                    self.add_token(TokenType::Comma, None);
                }
            }
            '#' => self.hash_token()?,
            ';' => self.line_comment(),
            '"' => self.string_token()?,
            '|' => self.pipe_identifier()?,
            c if c.is_whitespace() => {}
            c if is_identifier_char(c) => self.identifier_or_number(c),
            other => return Err(self.error(ErrorKind::UnexpectedCharacter(other))),
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Token scanners
    // ------------------------------------------------------------------------

    fn hash_token(&mut self) -> Result<(), SyntaxError> {
        match self.peek() {
            Some('t') | Some('f') => {
                self.consume_identifier_chars();
                let value = match self.lexeme() {
                    "#t" | "#true" => true,
                    "#f" | "#false" => false,
                    _ => return Err(self.error(ErrorKind::UnexpectedCharacter('#'))),
                };
                self.add_token(TokenType::Boolean, Some(Literal::Boolean(value)));
            }
            Some('|') => {
                self.advance();
                self.block_comment()?;
            }
            Some(';') => {
                self.advance();
                self.add_token(TokenType::HashSemicolon, None);
            }
            Some('(') | Some('[') => self.add_token(TokenType::HashVector, None),
            _ => return Err(self.error(ErrorKind::UnexpectedCharacter('#'))),
        }
        Ok(())
    }

    fn line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skips to the first `|#`; block comments do not nest.
    fn block_comment(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.advance() {
                None => return Err(self.error(ErrorKind::UnterminatedComment)),
                Some('|') if self.peek() == Some('#') => {
                    self.advance();
                    return Ok(());
                }
                Some(_) => {}
            }
        }
    }

    fn string_token(&mut self) -> Result<(), SyntaxError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error(ErrorKind::UnterminatedString)),
                Some('"') => break,
                Some('\\') => match self.advance() {
                    None => return Err(self.error(ErrorKind::UnterminatedString)),
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('0') => value.push('\0'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(other) => {
                        value.push('\\');
                        value.push(other);
                    }
                },
                Some(c) => value.push(c),
            }
        }
        self.add_token(TokenType::String, Some(Literal::String(value)));
        Ok(())
    }

    fn pipe_identifier(&mut self) -> Result<(), SyntaxError> {
        let mut name = String::new();
        loop {
            match self.advance() {
                None => return Err(self.error(ErrorKind::UnterminatedIdentifier)),
                Some('|') => break,
                Some(c) => name.push(c),
            }
        }
        self.add_token(TokenType::Identifier, Some(Literal::Identifier(name)));
        Ok(())
    }

    /// Scans an identifier-shaped lexeme and classifies it.
    ///
    /// Lexemes that could begin a number and pass the numeric recognizer are
    /// numbers and skip keyword lookup; everything else is a keyword or an
    /// identifier, so malformed numbers such as `1.2.3` become identifiers.
    fn identifier_or_number(&mut self, first: char) {
        self.consume_identifier_chars();
        let lexeme = self.lexeme();
        if lexeme == "." {
            self.add_token(TokenType::Dot, None);
            return;
        }
        if could_start_number(first) && is_scheme_number(lexeme) {
            let literal = Literal::Number(lexeme.to_string());
            self.add_token(TokenType::Number, Some(literal));
            return;
        }
        let kind = TokenType::keyword(lexeme).unwrap_or(TokenType::Identifier);
        self.add_token(kind, None);
    }

    // ------------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------------

    fn is_at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column, self.offset)
    }

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_identifier_chars(&mut self) {
        while let Some(c) = self.peek() {
            if !is_identifier_char(c) {
                break;
            }
            self.advance();
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.text[self.start.offset..self.offset]
    }

    fn add_token(&mut self, kind: TokenType, literal: Option<Literal>) {
        let token = Token::new(kind, self.lexeme(), literal, self.start, self.position());
        self.tokens.push(token);
    }

    fn error(&self, kind: ErrorKind) -> SyntaxError {
        self.source
            .report(kind, Location::new(self.start, self.position()))
    }
}

/// Characters allowed in bare identifiers (and numbers).
pub(crate) fn is_identifier_char(c: char) -> bool {
    !c.is_whitespace()
        && !c.is_control()
        && !matches!(
            c,
            '(' | ')' | '[' | ']' | '{' | '}' | '"' | ';' | '\'' | '`' | ',' | '|' | '#'
        )
}
