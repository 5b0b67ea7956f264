//! Tokens produced by the lexer.

use std::fmt;

use serde::Serialize;

use super::{Location, Position};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenType {
    // Structure
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Dot,
    /// `#;`, comments out the next datum.
    HashSemicolon,

    // Literals
    Identifier,
    Number,
    Boolean,
    String,

    // Short affectors
    Apostrophe,
    Backtick,
    Comma,
    CommaAt,
    /// The `#` of `#(` / `#[`; the bracket itself is a separate token.
    HashVector,

    // Long affectors
    Quote,
    Quasiquote,
    Unquote,
    UnquoteSplicing,

    // Keywords
    If,
    Let,
    Cond,
    Else,
    Define,
    Lambda,
    Set,
    Begin,
    Delay,
    Import,
    Export,
    DefineSyntax,
    SyntaxRules,

    Eof,
}

impl TokenType {
    /// Looks up the token type of a reserved word.
    pub fn keyword(lexeme: &str) -> Option<TokenType> {
        let kind = match lexeme {
            "quote" => TokenType::Quote,
            "quasiquote" => TokenType::Quasiquote,
            "unquote" => TokenType::Unquote,
            "unquote-splicing" => TokenType::UnquoteSplicing,
            "if" => TokenType::If,
            "let" => TokenType::Let,
            "cond" => TokenType::Cond,
            "else" => TokenType::Else,
            "define" => TokenType::Define,
            "lambda" => TokenType::Lambda,
            "set!" => TokenType::Set,
            "begin" => TokenType::Begin,
            "delay" => TokenType::Delay,
            "import" => TokenType::Import,
            "export" => TokenType::Export,
            "define-syntax" => TokenType::DefineSyntax,
            "syntax-rules" => TokenType::SyntaxRules,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_keyword(self) -> bool {
        use TokenType::*;
        matches!(
            self,
            If | Let
                | Cond
                | Else
                | Define
                | Lambda
                | Set
                | Begin
                | Delay
                | Import
                | Export
                | DefineSyntax
                | SyntaxRules
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(self, TokenType::Number | TokenType::Boolean | TokenType::String)
    }

    pub fn is_short_affector(self) -> bool {
        use TokenType::*;
        matches!(self, Apostrophe | Backtick | Comma | CommaAt | HashVector)
    }

    pub fn is_long_affector(self) -> bool {
        use TokenType::*;
        matches!(self, Quote | Quasiquote | Unquote | UnquoteSplicing)
    }

    pub fn is_open(self) -> bool {
        matches!(self, TokenType::LeftParen | TokenType::LeftBracket)
    }

    pub fn is_close(self) -> bool {
        matches!(self, TokenType::RightParen | TokenType::RightBracket)
    }

    /// Returns true if `close` is the partner of this opening token.
    pub fn closed_by(self, close: TokenType) -> bool {
        matches!(
            (self, close),
            (TokenType::LeftParen, TokenType::RightParen)
                | (TokenType::LeftBracket, TokenType::RightBracket)
        )
    }

    /// Tokens that stand for a datum on their own.
    pub fn is_datum(self) -> bool {
        self == TokenType::Identifier
            || self.is_literal()
            || self.is_keyword()
            || self.is_long_affector()
    }

    /// The symbol an affector abbreviates, e.g. `quote` for `'`.
    pub fn affector_name(self) -> Option<&'static str> {
        use TokenType::*;
        match self {
            Apostrophe | Quote => Some("quote"),
            Backtick | Quasiquote => Some("quasiquote"),
            Comma | Unquote => Some("unquote"),
            CommaAt | UnquoteSplicing => Some("unquote-splicing"),
            _ => None,
        }
    }
}

/// The value a token carries beyond its lexeme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Numbers keep their source spelling; the numeric tower interprets them later.
    Number(String),
    Boolean(bool),
    /// Unescaped string contents.
    String(String),
    /// Verbatim text of a `|...|` identifier.
    Identifier(String),
}

/// A lexical token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenType,
    /// The raw source slice.
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub pos: Position,
    pub end_pos: Position,
}

impl Token {
    pub fn new(
        kind: TokenType,
        lexeme: impl Into<String>,
        literal: Option<Literal>,
        pos: Position,
        end_pos: Position,
    ) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal,
            pos,
            end_pos,
        }
    }

    pub fn location(&self) -> Location {
        Location::new(self.pos, self.end_pos)
    }

    /// The name this token denotes as an identifier or symbol.
    ///
    /// For `|two words|` this is `two words`; for everything else the lexeme.
    pub fn text(&self) -> &str {
        match &self.literal {
            Some(Literal::Identifier(name)) => name,
            _ => &self.lexeme,
        }
    }

    /// Compares kind and spelling, ignoring position.
    pub fn equals(&self, other: &Token) -> bool {
        self.kind == other.kind && self.lexeme == other.lexeme
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_covers_long_affectors() {
        assert_eq!(TokenType::keyword("set!"), Some(TokenType::Set));
        assert_eq!(
            TokenType::keyword("unquote-splicing"),
            Some(TokenType::UnquoteSplicing)
        );
        assert_eq!(TokenType::keyword("lambda*"), None);
        assert!(TokenType::Quote.is_datum());
        assert!(!TokenType::Apostrophe.is_datum());
    }

    #[test]
    fn brackets_only_close_their_own_kind() {
        assert!(TokenType::LeftParen.closed_by(TokenType::RightParen));
        assert!(TokenType::LeftBracket.closed_by(TokenType::RightBracket));
        assert!(!TokenType::LeftParen.closed_by(TokenType::RightBracket));
        assert!(!TokenType::LeftBracket.closed_by(TokenType::RightParen));
    }
}
