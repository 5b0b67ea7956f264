//! Data: the output of the grouper.
//!
//! A [`Datum`] is either a single token or a [`Group`] of data. Groups can
//! only be made through [`Group::build`], which enforces their shape:
//!
//! - never empty;
//! - one element: a single datum token (a lone group collapses to itself);
//! - two elements: a short affector and its target datum (`'x`, `,@xs`, `#(...)`);
//! - otherwise parenthesized, with matching `(`/`)` or `[`/`]` at the ends and
//!   no stray bracket in between.
//!
//! Parenthesis tokens are kept inside the group so later stages can point at them.

use std::fmt;

use serde::Serialize;

use crate::diagnostics::{ErrorKind, ErrorReporting, SyntaxError};

use super::token::{Token, TokenType};
use super::Location;

/// A token or a group of data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Token(Token),
    Group(Group),
}

impl Datum {
    pub fn location(&self) -> Location {
        match self {
            Datum::Token(token) => token.location(),
            Datum::Group(group) => group.location(),
        }
    }

    /// The token, if this datum is a token or a group around one token.
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Datum::Token(token) => Some(token),
            Datum::Group(group) => group.single_token(),
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Datum::Group(group) => Some(group),
            Datum::Token(_) => None,
        }
    }

    /// Returns the parenthesized group this datum is, if any.
    pub fn as_list(&self) -> Option<&Group> {
        self.as_group().filter(|group| group.is_parenthesized())
    }

    pub fn is_token(&self, kind: TokenType) -> bool {
        matches!(self, Datum::Token(token) if token.kind == kind)
    }

    /// Structural equality ignoring positions.
    pub fn equals(&self, other: &Datum) -> bool {
        match (self, other) {
            (Datum::Token(a), Datum::Token(b)) => a.equals(b),
            (Datum::Group(a), Datum::Group(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Datum::Token(token) => write!(f, "{token}"),
            Datum::Group(group) => write!(f, "{group}"),
        }
    }
}

impl From<Token> for Datum {
    fn from(token: Token) -> Self {
        Datum::Token(token)
    }
}

impl From<Group> for Datum {
    fn from(group: Group) -> Self {
        Datum::Group(group)
    }
}

/// A validated sequence of sibling data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group {
    elements: Vec<Datum>,
    location: Location,
}

impl Group {
    /// Builds a group, rejecting every shape other than the ones listed in the
    /// module documentation.
    pub fn build(
        mut elements: Vec<Datum>,
        reporter: &impl ErrorReporting,
    ) -> Result<Group, SyntaxError> {
        match elements.len() {
            0 => Err(reporter.unexpected_token("()", Location::default())),
            1 => match elements.pop() {
                Some(Datum::Group(inner)) => Ok(inner),
                Some(Datum::Token(token)) if token.kind.is_datum() => {
                    Ok(Self::from_elements(vec![Datum::Token(token)]))
                }
                Some(Datum::Token(token)) => {
                    Err(reporter.unexpected_token(&token.lexeme, token.location()))
                }
                None => Err(reporter.unexpected_token("()", Location::default())),
            },
            2 if is_short_affector(&elements[0]) => match &elements[1] {
                Datum::Token(target) if !target.kind.is_datum() => {
                    Err(reporter.unexpected_token(&target.lexeme, target.location()))
                }
                _ => Ok(Self::from_elements(elements)),
            },
            _ => {
                Self::check_parentheses(&elements, reporter)?;
                Ok(Self::from_elements(elements))
            }
        }
    }

    fn check_parentheses(
        elements: &[Datum],
        reporter: &impl ErrorReporting,
    ) -> Result<(), SyntaxError> {
        let (Some(first), Some(last)) = (elements.first(), elements.last()) else {
            return Err(reporter.unexpected_token("()", Location::default()));
        };
        let open = match first {
            Datum::Token(token) if token.kind.is_open() => token,
            other => return Err(reporter.unexpected_token(&other.to_string(), other.location())),
        };
        // Nested lists are groups of their own, so any bracket token inside is stray.
        let inner = &elements[1..elements.len().saturating_sub(1)];
        if let Some(stray) = inner
            .iter()
            .filter_map(|element| match element {
                Datum::Token(token) => Some(token),
                Datum::Group(_) => None,
            })
            .find(|token| token.kind.is_open() || token.kind.is_close())
        {
            return Err(reporter.unexpected_token(&stray.lexeme, stray.location()));
        }
        match last {
            Datum::Token(close) if open.kind.closed_by(close.kind) => Ok(()),
            Datum::Token(close) if close.kind.is_close() => Err(reporter.report(
                ErrorKind::MismatchedParenthesis {
                    open: open.lexeme.clone(),
                    close: close.lexeme.clone(),
                },
                close.location(),
            )),
            _ => Err(reporter.report(
                ErrorKind::UnterminatedForm {
                    open: open.lexeme.clone(),
                },
                open.location(),
            )),
        }
    }

    fn from_elements(elements: Vec<Datum>) -> Self {
        let location = match (elements.first(), elements.last()) {
            (Some(first), Some(last)) => first.location().merge(&last.location()),
            _ => Location::default(),
        };
        Self { elements, location }
    }

    /// All elements, parentheses included.
    pub fn elements(&self) -> &[Datum] {
        &self.elements
    }

    /// The elements between the parentheses, or every element of an
    /// unparenthesized group.
    pub fn contents(&self) -> &[Datum] {
        if self.is_parenthesized() {
            &self.elements[1..self.elements.len() - 1]
        } else {
            &self.elements
        }
    }

    /// Number of elements inside the parentheses.
    pub fn len(&self) -> usize {
        self.contents().len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents().is_empty()
    }

    pub fn is_parenthesized(&self) -> bool {
        self.elements.len() >= 2
            && matches!(self.elements.first(), Some(Datum::Token(t)) if t.kind.is_open())
    }

    /// The opening parenthesis token of a parenthesized group.
    pub fn open_token(&self) -> Option<&Token> {
        match self.elements.first() {
            Some(Datum::Token(token)) if token.kind.is_open() => Some(token),
            _ => None,
        }
    }

    /// The token of a group that wraps exactly one token.
    pub fn single_token(&self) -> Option<&Token> {
        match self.elements.as_slice() {
            [Datum::Token(token)] => Some(token),
            _ => None,
        }
    }

    pub fn is_single_identifier(&self) -> bool {
        self.single_token()
            .is_some_and(|token| token.kind == TokenType::Identifier)
    }

    /// The first token inside the parentheses, used to dispatch special forms.
    pub fn head_token(&self) -> Option<&Token> {
        match self.contents().first() {
            Some(Datum::Token(token)) => Some(token),
            _ => None,
        }
    }

    /// The affector and its target, for an unparenthesized pair.
    pub fn affector(&self) -> Option<(&Token, &Datum)> {
        match self.elements.as_slice() {
            [Datum::Token(affector), target] if affector.kind.is_short_affector() => {
                Some((affector, target))
            }
            _ => None,
        }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn equals(&self, other: &Group) -> bool {
        self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.equals(b))
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some((affector, target)) = self.affector() {
            let target = target.to_string();
            // `, @x` must not be re-read as `,@x`.
            if affector.kind == TokenType::Comma && target.starts_with('@') {
                return write!(f, "{affector} {target}");
            }
            return write!(f, "{affector}{target}");
        }
        if let Some(token) = self.single_token() {
            return write!(f, "{token}");
        }
        let mut text = String::new();
        for element in self.elements.iter() {
            let piece = element.to_string();
            let is_close = element.as_token().is_some_and(|t| t.kind.is_close());
            let after_open = text.ends_with('(') || text.ends_with('[');
            if !text.is_empty() && !is_close && !after_open {
                text.push(' ');
            }
            text.push_str(&piece);
        }
        f.write_str(&text)
    }
}

fn is_short_affector(datum: &Datum) -> bool {
    matches!(datum, Datum::Token(token) if token.kind.is_short_affector())
}
