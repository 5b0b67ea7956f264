//! AST module for the Scheme front end
//!
//! The tree is a closed two-tier sum type. [`Atomic`] nodes are the core forms
//! every later pass understands; [`Extended`] nodes are sugar a lowering pass
//! rewrites into atomic ones. Every node owns its children and carries the
//! [`Location`] of the source it came from.
//!
//! Structural comparison lives in [`equality`], rendering back to Scheme text
//! in [`pretty`].

use serde::Serialize;

use crate::syntax::Location;

pub mod equality;
pub mod pretty;

// ============================================================================
// EXPRESSIONS
// ============================================================================

/// A parsed expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Atomic(Atomic),
    Extended(Extended),
}

/// Core forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Atomic {
    /// Several body expressions evaluated in order; the last one is the value.
    Sequence {
        expressions: Vec<Expression>,
        location: Location,
    },
    NumericLiteral(NumericLiteral),
    BooleanLiteral(BooleanLiteral),
    StringLiteral(StringLiteral),
    Symbol(Symbol),
    Lambda {
        params: Vec<Identifier>,
        rest: Option<Identifier>,
        body: Box<Expression>,
        location: Location,
    },
    Identifier(Identifier),
    Definition {
        name: Identifier,
        value: Box<Expression>,
        location: Location,
    },
    Application {
        operator: Box<Expression>,
        operands: Vec<Expression>,
        location: Location,
    },
    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
        location: Location,
    },
    /// A cons cell. The parser never builds one; lowering passes do.
    Pair {
        car: Box<Expression>,
        cdr: Box<Expression>,
        location: Location,
    },
    Nil {
        location: Location,
    },
    /// `,@x` inside a quasiquote, left for the runtime to splice.
    SpliceMarker {
        value: Box<Expression>,
        location: Location,
    },
    Reassignment {
        name: Identifier,
        value: Box<Expression>,
        location: Location,
    },
    Import {
        source: StringLiteral,
        identifiers: Vec<Identifier>,
        location: Location,
    },
    Export {
        definition: Box<Expression>,
        location: Location,
    },
    Vector {
        elements: Vec<Expression>,
        location: Location,
    },
    DefineSyntax {
        name: Symbol,
        transformer: SyntaxRules,
        location: Location,
    },
    SyntaxRules(SyntaxRules),
}

/// Sugar over the core forms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Extended {
    FunctionDefinition {
        name: Identifier,
        params: Vec<Identifier>,
        rest: Option<Identifier>,
        body: Box<Expression>,
        location: Location,
    },
    Let {
        identifiers: Vec<Identifier>,
        values: Vec<Expression>,
        body: Box<Expression>,
        location: Location,
    },
    /// `predicates[i]` selects `consequents[i]`; `catch_all` is the `else` clause.
    Cond {
        predicates: Vec<Expression>,
        consequents: Vec<Expression>,
        catch_all: Option<Box<Expression>>,
        location: Location,
    },
    /// Quoted list data. A `terminator` makes it a dotted list.
    List {
        elements: Vec<Expression>,
        terminator: Option<Box<Expression>>,
        location: Location,
    },
    Begin {
        expressions: Vec<Expression>,
        location: Location,
    },
    Delay {
        expression: Box<Expression>,
        location: Location,
    },
}

// ============================================================================
// LEAF NODES
// ============================================================================

/// A number kept in its source spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericLiteral {
    pub value: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BooleanLiteral {
    pub value: bool,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub value: String,
    pub location: Location,
}

/// A name used as data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub value: String,
    pub location: Location,
}

/// A name used as a variable reference or binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub name: String,
    pub location: Location,
}

/// A validated `syntax-rules` transformer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxRules {
    pub literals: Vec<Symbol>,
    pub rules: Vec<SyntaxRule>,
    pub location: Location,
}

/// One `(<pattern> <template>)` pair, both kept as quoted data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxRule {
    pub pattern: Expression,
    pub template: Expression,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl Identifier {
    pub fn new(name: impl Into<String>, location: Location) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

impl Symbol {
    pub fn new(value: impl Into<String>, location: Location) -> Self {
        Self {
            value: value.into(),
            location,
        }
    }
}

impl From<Atomic> for Expression {
    fn from(atomic: Atomic) -> Self {
        Expression::Atomic(atomic)
    }
}

impl From<Extended> for Expression {
    fn from(extended: Extended) -> Self {
        Expression::Extended(extended)
    }
}

impl From<Identifier> for Expression {
    fn from(identifier: Identifier) -> Self {
        Expression::Atomic(Atomic::Identifier(identifier))
    }
}

impl From<Symbol> for Expression {
    fn from(symbol: Symbol) -> Self {
        Expression::Atomic(Atomic::Symbol(symbol))
    }
}

impl Expression {
    /// Wraps several body expressions into one, merging their locations.
    ///
    /// A single expression is returned unchanged.
    pub fn sequence(mut expressions: Vec<Expression>) -> Expression {
        if expressions.len() == 1 {
            if let Some(only) = expressions.pop() {
                return only;
            }
        }
        let location = match (expressions.first(), expressions.last()) {
            (Some(first), Some(last)) => first.location().merge(&last.location()),
            _ => Location::default(),
        };
        Atomic::Sequence {
            expressions,
            location,
        }
        .into()
    }
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Expression {
    pub fn location(&self) -> Location {
        match self {
            Expression::Atomic(atomic) => atomic.location(),
            Expression::Extended(extended) => extended.location(),
        }
    }

    /// Name of the node variant, e.g. `FunctionDefinition`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Expression::Atomic(atomic) => atomic.type_name(),
            Expression::Extended(extended) => extended.type_name(),
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Expression::Atomic(Atomic::Identifier(identifier)) => Some(identifier),
            _ => None,
        }
    }

    pub fn into_identifier(self) -> Option<Identifier> {
        match self {
            Expression::Atomic(Atomic::Identifier(identifier)) => Some(identifier),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Expression::Atomic(Atomic::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    pub fn into_symbol(self) -> Option<Symbol> {
        match self {
            Expression::Atomic(Atomic::Symbol(symbol)) => Some(symbol),
            _ => None,
        }
    }

    /// True for the symbol `...`.
    pub fn is_ellipsis(&self) -> bool {
        self.as_symbol().is_some_and(|symbol| symbol.value == "...")
    }

    /// Numbers, booleans and strings.
    pub fn is_self_evaluating(&self) -> bool {
        matches!(
            self,
            Expression::Atomic(
                Atomic::NumericLiteral(_) | Atomic::BooleanLiteral(_) | Atomic::StringLiteral(_)
            )
        )
    }

    pub fn is_definition(&self) -> bool {
        matches!(
            self,
            Expression::Atomic(Atomic::Definition { .. })
                | Expression::Extended(Extended::FunctionDefinition { .. })
        )
    }

    pub fn is_import(&self) -> bool {
        matches!(self, Expression::Atomic(Atomic::Import { .. }))
    }
}

impl Atomic {
    pub fn location(&self) -> Location {
        match self {
            Atomic::NumericLiteral(NumericLiteral { location, .. })
            | Atomic::BooleanLiteral(BooleanLiteral { location, .. })
            | Atomic::StringLiteral(StringLiteral { location, .. })
            | Atomic::Symbol(Symbol { location, .. })
            | Atomic::Identifier(Identifier { location, .. })
            | Atomic::SyntaxRules(SyntaxRules { location, .. })
            | Atomic::Sequence { location, .. }
            | Atomic::Lambda { location, .. }
            | Atomic::Definition { location, .. }
            | Atomic::Application { location, .. }
            | Atomic::Conditional { location, .. }
            | Atomic::Pair { location, .. }
            | Atomic::Nil { location }
            | Atomic::SpliceMarker { location, .. }
            | Atomic::Reassignment { location, .. }
            | Atomic::Import { location, .. }
            | Atomic::Export { location, .. }
            | Atomic::Vector { location, .. }
            | Atomic::DefineSyntax { location, .. } => *location,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Atomic::Sequence { .. } => "Sequence",
            Atomic::NumericLiteral(_) => "NumericLiteral",
            Atomic::BooleanLiteral(_) => "BooleanLiteral",
            Atomic::StringLiteral(_) => "StringLiteral",
            Atomic::Symbol(_) => "Symbol",
            Atomic::Lambda { .. } => "Lambda",
            Atomic::Identifier(_) => "Identifier",
            Atomic::Definition { .. } => "Definition",
            Atomic::Application { .. } => "Application",
            Atomic::Conditional { .. } => "Conditional",
            Atomic::Pair { .. } => "Pair",
            Atomic::Nil { .. } => "Nil",
            Atomic::SpliceMarker { .. } => "SpliceMarker",
            Atomic::Reassignment { .. } => "Reassignment",
            Atomic::Import { .. } => "Import",
            Atomic::Export { .. } => "Export",
            Atomic::Vector { .. } => "Vector",
            Atomic::DefineSyntax { .. } => "DefineSyntax",
            Atomic::SyntaxRules(_) => "SyntaxRules",
        }
    }
}

impl Extended {
    pub fn location(&self) -> Location {
        match self {
            Extended::FunctionDefinition { location, .. }
            | Extended::Let { location, .. }
            | Extended::Cond { location, .. }
            | Extended::List { location, .. }
            | Extended::Begin { location, .. }
            | Extended::Delay { location, .. } => *location,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Extended::FunctionDefinition { .. } => "FunctionDefinition",
            Extended::Let { .. } => "Let",
            Extended::Cond { .. } => "Cond",
            Extended::List { .. } => "List",
            Extended::Begin { .. } => "Begin",
            Extended::Delay { .. } => "Delay",
        }
    }
}
