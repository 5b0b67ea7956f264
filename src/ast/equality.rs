//! Structural equality of expressions.
//!
//! Two trees are equal when they have the same shape and the same names and
//! literal values. Locations are ignored, so a tree parsed from reformatted
//! source compares equal to the original.

use super::{
    Atomic, BooleanLiteral, Expression, Extended, Identifier, NumericLiteral, StringLiteral,
    Symbol, SyntaxRule, SyntaxRules,
};

impl Expression {
    pub fn equals(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::Atomic(a), Expression::Atomic(b)) => a.equals(b),
            (Expression::Extended(a), Expression::Extended(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl Atomic {
    pub fn equals(&self, other: &Atomic) -> bool {
        match (self, other) {
            (Atomic::Sequence { expressions: a, .. }, Atomic::Sequence { expressions: b, .. }) => all_equal(a, b),
            (Atomic::NumericLiteral(a), Atomic::NumericLiteral(b)) => a.equals(b),
            (Atomic::BooleanLiteral(a), Atomic::BooleanLiteral(b)) => a.equals(b),
            (Atomic::StringLiteral(a), Atomic::StringLiteral(b)) => a.equals(b),
            (Atomic::Symbol(a), Atomic::Symbol(b)) => a.equals(b),
            (Atomic::Identifier(a), Atomic::Identifier(b)) => a.equals(b),
            (
                Atomic::Lambda {
                    params: pa,
                    rest: ra,
                    body: ba,
                    ..
                },
                Atomic::Lambda {
                    params: pb,
                    rest: rb,
                    body: bb,
                    ..
                },
            ) => identifiers_equal(pa, pb) && optional_identifier_equal(ra, rb) && ba.equals(bb),
            (
                Atomic::Definition {
                    name: na, value: va, ..
                },
                Atomic::Definition {
                    name: nb, value: vb, ..
                },
            )
            | (
                Atomic::Reassignment {
                    name: na, value: va, ..
                },
                Atomic::Reassignment {
                    name: nb, value: vb, ..
                },
            ) => na.equals(nb) && va.equals(vb),
            (
                Atomic::Application {
                    operator: oa,
                    operands: ra,
                    ..
                },
                Atomic::Application {
                    operator: ob,
                    operands: rb,
                    ..
                },
            ) => oa.equals(ob) && all_equal(ra, rb),
            (
                Atomic::Conditional {
                    test: ta,
                    consequent: ca,
                    alternate: aa,
                    ..
                },
                Atomic::Conditional {
                    test: tb,
                    consequent: cb,
                    alternate: ab,
                    ..
                },
            ) => ta.equals(tb) && ca.equals(cb) && aa.equals(ab),
            (Atomic::Pair { car: aa, cdr: da, .. }, Atomic::Pair { car: ab, cdr: db, .. }) => {
                aa.equals(ab) && da.equals(db)
            }
            (Atomic::Nil { .. }, Atomic::Nil { .. }) => true,
            (Atomic::SpliceMarker { value: a, .. }, Atomic::SpliceMarker { value: b, .. }) => a.equals(b),
            (
                Atomic::Import {
                    source: sa,
                    identifiers: ia,
                    ..
                },
                Atomic::Import {
                    source: sb,
                    identifiers: ib,
                    ..
                },
            ) => sa.equals(sb) && identifiers_equal(ia, ib),
            (Atomic::Export { definition: a, .. }, Atomic::Export { definition: b, .. }) => a.equals(b),
            (Atomic::Vector { elements: a, .. }, Atomic::Vector { elements: b, .. }) => all_equal(a, b),
            (
                Atomic::DefineSyntax {
                    name: na,
                    transformer: ta,
                    ..
                },
                Atomic::DefineSyntax {
                    name: nb,
                    transformer: tb,
                    ..
                },
            ) => na.equals(nb) && ta.equals(tb),
            (Atomic::SyntaxRules(a), Atomic::SyntaxRules(b)) => a.equals(b),
            _ => false,
        }
    }
}

impl Extended {
    pub fn equals(&self, other: &Extended) -> bool {
        match (self, other) {
            (
                Extended::FunctionDefinition {
                    name: na,
                    params: pa,
                    rest: ra,
                    body: ba,
                    ..
                },
                Extended::FunctionDefinition {
                    name: nb,
                    params: pb,
                    rest: rb,
                    body: bb,
                    ..
                },
            ) => {
                na.equals(nb)
                    && identifiers_equal(pa, pb)
                    && optional_identifier_equal(ra, rb)
                    && ba.equals(bb)
            }
            (
                Extended::Let {
                    identifiers: ia,
                    values: va,
                    body: ba,
                    ..
                },
                Extended::Let {
                    identifiers: ib,
                    values: vb,
                    body: bb,
                    ..
                },
            ) => identifiers_equal(ia, ib) && all_equal(va, vb) && ba.equals(bb),
            (
                Extended::Cond {
                    predicates: pa,
                    consequents: ca,
                    catch_all: ea,
                    ..
                },
                Extended::Cond {
                    predicates: pb,
                    consequents: cb,
                    catch_all: eb,
                    ..
                },
            ) => all_equal(pa, pb) && all_equal(ca, cb) && optional_equal(ea, eb),
            (
                Extended::List {
                    elements: ea,
                    terminator: ta,
                    ..
                },
                Extended::List {
                    elements: eb,
                    terminator: tb,
                    ..
                },
            ) => all_equal(ea, eb) && optional_equal(ta, tb),
            (Extended::Begin { expressions: a, .. }, Extended::Begin { expressions: b, .. }) => all_equal(a, b),
            (Extended::Delay { expression: a, .. }, Extended::Delay { expression: b, .. }) => a.equals(b),
            _ => false,
        }
    }
}

impl NumericLiteral {
    pub fn equals(&self, other: &NumericLiteral) -> bool {
        self.value == other.value
    }
}

impl BooleanLiteral {
    pub fn equals(&self, other: &BooleanLiteral) -> bool {
        self.value == other.value
    }
}

impl StringLiteral {
    pub fn equals(&self, other: &StringLiteral) -> bool {
        self.value == other.value
    }
}

impl Symbol {
    pub fn equals(&self, other: &Symbol) -> bool {
        self.value == other.value
    }
}

impl Identifier {
    pub fn equals(&self, other: &Identifier) -> bool {
        self.name == other.name
    }
}

impl SyntaxRules {
    pub fn equals(&self, other: &SyntaxRules) -> bool {
        self.literals.len() == other.literals.len()
            && self
                .literals
                .iter()
                .zip(&other.literals)
                .all(|(a, b)| a.equals(b))
            && self.rules.len() == other.rules.len()
            && self
                .rules
                .iter()
                .zip(&other.rules)
                .all(|(a, b)| a.equals(b))
    }
}

impl SyntaxRule {
    pub fn equals(&self, other: &SyntaxRule) -> bool {
        self.pattern.equals(&other.pattern) && self.template.equals(&other.template)
    }
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn all_equal(a: &[Expression], b: &[Expression]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn identifiers_equal(a: &[Identifier], b: &[Identifier]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y))
}

fn optional_equal(a: &Option<Box<Expression>>, b: &Option<Box<Expression>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.equals(b),
        (None, None) => true,
        _ => false,
    }
}

fn optional_identifier_equal(a: &Option<Identifier>, b: &Option<Identifier>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.equals(b),
        (None, None) => true,
        _ => false,
    }
}
