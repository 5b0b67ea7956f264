//! Rendering expressions back to Scheme text.
//!
//! Code renders as the form it was parsed from. Quoted data renders behind a
//! `'`, or behind a `` ` `` when it contains unquoted code, which is then
//! marked with `,` or `,@`. Names that would not read back as one identifier
//! are written between pipes.

use std::fmt::{self, Display, Formatter};

use crate::syntax::lexer::is_identifier_char;
use crate::syntax::numeric::{could_start_number, is_scheme_number};

use super::{Atomic, Expression, Extended, Identifier, Symbol, SyntaxRules};

impl Expression {
    /// Renders the expression as source text.
    pub fn pretty(&self) -> String {
        self.to_string()
    }

    /// Renders the expression as it would appear inside quoted data, without
    /// the leading quote.
    pub fn datum(&self) -> String {
        DatumDisplay(self).to_string()
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Atomic(atomic) => write_atomic(f, atomic),
            Expression::Extended(extended) => write_extended(f, extended),
        }
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_name(f, &self.name)
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_name(f, &self.value)
    }
}

impl Display for SyntaxRules {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("(syntax-rules (")?;
        write_joined(f, &self.literals)?;
        f.write_str(")")?;
        for rule in &self.rules {
            write!(
                f,
                " ({} {})",
                DatumDisplay(&rule.pattern),
                DatumDisplay(&rule.template)
            )?;
        }
        f.write_str(")")
    }
}

// ============================================================================
// CODE
// ============================================================================

fn write_atomic(f: &mut Formatter<'_>, atomic: &Atomic) -> fmt::Result {
    match atomic {
        Atomic::Sequence { expressions, .. } => {
            f.write_str("(begin ")?;
            write_joined(f, expressions)?;
            f.write_str(")")
        }
        Atomic::NumericLiteral(number) => f.write_str(&number.value),
        Atomic::BooleanLiteral(boolean) => f.write_str(if boolean.value { "#t" } else { "#f" }),
        Atomic::StringLiteral(string) => write_string(f, &string.value),
        Atomic::Symbol(symbol) => write!(f, "'{symbol}"),
        Atomic::Identifier(identifier) => write!(f, "{identifier}"),
        Atomic::Lambda {
            params, rest, body, ..
        } => {
            f.write_str("(lambda ")?;
            match (params.is_empty(), rest) {
                (true, Some(rest)) => write!(f, "{rest}")?,
                _ => write_formals(f, None, params, rest.as_ref())?,
            }
            f.write_str(" ")?;
            write_body(f, body)?;
            f.write_str(")")
        }
        Atomic::Definition { name, value, .. } => write!(f, "(define {name} {value})"),
        Atomic::Application {
            operator, operands, ..
        } => {
            write!(f, "({operator}")?;
            for operand in operands {
                write!(f, " {operand}")?;
            }
            f.write_str(")")
        }
        Atomic::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => write!(f, "(if {test} {consequent} {alternate})"),
        Atomic::Pair { car, cdr, .. } => write!(f, "(cons {car} {cdr})"),
        Atomic::Nil { .. } => f.write_str("'()"),
        Atomic::SpliceMarker { value, .. } => write!(f, ",@{value}"),
        Atomic::Reassignment { name, value, .. } => write!(f, "(set! {name} {value})"),
        Atomic::Import {
            source,
            identifiers,
            ..
        } => {
            f.write_str("(import ")?;
            write_string(f, &source.value)?;
            f.write_str(" (")?;
            write_joined(f, identifiers)?;
            f.write_str("))")
        }
        Atomic::Export { definition, .. } => write!(f, "(export {definition})"),
        Atomic::Vector { elements, .. } => write_vector(f, elements),
        Atomic::DefineSyntax {
            name, transformer, ..
        } => write!(f, "(define-syntax {name} {transformer})"),
        Atomic::SyntaxRules(rules) => write!(f, "{rules}"),
    }
}

fn write_extended(f: &mut Formatter<'_>, extended: &Extended) -> fmt::Result {
    match extended {
        Extended::FunctionDefinition {
            name,
            params,
            rest,
            body,
            ..
        } => {
            f.write_str("(define ")?;
            write_formals(f, Some(name), params, rest.as_ref())?;
            f.write_str(" ")?;
            write_body(f, body)?;
            f.write_str(")")
        }
        Extended::Let {
            identifiers,
            values,
            body,
            ..
        } => {
            f.write_str("(let (")?;
            for (index, (identifier, value)) in identifiers.iter().zip(values).enumerate() {
                if index > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "({identifier} {value})")?;
            }
            f.write_str(") ")?;
            write_body(f, body)?;
            f.write_str(")")
        }
        Extended::Cond {
            predicates,
            consequents,
            catch_all,
            ..
        } => {
            f.write_str("(cond")?;
            for (predicate, consequent) in predicates.iter().zip(consequents) {
                write!(f, " ({predicate} ")?;
                write_body(f, consequent)?;
                f.write_str(")")?;
            }
            if let Some(catch_all) = catch_all {
                f.write_str(" (else ")?;
                write_body(f, catch_all)?;
                f.write_str(")")?;
            }
            f.write_str(")")
        }
        Extended::List { .. } => {
            let mark = if contains_code(extended_as_list(extended)) {
                '`'
            } else {
                '\''
            };
            write!(f, "{mark}")?;
            write_list_datum(f, extended)
        }
        Extended::Begin { expressions, .. } => {
            f.write_str("(begin ")?;
            write_joined(f, expressions)?;
            f.write_str(")")
        }
        Extended::Delay { expression, .. } => write!(f, "(delay {expression})"),
    }
}

/// Writes `(name a b . rest)`, or `(a b . rest)` without a name.
fn write_formals(
    f: &mut Formatter<'_>,
    name: Option<&Identifier>,
    params: &[Identifier],
    rest: Option<&Identifier>,
) -> fmt::Result {
    f.write_str("(")?;
    let mut first = true;
    for item in name.into_iter().chain(params) {
        if !first {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
        first = false;
    }
    if let Some(rest) = rest {
        if !first {
            f.write_str(" ")?;
        }
        write!(f, ". {rest}")?;
    }
    f.write_str(")")
}

/// Bodies parsed into a `Sequence` are written back as separate expressions.
fn write_body(f: &mut Formatter<'_>, body: &Expression) -> fmt::Result {
    match body {
        Expression::Atomic(Atomic::Sequence { expressions, .. }) => write_joined(f, expressions),
        other => write!(f, "{other}"),
    }
}

// ============================================================================
// DATA
// ============================================================================

/// Renders an expression in data position.
struct DatumDisplay<'a>(&'a Expression);

impl Display for DatumDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.0 {
            Expression::Atomic(Atomic::Symbol(symbol)) => write!(f, "{symbol}"),
            Expression::Atomic(Atomic::Nil { .. }) => f.write_str("()"),
            Expression::Atomic(Atomic::Vector { elements, .. }) => write_vector(f, elements),
            Expression::Atomic(Atomic::SpliceMarker { value, .. }) => write!(f, ",@{value}"),
            Expression::Extended(list @ Extended::List { .. }) => write_list_datum(f, list),
            literal if literal.is_self_evaluating() => write!(f, "{literal}"),
            code => write!(f, ",{code}"),
        }
    }
}

fn write_list_datum(f: &mut Formatter<'_>, list: &Extended) -> fmt::Result {
    let Extended::List {
        elements,
        terminator,
        ..
    } = list
    else {
        return write!(f, "{list:?}");
    };
    f.write_str("(")?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", DatumDisplay(element))?;
    }
    if let Some(terminator) = terminator {
        write!(f, " . {}", DatumDisplay(terminator))?;
    }
    f.write_str(")")
}

fn write_vector(f: &mut Formatter<'_>, elements: &[Expression]) -> fmt::Result {
    f.write_str("#(")?;
    for (index, element) in elements.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", DatumDisplay(element))?;
    }
    f.write_str(")")
}

fn extended_as_list(extended: &Extended) -> Vec<&Expression> {
    match extended {
        Extended::List {
            elements,
            terminator,
            ..
        } => elements.iter().chain(terminator.as_deref()).collect(),
        _ => Vec::new(),
    }
}

/// True if any element of quoted data is unquoted code.
fn contains_code(items: Vec<&Expression>) -> bool {
    items.into_iter().any(|item| match item {
        Expression::Atomic(Atomic::Symbol(_) | Atomic::Nil { .. }) => false,
        Expression::Atomic(Atomic::Vector { elements, .. }) => {
            contains_code(elements.iter().collect())
        }
        Expression::Extended(list @ Extended::List { .. }) => contains_code(extended_as_list(list)),
        other => !other.is_self_evaluating(),
    })
}

// ============================================================================
// ATOMS
// ============================================================================

fn write_joined<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_name(f: &mut Formatter<'_>, name: &str) -> fmt::Result {
    if needs_pipes(name) {
        write!(f, "|{name}|")
    } else {
        f.write_str(name)
    }
}

fn needs_pipes(name: &str) -> bool {
    let Some(first) = name.chars().next() else {
        return true;
    };
    name == "."
        || !name.chars().all(is_identifier_char)
        || (could_start_number(first) && is_scheme_number(name))
}

fn write_string(f: &mut Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}
