//! `syntax-rules` validation.
//!
//! Patterns and templates arrive as quoted data and are only checked, never
//! expanded.
//!
//! A pattern is a symbol, a literal, `()` or a possibly dotted list of
//! patterns with at most one `...`. The ellipsis cannot lead the list, and in
//! a dotted list it cannot be the last element before the tail.
//!
//! A template is a symbol, a literal, `()`, the escape `(... <template>)`, or a
//! possibly dotted list of templates where each `...` follows an element. One
//! element may be followed by several ellipses.

use crate::ast::{Atomic, Expression, Extended};
use crate::diagnostics::{abbreviate, ErrorKind, ErrorReporting, SyntaxError};

use super::SourceText;

const PATTERN: &str = "<symbol>, <literal>, () or (<pattern>* <pattern> ... <pattern>* . <pattern>?)";
const ELLIPSIS_ONCE: &str = "at most one `...` per list";
const ELLIPSIS_AFTER: &str = "a pattern before `...`";
const ELLIPSIS_BEFORE_TAIL: &str = "a pattern between `...` and the dotted tail";
const TEMPLATE: &str = "<symbol>, <literal>, (... <template>) or (<template> <...>* ...)";
const TEMPLATE_AFTER: &str = "a template before `...`";

// ============================================================================
// PATTERNS
// ============================================================================

/// Checks a `syntax-rules` pattern.
pub fn validate_pattern(source: &SourceText, pattern: &Expression) -> Result<(), SyntaxError> {
    match pattern {
        Expression::Atomic(Atomic::Symbol(_)) if pattern.is_ellipsis() => {
            Err(invalid_pattern(source, pattern, ELLIPSIS_AFTER))
        }
        Expression::Atomic(Atomic::Symbol(_) | Atomic::Nil { .. }) => Ok(()),
        literal if literal.is_self_evaluating() => Ok(()),
        Expression::Extended(Extended::List {
            elements,
            terminator,
            ..
        }) => {
            validate_pattern_elements(source, elements, terminator.is_some())?;
            if let Some(terminator) = terminator {
                validate_pattern(source, terminator)?;
            }
            Ok(())
        }
        Expression::Atomic(Atomic::Vector { elements, .. }) => {
            validate_pattern_elements(source, elements, false)
        }
        other => Err(invalid_pattern(source, other, PATTERN)),
    }
}

fn validate_pattern_elements(
    source: &SourceText,
    elements: &[Expression],
    dotted: bool,
) -> Result<(), SyntaxError> {
    let mut seen_ellipsis = false;
    for (index, element) in elements.iter().enumerate() {
        if !element.is_ellipsis() {
            validate_pattern(source, element)?;
            continue;
        }
        if seen_ellipsis {
            return Err(invalid_pattern(source, element, ELLIPSIS_ONCE));
        }
        if index == 0 {
            return Err(invalid_pattern(source, element, ELLIPSIS_AFTER));
        }
        if dotted && index + 1 == elements.len() {
            return Err(invalid_pattern(source, element, ELLIPSIS_BEFORE_TAIL));
        }
        seen_ellipsis = true;
    }
    Ok(())
}

fn invalid_pattern(source: &SourceText, found: &Expression, expected: &str) -> SyntaxError {
    source.report(
        ErrorKind::InvalidPattern {
            found: abbreviate(&found.datum()),
            expected: expected.into(),
        },
        found.location(),
    )
}

// ============================================================================
// TEMPLATES
// ============================================================================

/// Checks a `syntax-rules` template.
pub fn validate_template(source: &SourceText, template: &Expression) -> Result<(), SyntaxError> {
    match template {
        Expression::Atomic(Atomic::Symbol(_)) if template.is_ellipsis() => {
            Err(invalid_template(source, template, TEMPLATE_AFTER))
        }
        Expression::Atomic(Atomic::Symbol(_) | Atomic::Nil { .. }) => Ok(()),
        literal if literal.is_self_evaluating() => Ok(()),
        Expression::Extended(Extended::List {
            elements,
            terminator,
            ..
        }) => {
            if let [escape, escaped] = elements.as_slice() {
                if escape.is_ellipsis() && terminator.is_none() {
                    return validate_escaped(source, escaped);
                }
            }
            validate_template_elements(source, template, elements)?;
            if let Some(terminator) = terminator {
                validate_template(source, terminator)?;
            }
            Ok(())
        }
        Expression::Atomic(Atomic::Vector { elements, .. }) => {
            validate_template_elements(source, template, elements)
        }
        other => Err(invalid_template(source, other, TEMPLATE)),
    }
}

fn validate_template_elements(
    source: &SourceText,
    list: &Expression,
    elements: &[Expression],
) -> Result<(), SyntaxError> {
    if elements.is_empty() {
        return Err(invalid_template(source, list, TEMPLATE));
    }
    for (index, element) in elements.iter().enumerate() {
        if !element.is_ellipsis() {
            validate_template(source, element)?;
        } else if index == 0 {
            return Err(invalid_template(source, element, TEMPLATE_AFTER));
        }
    }
    Ok(())
}

/// Inside `(... <template>)` an ellipsis is an ordinary symbol.
fn validate_escaped(source: &SourceText, template: &Expression) -> Result<(), SyntaxError> {
    if template.is_ellipsis() {
        return Ok(());
    }
    validate_template(source, template)
}

fn invalid_template(source: &SourceText, found: &Expression, expected: &str) -> SyntaxError {
    source.report(
        ErrorKind::InvalidTemplate {
            found: abbreviate(&found.datum()),
            expected: expected.into(),
        },
        found.location(),
    )
}
