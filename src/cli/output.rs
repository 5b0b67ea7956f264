//! Handles all user-facing output for the CLI.
//!
//! This module is responsible for pretty-printing, colorizing output,
//! rendering diagnostics and generating JSON. The library itself never
//! prints; everything a user sees goes through here.

use std::io::{self, Write};
use std::path::Path;

use miette::Report;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Expression;
use crate::diagnostics::SyntaxError;
use crate::syntax::{Datum, Token, TokenType};

// ============================================================================
// CORE OUTPUT FUNCTIONS
// ============================================================================

/// Prints one token per line: position, kind and lexeme.
pub fn print_tokens(tokens: &[Token]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for token in tokens {
        write!(stdout, "{:>8}  ", token.pos.to_string())?;
        stdout.set_color(ColorSpec::new().set_fg(Some(token_color(token.kind))))?;
        write!(stdout, "{:<16}", format!("{:?}", token.kind))?;
        stdout.reset()?;
        writeln!(stdout, "{}", token.lexeme)?;
    }
    Ok(())
}

/// Prints each top-level datum as source text.
pub fn print_data(data: &[Datum]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for datum in data {
        writeln!(stdout, "{datum}")?;
    }
    Ok(())
}

/// Prints each top-level expression with its node type.
pub fn print_program(program: &[Expression]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for expression in program {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        write!(stdout, "{:<20}", expression.type_name())?;
        stdout.reset()?;
        writeln!(stdout, "{}", expression.pretty())?;
    }
    Ok(())
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    let text = serde_json::to_string_pretty(value)?;
    println!("{text}");
    Ok(())
}

/// Prints a one-line `ok`/`error` status for a checked file.
pub fn print_status(path: &Path, ok: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (label, color) = if ok { ("ok", Color::Green) } else { ("error", Color::Red) };
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stdout, "{label:>5}")?;
    stdout.reset()?;
    writeln!(stdout, "  {}", path.display())
}

/// Prints the totals of a `check` run.
pub fn print_summary(total: usize, failed: usize) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    writeln!(stdout, "{} checked, {} failed", total, failed)?;
    stdout.reset()
}

/// Renders a syntax error with its labelled source on stderr.
pub fn print_syntax_error(error: SyntaxError) {
    eprintln!("{:?}", Report::new(error));
}

/// Renders any diagnostic on stderr.
pub fn print_report(report: Report) {
    eprintln!("{report:?}");
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn token_color(kind: TokenType) -> Color {
    match kind {
        k if k.is_open() || k.is_close() => Color::White,
        k if k.is_keyword() => Color::Magenta,
        k if k.is_short_affector() || k.is_long_affector() => Color::Yellow,
        TokenType::Number | TokenType::Boolean | TokenType::String => Color::Green,
        TokenType::Identifier => Color::Cyan,
        _ => Color::Blue,
    }
}
