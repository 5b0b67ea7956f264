//! The scheme-front Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions. Files are read here; the library only ever
//! sees in-memory source text.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;
use walkdir::WalkDir;

use crate::cli::args::{Command, ParseArgs, SchemeArgs};
use crate::diagnostics::SyntaxError;
use crate::syntax::{ParseOptions, SourceText};

pub mod args;
pub mod output;

/// Extension of the files `check` picks up in a directory.
const SOURCE_EXTENSION: &str = "scm";

/// Everything that can make a CLI command fail.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("could not read `{}`", .path.display())]
    #[diagnostic(code(scheme::cli::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not walk `{}`", .path.display())]
    #[diagnostic(code(scheme::cli::walk))]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("could not serialize output")]
    #[diagnostic(code(scheme::cli::json))]
    Json(#[from] serde_json::Error),
    #[error("could not write output")]
    #[diagnostic(code(scheme::cli::output))]
    Output(#[from] std::io::Error),
    #[error("{failed} of {total} files failed to parse")]
    #[diagnostic(code(scheme::cli::check))]
    CheckFailed { failed: usize, total: usize },
}

/// The main entry point for the CLI.
pub fn run() {
    let args = SchemeArgs::parse();

    let result = match args.command {
        Command::Tokens { file, json } => handle_tokens(&file, json),
        Command::Group { file, max_depth } => handle_group(&file, max_depth),
        Command::Ast { file, parse, json } => handle_ast(&file, parse, json),
        Command::Check { path, parse } => handle_check(&path, parse.options()),
    };

    if let Err(error) = result {
        output::print_report(error.into());
        process::exit(1);
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_tokens(path: &Path, json: bool) -> Result<(), CliError> {
    let source = read_source(path)?;
    let tokens = crate::scan_tokens(&source)?;
    if json {
        output::print_json(&tokens)?;
    } else {
        output::print_tokens(&tokens)?;
    }
    Ok(())
}

fn handle_group(path: &Path, max_depth: usize) -> Result<(), CliError> {
    let source = read_source(path)?;
    let data = crate::group_with_depth(&source, max_depth)?;
    output::print_data(&data)?;
    Ok(())
}

fn handle_ast(path: &Path, parse: ParseArgs, json: bool) -> Result<(), CliError> {
    let source = read_source(path)?;
    let program = crate::parse(&source, parse.options())?;
    if json {
        output::print_json(&program)?;
    } else {
        output::print_program(&program)?;
    }
    Ok(())
}

/// Parses every source under `path`, reporting each failure and continuing.
fn handle_check(path: &Path, options: ParseOptions) -> Result<(), CliError> {
    let files = collect_sources(path)?;
    let mut failed = 0;
    for file in &files {
        let source = read_source(file)?;
        match crate::parse(&source, options) {
            Ok(_) => output::print_status(file, true)?,
            Err(error) => {
                failed += 1;
                output::print_status(file, false)?;
                output::print_syntax_error(error);
            }
        }
    }
    output::print_summary(files.len(), failed)?;

    if failed > 0 {
        return Err(CliError::CheckFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn read_source(path: &Path) -> Result<SourceText, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceText::new(path.display().to_string(), content))
}

/// A single file as given, or every `.scm` file below a directory in path order.
fn collect_sources(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|source| CliError::Walk {
            path: path.to_path_buf(),
            source,
        })?;
        let is_source = entry
            .path()
            .extension()
            .is_some_and(|extension| extension == SOURCE_EXTENSION);
        if entry.file_type().is_file() && is_source {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
