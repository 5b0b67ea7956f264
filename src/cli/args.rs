//! Defines the command-line arguments and subcommands for the scheme-front CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::syntax::{Chapter, ParseOptions, DEFAULT_MAX_DEPTH};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "scheme-front",
    version,
    about = "Lex, group, parse and check chapter-gated Scheme sources."
)]
pub struct SchemeArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the token stream of a file.
    Tokens {
        #[arg(required = true)]
        file: PathBuf,
        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the grouped top-level data of a file.
    Group {
        #[arg(required = true)]
        file: PathBuf,
        /// Deepest nesting of parentheses and quotes accepted.
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },
    /// Print the Abstract Syntax Tree of a file.
    Ast {
        #[arg(required = true)]
        file: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
        /// Emit JSON instead of Scheme text.
        #[arg(long)]
        json: bool,
    },
    /// Parse a file, or every `.scm` file under a directory, and report errors.
    Check {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[command(flatten)]
        parse: ParseArgs,
    },
}

/// Options shared by every command that parses.
#[derive(Debug, Clone, Copy, Args)]
pub struct ParseArgs {
    /// Highest language chapter to accept; every form when omitted.
    #[arg(long)]
    pub chapter: Option<u32>,
    /// Deepest nesting of parentheses and quotes accepted.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

impl ParseArgs {
    pub fn options(&self) -> ParseOptions {
        ParseOptions {
            chapter: self.chapter.map(Chapter).unwrap_or_default(),
            max_depth: self.max_depth,
        }
    }
}
