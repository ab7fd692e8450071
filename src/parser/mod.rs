//! Equation source parser
//!
//! This module transforms equation source text into an Abstract Syntax Tree (AST):
//! - [`symbols`]: the element symbol table the lexer matches against
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`printer`]: canonical text form of any AST node
//!
//! # Language
//!
//! A program is one or more equations separated by `;`. Each equation joins
//! two reagents with `->` (reaction) or `=` (assignment). A reagent is a
//! `+`-separated list of terms, a term is an optional coefficient followed by
//! a molecule, and a molecule is a run of elements, each optionally followed
//! by an `_N` subscript. `(name)` stands for a named group and the words
//! `heat` and `light` are accepted wherever an element is.
//!
//! ```text
//! 2H_2 + O_2 -> 2H_2O;
//! CH_4 + 2O_2 + heat -> CO_2 + 2H_2O
//! ```
//!
//! # Parser Implementation
//!
//! Hand-written lexer and recursive descent parser with one token of
//! lookahead. No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod printer;
pub mod symbols;

pub use ast::{Code, Node};
pub use lexer::{scan_tokens, LexError, LexErrorKind, Token, TokenKind, KEYWORDS};
pub use parse::{parse, ParseError};
pub use printer::print;
pub use symbols::SymbolTable;

use thiserror::Error;

/// Diagnostic switches read by the lexer and parser.
///
/// Neither switch changes what is produced; they only control the `tracing`
/// events emitted along the way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// Trace every character consumed and every token produced
    pub debug: bool,
    /// Trace every grammar rule the parser enters
    pub print_stack: bool,
}

/// Any failure of the source → AST pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// The 1-based line the error was reported on.
    pub fn line(&self) -> usize {
        match self {
            Error::Lex(err) => err.location.line,
            Error::Parse(err) => err.location.line,
        }
    }

    /// One-line report in the `[line N] Error...: message` form.
    pub fn report(&self) -> String {
        match self {
            Error::Lex(err) => format!("[line {}] Error: {}", self.line(), err.kind),
            Error::Parse(err) if err.found == TokenKind::Eof => format!(
                "[line {}] Error at end: expected {}",
                self.line(),
                err.expected
            ),
            Error::Parse(err) => format!(
                "[line {}] Error at '{}': expected {}",
                self.line(),
                err.lexeme,
                err.expected
            ),
        }
    }
}

/// Scan and parse `source` in one step.
pub fn parse_source(source: &str, symbols: &SymbolTable, options: &Options) -> Result<Code, Error> {
    let tokens = scan_tokens(source, symbols, options)?;
    Ok(parse(&tokens, options)?)
}
