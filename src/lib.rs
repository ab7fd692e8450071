//! # Introduction
//!
//! EsoReaction is a small language whose programs are chemical equations.
//! This crate is its front end: it scans source text against a table of
//! element symbols, parses the tokens into an AST, and renders the AST in a
//! canonical parenthesized form.  A terminal inspector built with
//! [ratatui](https://docs.rs/ratatui) steps through the token stream next to
//! the source and the syntax tree.
//!
//! ## Pipeline
//!
//! ```text
//! Element table → Lexer → Tokens → Parser → AST → Printer / TUI
//! ```
//!
//! 1. [`elements`] builds the [`parser::SymbolTable`], either the built-in
//!    periodic table or one read from a CSV file.
//! 2. [`parser`] tokenises the source, builds the AST and prints it.
//! 3. [`ui`] is the ratatui-based inspector; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use esoreaction::elements;
//! use esoreaction::parser::{parse_source, print, Options};
//!
//! let table = elements::periodic_table();
//! let code = parse_source("2H_2 + O_2 -> 2H_2O", &table, &Options::default()).unwrap();
//! assert_eq!(
//!     print(&code),
//!     "(; (-> (+ (term 2 (molecule (H 2))) (+ (term (molecule (O 2))))) \
//!      (+ (term 2 (molecule (H 2) (molecule (O)))))))"
//! );
//! ```

pub mod elements;
pub mod parser;
pub mod ui;
