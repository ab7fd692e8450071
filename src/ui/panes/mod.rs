//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source text with notation highlighting and the current token's line
//! - [`tokens`]: The scanned token stream with the current token selected
//! - [`tree`]: Indented syntax tree, or the error that stopped the pipeline
//! - [`status`]: Status bar with keybindings and stepping position
//!
//! Each pane module exports a primary `render_*_pane()` function plus the
//! scroll state it keeps between frames.

pub mod source;
pub mod status;
pub mod tokens;
pub mod tree;

// Re-export render functions for convenience
pub use source::{render_source_pane, SourceScrollState};
pub use status::render_status_bar;
pub use tokens::{render_tokens_pane, TokenScrollState};
pub use tree::{render_tree_pane, tree_rows, TreeRow};
