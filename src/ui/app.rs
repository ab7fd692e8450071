//! Inspector application state and logic

use crate::parser::ast::{Code, SourceLocation};
use crate::parser::lexer::{scan_tokens, Token};
use crate::parser::parse::parse;
use crate::parser::symbols::SymbolTable;
use crate::parser::{Error, Options};
use crate::ui::panes::{self, SourceScrollState, TokenScrollState, TreeRow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Tree,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> tree)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }
}

/// The inspector state
pub struct App {
    /// The program text being inspected
    pub source: String,

    /// Table used for scanning; also supplies element names to the tree pane
    pub symbols: SymbolTable,

    /// Scanned tokens, empty when scanning failed
    pub tokens: Vec<Token>,

    /// The parsed program, or the error that stopped the pipeline
    pub result: Result<Code, Error>,

    /// Flattened syntax tree, empty on error
    pub tree: Vec<TreeRow>,

    /// Index of the token being inspected
    pub position: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    pub source_scroll: SourceScrollState,
    pub token_scroll: TokenScrollState,
    pub tree_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Scan and parse `source`, keeping every intermediate result for display
    pub fn new(source: String, symbols: SymbolTable, options: &Options) -> Self {
        let (tokens, result) = match scan_tokens(&source, &symbols, options) {
            Ok(tokens) => {
                let result = parse(&tokens, options).map_err(Error::from);
                (tokens, result)
            }
            Err(err) => (Vec::new(), Err(Error::from(err))),
        };

        let tree = match &result {
            Ok(code) => panes::tree_rows(code, &symbols),
            Err(_) => Vec::new(),
        };

        let status_message = match &result {
            Ok(code) => format!("Parsed {} equation(s)", code.equations().count()),
            Err(err) => err.report(),
        };

        App {
            source,
            symbols,
            tokens,
            result,
            tree,
            position: 0,
            focused_pane: FocusedPane::Source,
            source_scroll: SourceScrollState::default(),
            token_scroll: TokenScrollState::default(),
            tree_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// The token being inspected, if scanning succeeded
    pub fn current_token(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Line to highlight: the current token's, else the error's
    pub fn current_line(&self) -> usize {
        self.current_token()
            .map(Token::line)
            .or_else(|| self.error_line())
            .unwrap_or(0)
    }

    pub fn error_line(&self) -> Option<usize> {
        self.result.as_ref().err().map(Error::line)
    }

    fn current_location(&self) -> Option<SourceLocation> {
        self.current_token().map(|token| token.location)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Tokens (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[0]);

        let current_line = self.current_line();
        let current_location = self.current_location();
        let error_line = self.error_line();

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source,
            current_line,
            error_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let lex_error = match &self.result {
            Err(Error::Lex(err)) => Some(err),
            _ => None,
        };
        panes::render_tokens_pane(
            frame,
            left_rows[1],
            &self.tokens,
            lex_error,
            self.position,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_scroll,
        );

        let outcome = match &self.result {
            Ok(_) => Ok(self.tree.as_slice()),
            Err(err) => Err(err),
        };
        panes::render_tree_pane(
            frame,
            columns[1],
            outcome,
            current_location,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.position,
            self.tokens.len(),
            self.result.is_err(),
        );
    }

    /// Handle keyboard events
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Left => self.step_backward(),
            KeyCode::Right => self.step_forward(),
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Tokens => {
                    self.token_scroll.follow = false;
                    self.token_scroll.offset = self.token_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Tree => {
                    self.tree_scroll = self.tree_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Source => {
                    // Scrolling down makes the current line move up visually
                    if let Some(row) = self.source_scroll.target_line_row {
                        self.source_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Tokens => {
                    self.token_scroll.follow = false;
                    self.token_scroll.offset = self.token_scroll.offset.saturating_add(1);
                }
                FocusedPane::Tree => {
                    self.tree_scroll = self.tree_scroll.saturating_add(1);
                }
            },
            KeyCode::Enter => {
                self.jump_to(self.tokens.len().saturating_sub(1));
                self.status_message = "Jumped to last token".to_string();
            }
            KeyCode::Backspace => {
                self.jump_to(0);
                self.status_message = "Jumped to first token".to_string();
            }
            _ => {}
        }
    }

    fn jump_to(&mut self, position: usize) {
        self.position = position;
        self.token_scroll.follow = true;
    }

    /// Step to the next token
    fn step_forward(&mut self) {
        if self.position + 1 < self.tokens.len() {
            self.jump_to(self.position + 1);
            self.status_message = self.describe_current();
        } else {
            self.status_message = "Cannot step forward: at end of input".to_string();
        }
    }

    /// Step to the previous token
    fn step_backward(&mut self) {
        if self.position > 0 {
            self.jump_to(self.position - 1);
            self.status_message = self.describe_current();
        } else {
            self.status_message = "Cannot step backward: at first token".to_string();
        }
    }

    fn describe_current(&self) -> String {
        match self.current_token() {
            Some(token) => format!("{} at column {}", token, token.location.column),
            None => String::new(),
        }
    }
}
