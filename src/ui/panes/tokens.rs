//! Token stream pane rendering

use crate::parser::lexer::{LexError, Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph, Wrap},
    Frame,
};

/// Scroll state for the token pane
#[derive(Debug)]
pub struct TokenScrollState {
    pub offset: usize,
    /// Keep the current token in view; cleared by manual scrolling
    pub follow: bool,
}

impl Default for TokenScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

fn kind_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Element => Style::default().fg(DEFAULT_THEME.element),
        TokenKind::Name => Style::default().fg(DEFAULT_THEME.group),
        TokenKind::Coeff | TokenKind::Subscript => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::Eof => Style::default().fg(DEFAULT_THEME.comment),
        TokenKind::EquSep | TokenKind::Equal | TokenKind::Arrow | TokenKind::Plus => {
            Style::default().fg(DEFAULT_THEME.primary)
        }
    }
}

/// Render the token pane.
///
/// When scanning failed there are no tokens; the lexical error is shown instead.
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    lex_error: Option<&LexError>,
    current: usize,
    is_focused: bool,
    scroll_state: &mut TokenScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" Tokens ({}) ", tokens.len()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(err) = lex_error {
        let paragraph = Paragraph::new(err.to_string())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(DEFAULT_THEME.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let total_items = tokens.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    if scroll_state.follow {
        if current < scroll_state.offset {
            scroll_state.offset = current;
        } else if current >= scroll_state.offset + visible_height {
            scroll_state.offset = current + 1 - visible_height;
        }
    }

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_items - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let items: Vec<ListItem> = tokens
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, token)| {
            let marker = if idx == current { "▶ " } else { "  " };
            let mut line = Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::styled(token.to_string(), kind_style(token.kind)),
            ]);
            if idx == current {
                line = line.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                );
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
