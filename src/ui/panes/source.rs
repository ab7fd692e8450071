//! Source pane rendering with notation highlighting
//!
//! Displays the program text with line numbers, highlights the line of the
//! token being inspected and paints the line of a lexical or syntax error red.
//!
//! The highlighter is a character-class scan over each line; it never consults
//! the symbol table, so it also colors text that the lexer would reject.

use crate::parser::lexer::KEYWORDS;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split one source line into styled spans.
pub(crate) fn highlight_source_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let end_of = |i: usize| chars.get(i).map_or(line.len(), |(offset, _)| *offset);
    let mut i = 0;

    while i < chars.len() {
        let (start, c) = chars[i];

        let (len, style) = if c == '(' {
            // Group name, parentheses included
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != ')' {
                end += 1;
            }
            if end < chars.len() {
                end += 1;
            }
            (end - i, Style::default().fg(DEFAULT_THEME.group))
        } else if c == '_' || c.is_ascii_digit() {
            // Subscript or coefficient
            let mut end = i + 1;
            while end < chars.len() && chars[end].1.is_ascii_digit() {
                end += 1;
            }
            (end - i, Style::default().fg(DEFAULT_THEME.number))
        } else if c.is_ascii_alphabetic() {
            let word_end = chars[i..]
                .iter()
                .position(|(_, ch)| !ch.is_ascii_alphabetic())
                .map_or(chars.len(), |n| i + n);
            let word = &line[start..end_of(word_end)];
            if let Some(keyword) = KEYWORDS.iter().find(|k| word.starts_with(**k)) {
                (
                    keyword.len(),
                    Style::default()
                        .fg(DEFAULT_THEME.keyword)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                (word_end - i, Style::default().fg(DEFAULT_THEME.element))
            }
        } else if c == '-' && chars.get(i + 1).is_some_and(|(_, next)| *next == '>') {
            (2, Style::default().fg(DEFAULT_THEME.primary))
        } else {
            let style = match c {
                '=' | '+' | ';' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            (1, style)
        };

        spans.push(Span::styled(&line[start..end_of(i + len)], style));
        i += len;
    }

    Line::from(spans)
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to (None until the first render)
    pub target_line_row: Option<usize>,
}

/// Render the source pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source: &str,
    current_line: usize,
    error_line: Option<usize>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();

    // Account for borders (2), min 1
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    // Keep the current line at the target visual row
    if current_line > 0 && current_line <= total_lines {
        scroll_state.offset = (current_line - 1).saturating_sub(target_row);

        if total_lines > visible_height {
            let max_scroll = total_lines - visible_height;
            scroll_state.offset = scroll_state.offset.min(max_scroll);
        } else {
            scroll_state.offset = 0;
        }
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);
            let is_current = line_num == current_line;
            let line_num_str = format!("{:4} ", line_num);

            let mut content_line = highlight_source_line(line);

            let num_style = if is_error {
                // White text on red for the error line
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content_line.spans {
                    span.style = error_style;
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                let current_style = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(current_style);
                }
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut final_spans = vec![Span::styled(line_num_str, num_style)];
            final_spans.extend(content_line.spans);

            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
