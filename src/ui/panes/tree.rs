//! Syntax tree pane rendering

use crate::parser::ast::{Code, Node, SourceLocation};
use crate::parser::symbols::SymbolTable;
use crate::parser::Error;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// One line of the indented tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    pub label: String,
    /// Location of the token this row shows, for rows that show one
    pub location: Option<SourceLocation>,
}

/// Flatten the tree under `code` into display rows, parents first.
pub fn tree_rows(code: &Code, symbols: &SymbolTable) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut pending = vec![(Node::Code(code), 0)];

    while let Some((node, depth)) = pending.pop() {
        rows.push(row(node, depth, symbols));
        for child in node.children().into_iter().rev() {
            pending.push((child, depth + 1));
        }
    }

    rows
}

fn row(node: Node<'_>, depth: usize, symbols: &SymbolTable) -> TreeRow {
    let (label, location) = match node {
        Node::Code(_) => ("Code".to_string(), None),
        Node::Equation(equation) => (
            format!("Equation {}", equation.operator.lexeme),
            Some(equation.operator.location),
        ),
        Node::Reagent(_) => ("Reagent".to_string(), None),
        Node::Term(term) => match &term.coefficient {
            Some(coefficient) => (format!("Term ×{}", coefficient.lexeme), Some(coefficient.location)),
            None => ("Term".to_string(), None),
        },
        Node::Molecule(_) => ("Molecule".to_string(), None),
        Node::Element(element) if element.is_group() => (
            format!("Group ({})", element.symbol.lexeme),
            Some(element.symbol.location),
        ),
        Node::Element(element) => {
            let symbol = &element.symbol.lexeme;
            let label = match symbols.name_of(symbol) {
                Some(name) => format!("Element {} ({})", symbol, name),
                None => format!("Element {}", symbol),
            };
            (label, Some(element.symbol.location))
        }
        Node::Subscript(subscript) => (
            format!("Subscript {}", subscript.count.lexeme),
            Some(subscript.count.location),
        ),
    };

    TreeRow {
        depth,
        label,
        location,
    }
}

/// Render the syntax tree pane, or the pipeline error in its place
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    outcome: Result<&[TreeRow], &Error>,
    current: Option<SourceLocation>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let rows = match outcome {
        Ok(rows) => rows,
        Err(err) => {
            let paragraph = Paragraph::new(vec![
                Line::from(Span::styled(
                    err.report(),
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    err.to_string(),
                    Style::default().fg(DEFAULT_THEME.comment),
                )),
            ])
            .block(block)
            .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if rows.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(rows.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = rows
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let style = if row.location.is_some() && row.location == current {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else if row.location.is_some() {
                Style::default().fg(DEFAULT_THEME.fg)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            Line::from(vec![Span::raw(indent), Span::styled(row.label.as_str(), style)])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::periodic_table;
    use crate::parser::{parse_source, Options};

    #[test]
    fn test_tree_rows() {
        let symbols = periodic_table();
        let code = parse_source("2H_2 = (OH)", &symbols, &Options::default()).unwrap();
        let rows = tree_rows(&code, &symbols);

        let labels: Vec<(usize, &str)> = rows
            .iter()
            .map(|row| (row.depth, row.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (0, "Code"),
                (1, "Equation ="),
                (2, "Reagent"),
                (3, "Term ×2"),
                (4, "Molecule"),
                (5, "Element H (Hydrogen)"),
                (6, "Subscript 2"),
                (2, "Reagent"),
                (3, "Term"),
                (4, "Molecule"),
                (5, "Group (OH)"),
            ]
        );
    }

    #[test]
    fn test_tree_rows_carry_token_locations() {
        let symbols = periodic_table();
        let code = parse_source("H\n-> O", &symbols, &Options::default()).unwrap();
        let rows = tree_rows(&code, &symbols);

        let equation = rows.iter().find(|row| row.label == "Equation ->").unwrap();
        assert_eq!(equation.location, Some(SourceLocation::new(2, 1)));
        let oxygen = rows.iter().find(|row| row.label == "Element O (Oxygen)").unwrap();
        assert_eq!(oxygen.location, Some(SourceLocation::new(2, 4)));
        assert!(rows[0].location.is_none());
    }

    #[test]
    fn test_tree_rows_without_names() {
        let symbols = SymbolTable::from_symbols(["H"]);
        let code = parse_source("H = heat", &symbols, &Options::default()).unwrap();
        let labels: Vec<String> = tree_rows(&code, &symbols)
            .into_iter()
            .map(|row| row.label)
            .collect();
        assert!(labels.contains(&"Element H".to_string()));
        assert!(labels.contains(&"Element heat".to_string()));
    }

    #[test]
    fn test_tree_rows_long_molecule() {
        let symbols = SymbolTable::from_symbols(["H"]);
        let source = "H".repeat(50_000) + " = H";
        let code = parse_source(&source, &symbols, &Options::default()).unwrap();
        let rows = tree_rows(&code, &symbols);

        assert_eq!(rows.len(), 4 + 2 * 50_000 + 4);
        assert_eq!(rows.last().map(|row| row.label.as_str()), Some("Element H"));
    }
}
