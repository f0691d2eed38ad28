//! Markdown to terminal text for detail documents
//!
//! Only the subset the detail renderer emits is understood: headings,
//! `---` rules, pipe tables and plain lines.

use ratatui::prelude::*;

const RULE_WIDTH: usize = 48;
const COLUMN_GAP: &str = "  ";

/// Render a document into styled lines
pub fn render(markdown: &str) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut table: Vec<Vec<String>> = Vec::new();

    for raw in markdown.lines() {
        let trimmed = raw.trim();

        if trimmed.starts_with('|') {
            let cells = split_cells(trimmed);
            if !is_separator_row(&cells) {
                table.push(cells);
            }
            continue;
        }

        if !table.is_empty() {
            lines.extend(render_table(&std::mem::take(&mut table)));
        }

        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches(|c| c == '#' || c == ' ').trim_end();
            lines.push(Line::from(Span::styled(
                heading.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        } else if trimmed == "---" {
            lines.push(Line::from(Span::styled(
                "─".repeat(RULE_WIDTH),
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            lines.push(Line::from(trimmed.to_string()));
        }
    }

    if !table.is_empty() {
        lines.extend(render_table(&table));
    }

    Text::from(lines)
}

/// Cells of a `| a | b |` row, honoring `\|` escapes
fn split_cells(row: &str) -> Vec<String> {
    let inner = row.strip_prefix('|').unwrap_or(row);
    let inner = inner.strip_suffix('|').unwrap_or(inner);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_separator_row(cells: &[String]) -> bool {
    !cells.is_empty()
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

/// First row is the header
fn render_table(rows: &[Vec<String>]) -> Vec<Line<'static>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let style = if index == 0 {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = Vec::with_capacity(columns * 2);
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                if i > 0 {
                    spans.push(Span::raw(COLUMN_GAP));
                }
                let padded = if i + 1 == columns {
                    cell.to_string()
                } else {
                    format!("{:<width$}", cell, width = *width)
                };
                spans.push(Span::styled(padded, style));
            }
            Line::from(spans)
        })
        .collect()
}
