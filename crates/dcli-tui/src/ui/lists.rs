use super::*;
use dcli_core::{CONTAINER_COLUMNS, IMAGE_COLUMNS, NETWORK_COLUMNS, STACK_COLUMNS, VOLUME_COLUMNS};

fn plural_title(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Container => "Containers",
        EntityKind::Image => "Images",
        EntityKind::Network => "Networks",
        EntityKind::Volume => "Volumes",
        EntityKind::Stack => "Stacks",
    }
}

/// Headers and fixed column widths of each list
fn columns(kind: EntityKind) -> (&'static [&'static str], Vec<Constraint>) {
    let (headers, widths): (&'static [&'static str], Vec<u16>) = match kind {
        EntityKind::Container => (&CONTAINER_COLUMNS, vec![20, 30, 30, 20, 20, 20]),
        EntityKind::Image => (&IMAGE_COLUMNS, vec![20, 40, 20, 20]),
        EntityKind::Network => (&NETWORK_COLUMNS, vec![20, 40, 20, 20, 20]),
        EntityKind::Volume => (&VOLUME_COLUMNS, vec![20, 10, 10, 40, 25]),
        EntityKind::Stack => (&STACK_COLUMNS, vec![50, 50]),
    };
    (headers, widths.into_iter().map(Constraint::Length).collect())
}

/// Cells carrying ANSI colors (the state glyph) are converted to styled text
fn cell(value: &str) -> Cell<'static> {
    if value.contains('\x1b') {
        if let Ok(text) = value.into_text() {
            return Cell::from(text);
        }
    }
    Cell::from(value.to_string())
}

pub(super) fn draw_list(frame: &mut Frame, kind: EntityKind, table: &mut RowTable, area: Rect) {
    let title = if table.filter().is_empty() {
        format!(" {} ", plural_title(kind))
    } else {
        format!(" {} (filter: {}) ", plural_title(kind), table.filter())
    };
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL);

    if table.is_empty() {
        let empty = Paragraph::new(format!("No {} found.", plural_title(kind).to_lowercase()))
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let (headers, widths) = columns(kind);
    let header = Row::new(headers.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = table
        .rows()
        .iter()
        .map(|row| Row::new(row.cells.iter().map(|c| cell(c))))
        .collect();

    let widget = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White))
        .highlight_symbol("▶ ");

    frame.render_stateful_widget(widget, area, table.state_mut());
}
