use super::*;

/// Scrollable markdown document
pub(super) fn draw_document(frame: &mut Frame, label: &str, view: &mut DocView, area: Rect) {
    let text = markdown::render(&view.markdown);
    let inner_height = area.height.saturating_sub(2) as usize;
    let total_lines = text.lines.len();
    view.scroll = view.scroll.min(total_lines.saturating_sub(inner_height));

    let document = Paragraph::new(text)
        .scroll((view.scroll as u16, 0))
        .block(
            Block::default()
                .title(format!(" {}: {} ", label, view.title))
                .title_style(Style::default().fg(Color::Cyan).bold())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(document, area);

    draw_scrollbar(frame, area, total_lines, inner_height, view.scroll);
}

/// Process table of a container
pub(super) fn draw_top(frame: &mut Frame, view: &mut TopView, area: Rect) {
    let block = Block::default()
        .title(format!(" Top: {} ", view.container))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let processes = &view.processes;
    if processes.processes.is_empty() {
        let empty = Paragraph::new("No processes running.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Header and its margin take two lines
    let visible = area.height.saturating_sub(4) as usize;
    let total = processes.processes.len();
    view.scroll = view.scroll.min(total.saturating_sub(visible));

    let last = processes.titles.len().saturating_sub(1);
    let widths: Vec<Constraint> = processes
        .titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            if i == last {
                return Constraint::Min(10);
            }
            let widest = processes
                .processes
                .iter()
                .filter_map(|p| p.get(i))
                .map(|v| v.chars().count())
                .max()
                .unwrap_or(0)
                .max(title.chars().count());
            Constraint::Length(widest.min(20) as u16)
        })
        .collect();

    let header = Row::new(processes.titles.iter().map(|t| Cell::from(t.clone())))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let rows: Vec<Row> = processes
        .processes
        .iter()
        .skip(view.scroll)
        .map(|p| Row::new(p.iter().map(|v| Cell::from(v.clone()))))
        .collect();

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);

    draw_scrollbar(frame, area, total, visible, view.scroll);
}
