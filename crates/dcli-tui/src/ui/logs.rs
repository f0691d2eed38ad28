use super::*;

/// Log viewer, newest line first
pub(super) fn draw_logs(frame: &mut Frame, view: &mut LogView, area: Rect) {
    let inner_height = area.height.saturating_sub(2) as usize;
    let total_lines = view.lines.len();
    view.scroll = view.scroll.min(total_lines.saturating_sub(inner_height));

    let text: Vec<Line> = view
        .lines
        .iter()
        .enumerate()
        .skip(view.scroll)
        .take(inner_height)
        .map(|(i, line)| {
            Line::from(vec![
                Span::styled(format!("{:>5} ", i + 1), Style::default().fg(Color::DarkGray)),
                Span::raw(line.as_str()),
            ])
        })
        .collect();

    let scroll_info = if total_lines > 0 {
        let percent = if total_lines <= inner_height {
            100
        } else {
            ((view.scroll + inner_height).min(total_lines) * 100) / total_lines
        };
        format!(
            " Logs: {} [{}/{}] {}% ",
            view.container,
            view.scroll + 1,
            total_lines,
            percent
        )
    } else {
        format!(" Logs: {} (empty) ", view.container)
    };

    let logs = Paragraph::new(text).block(
        Block::default()
            .title(scroll_info)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(logs, area);

    draw_scrollbar(frame, area, total_lines, inner_height, view.scroll);
}
