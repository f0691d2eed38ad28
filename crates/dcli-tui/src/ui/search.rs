use super::*;

pub(super) fn draw_search(frame: &mut Frame, kind: EntityKind, input: &TextInputState, area: Rect) {
    let lines = vec![
        Line::from(Span::styled(
            format!("Search {} by name", kind),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(input.value().to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "(esc to back)",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let prompt = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(prompt, area);

    // Border, then the "> " marker
    let typed = input.value()[..input.cursor()].chars().count() as u16;
    frame.set_cursor(area.x + 3 + typed, area.y + 3);
}
