use super::*;
use std::fmt::Display;

fn choice_lines<T: Display>(choices: &[T], cursor: usize) -> Vec<Line<'static>> {
    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            if i == cursor {
                Line::from(Span::styled(
                    format!("(•) {}", choice),
                    Style::default().fg(Color::Yellow).bold(),
                ))
            } else {
                Line::from(format!("( ) {}", choice))
            }
        })
        .collect()
}

fn menu_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

fn footer(lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "(press Esc to go back)",
        Style::default().fg(Color::DarkGray),
    )));
}

fn title_line(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).bold(),
    ))
}

pub(super) fn draw_options(frame: &mut Frame, options: &OptionsMenu, area: Rect) {
    let mut lines = vec![title_line(&options.title), Line::from("")];
    lines.extend(choice_lines(options.menu.choices(), options.menu.cursor()));

    if let Some(ref error) = options.error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )));
    }
    footer(&mut lines);

    let menu = Paragraph::new(lines)
        .block(menu_block())
        .wrap(Wrap { trim: false });
    frame.render_widget(menu, area);
}

pub(super) fn draw_shell_choice(frame: &mut Frame, choice: &ShellChoice, area: Rect) {
    let mut lines = vec![title_line(&choice.title), Line::from("")];
    lines.extend(choice_lines(choice.menu.choices(), choice.menu.cursor()));
    footer(&mut lines);

    frame.render_widget(Paragraph::new(lines).block(menu_block()), area);
}

/// Full-screen panel for a failed shell attach
pub(super) fn draw_exec_error(frame: &mut Frame, message: &str, area: Rect) {
    let width = (message.chars().count() as u16 + 12).min(area.width);
    let panel_area = centered_rect(width, 7, area);
    frame.render_widget(Clear, panel_area);

    let panel = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled("Esc to go back", Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(" Exec ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(panel, panel_area);
}
