use super::*;
use dcli_engine::format::format_size;

pub(super) const STATUS_BAR_HEIGHT: u16 = 6;

const HELP: [(&str, &str); 3] = [
    (
        "GENERAL",
        "↑/↓ Navigate • ctrl+c Exit • ctrl+r refresh • esc Back",
    ),
    (
        "CONTAINERS",
        "ctrl+f Search • ctrl+l Logs • ctrl+o Options • ctrl+e Attach • ctrl+s Stats • ctrl+t Top",
    ),
    (
        "IMAGES",
        "ctrl+b • NETWORKS ctrl+n • VOLUMES ctrl+v • STACKS ctrl+p",
    ),
];

pub(super) fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled("DockerVersion: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.engine_version.clone()),
        Span::styled("  CPUs: ", Style::default().fg(Color::DarkGray)),
        Span::raw(app.host.cpus.to_string()),
        Span::styled("  Memory: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format_size(app.host.memory_total)),
    ])];

    lines.push(match app.status_message {
        Some(ref message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(""),
    });

    for (section, keys) in HELP {
        lines.push(Line::from(vec![
            Span::styled(section, Style::default().fg(Color::Cyan).bold()),
            Span::raw(" "),
            Span::styled(keys, Style::default().fg(Color::Gray)),
        ]));
    }

    let bar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(bar, area);
}
