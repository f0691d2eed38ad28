//! UI rendering for the dashboard

mod document;
mod lists;
mod logs;
mod menus;
mod search;
mod status_bar;

use crate::app::App;
use crate::markdown;
use crate::router::{DocView, LogView, OptionsMenu, Screen, ShellChoice, TopView};
use crate::widgets::{centered_rect, RowTable, TextInputState};
use ansi_to_tui::IntoText;
use dcli_core::EntityKind;
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Table, Wrap,
    },
};

use document::*;
use lists::*;
use logs::*;
use menus::*;
use search::*;
use status_bar::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                    // Screen
            Constraint::Length(STATUS_BAR_HEIGHT), // Status bar
        ])
        .split(frame.size());
    let area = chunks[0];
    let kind = app.screen.kind();

    if app.screen.is_list() {
        draw_list(frame, kind, app.table_mut(kind), area);
    }

    match &mut app.screen {
        Screen::ContainerList
        | Screen::ImageList
        | Screen::NetworkList
        | Screen::VolumeList
        | Screen::StackList => {}
        Screen::ContainerSearch(input)
        | Screen::ImageSearch(input)
        | Screen::NetworkSearch(input)
        | Screen::VolumeSearch(input) => draw_search(frame, kind, input, area),
        Screen::ContainerDetail(view)
        | Screen::ImageDetail(view)
        | Screen::NetworkDetail(view)
        | Screen::VolumeDetail(view)
        | Screen::StackDetail(view) => draw_document(frame, kind_label(kind), view, area),
        Screen::ContainerStats(view) => draw_document(frame, "Stats", view, area),
        Screen::ContainerLogs(view) => draw_logs(frame, view, area),
        Screen::ContainerTop(view) => draw_top(frame, view, area),
        Screen::ContainerOptions(menu)
        | Screen::ImageOptions(menu)
        | Screen::NetworkOptions(menu)
        | Screen::VolumeOptions(menu) => draw_options(frame, menu, area),
        Screen::ContainerExecShellChoice(choice) => draw_shell_choice(frame, choice, area),
        Screen::ExecError(message) => draw_exec_error(frame, message, area),
    }

    draw_status_bar(frame, app, chunks[1]);
}

/// Capitalized singular name of a kind
fn kind_label(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Container => "Container",
        EntityKind::Image => "Image",
        EntityKind::Network => "Network",
        EntityKind::Volume => "Volume",
        EntityKind::Stack => "Stack",
    }
}

/// Vertical scrollbar on the right border of `area`
fn draw_scrollbar(frame: &mut Frame, area: Rect, total_lines: usize, visible: usize, position: usize) {
    if total_lines <= visible {
        return;
    }

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(Some("▲"))
        .end_symbol(Some("▼"));
    let mut scrollbar_state =
        ScrollbarState::new(total_lines.saturating_sub(visible)).position(position);

    let scrollbar_area = Rect {
        x: area.x + area.width.saturating_sub(1),
        y: area.y + 1,
        width: 1,
        height: area.height.saturating_sub(2),
    };
    frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}
