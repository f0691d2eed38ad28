//! Reusable widget state for the dashboard

mod menu;
mod row_table;
mod text_input;

pub use menu::ChoiceMenu;
pub use row_table::RowTable;
pub use text_input::TextInputState;

use ratatui::layout::Rect;

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
