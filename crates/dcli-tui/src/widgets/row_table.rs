//! Entity table state: projected rows, the active filter and a selection
//! kept in sync with ratatui's `TableState`.

use dcli_core::Row;
use ratatui::widgets::TableState;

#[derive(Debug, Clone, Default)]
pub struct RowTable {
    rows: Vec<Row>,
    filter: String,
    state: TableState,
}

impl RowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows.
    ///
    /// The selection follows the previously selected entity when it is still
    /// listed, otherwise it is clamped to the new length.
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        let previous_key = self.selected_key().map(str::to_string);
        let previous_index = self.state.selected().unwrap_or(0);
        self.rows = rows;

        if self.rows.is_empty() {
            self.state.select(None);
            return;
        }

        let index = previous_key
            .and_then(|key| self.rows.iter().position(|r| r.key == key))
            .unwrap_or_else(|| previous_index.min(self.rows.len() - 1));
        self.state.select(Some(index));
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Filter text the rows were projected with
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn selected_row(&self) -> Option<&Row> {
        self.state.selected().and_then(|i| self.rows.get(i))
    }

    /// Snapshot key of the selected entity
    pub fn selected_key(&self) -> Option<&str> {
        self.selected_row().map(|r| r.key.as_str())
    }

    /// Move down one row, stopping at the last row
    pub fn select_next(&mut self) {
        self.page_down(1);
    }

    /// Move up one row, stopping at the first row
    pub fn select_prev(&mut self) {
        self.page_up(1);
    }

    /// Jump `step` rows down, stopping at the last row
    pub fn page_down(&mut self, step: usize) {
        if let Some(i) = self.state.selected() {
            let last = self.rows.len().saturating_sub(1);
            self.state.select(Some((i + step).min(last)));
        }
    }

    /// Jump `step` rows up, stopping at the first row
    pub fn page_up(&mut self, step: usize) {
        if let Some(i) = self.state.selected() {
            self.state.select(Some(i.saturating_sub(step)));
        }
    }

    pub fn select_first(&mut self) {
        if !self.rows.is_empty() {
            self.state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.rows.is_empty() {
            self.state.select(Some(self.rows.len() - 1));
        }
    }

    /// Table state for `render_stateful_widget`
    pub fn state_mut(&mut self) -> &mut TableState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str) -> Row {
        Row {
            key: key.to_string(),
            cells: vec![key.to_string()],
        }
    }

    fn table(keys: &[&str]) -> RowTable {
        let mut table = RowTable::new();
        table.set_rows(keys.iter().map(|k| row(k)).collect());
        table
    }

    #[test]
    fn test_first_row_selected_after_load() {
        let table = table(&["a", "b"]);
        assert_eq!(table.selected_index(), Some(0));
        assert_eq!(table.selected_key(), Some("a"));
    }

    #[test]
    fn test_empty_table_has_no_selection() {
        let mut table = table(&[]);
        table.select_next();
        table.select_prev();
        assert_eq!(table.selected_index(), None);
        assert!(table.selected_row().is_none());
    }

    #[test]
    fn test_navigation_stops_at_the_ends() {
        let mut table = table(&["a", "b", "c"]);
        table.select_prev();
        assert_eq!(table.selected_key(), Some("a"));
        table.select_next();
        table.select_next();
        table.select_next();
        assert_eq!(table.selected_key(), Some("c"));
    }

    #[test]
    fn test_paging_clamps() {
        let mut table = table(&["a", "b", "c", "d"]);
        table.page_down(10);
        assert_eq!(table.selected_key(), Some("d"));
        table.page_up(2);
        assert_eq!(table.selected_key(), Some("b"));
        table.page_up(10);
        assert_eq!(table.selected_key(), Some("a"));
        table.select_last();
        assert_eq!(table.selected_key(), Some("d"));
        table.select_first();
        assert_eq!(table.selected_key(), Some("a"));
    }

    #[test]
    fn test_selection_follows_key_across_reorder() {
        let mut table = table(&["a", "b", "c"]);
        table.select_next();
        table.set_rows(vec![row("c"), row("a"), row("b")]);
        assert_eq!(table.selected_key(), Some("b"));
    }

    #[test]
    fn test_selection_clamps_when_key_disappears() {
        let mut table = table(&["a", "b", "c"]);
        table.select_last();
        table.set_rows(vec![row("a")]);
        assert_eq!(table.selected_key(), Some("a"));
    }
}
