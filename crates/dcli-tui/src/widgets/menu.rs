//! Cursor over a fixed set of choices

/// Menu cursor that wraps in both directions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceMenu<T> {
    choices: Vec<T>,
    cursor: usize,
}

impl<T> ChoiceMenu<T> {
    pub fn new(choices: Vec<T>) -> Self {
        Self { choices, cursor: 0 }
    }

    pub fn choices(&self) -> &[T] {
        &self.choices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&T> {
        self.choices.get(self.cursor)
    }

    pub fn next(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + 1) % self.choices.len();
        }
    }

    pub fn prev(&mut self) {
        if !self.choices.is_empty() {
            self.cursor = (self.cursor + self.choices.len() - 1) % self.choices.len();
        }
    }
}
