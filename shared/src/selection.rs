//! Day-cell selection state.
//!
//! Plain clicks select a single day. Ctrl/Cmd clicks toggle one day while the
//! rest of the selection stays as it is. Dates are unique and keep click order.

use chrono::NaiveDate;

/// Whether the click carried the Ctrl (or Cmd on macOS) modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMode {
    Single,
    Toggle,
}

impl ClickMode {
    pub fn from_modifiers(ctrl_key: bool, meta_key: bool) -> Self {
        if ctrl_key || meta_key { ClickMode::Toggle } else { ClickMode::Single }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    dates: Vec<NaiveDate>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn click(&mut self, date: NaiveDate, mode: ClickMode) {
        match mode {
            ClickMode::Single => self.select_only(date),
            ClickMode::Toggle => self.toggle(date),
        }
    }

    /// Clear everything and select just `date`
    pub fn select_only(&mut self, date: NaiveDate) {
        self.dates.clear();
        self.dates.push(date);
    }

    pub fn toggle(&mut self, date: NaiveDate) {
        if let Some(index) = self.dates.iter().position(|d| *d == date) {
            self.dates.remove(index);
        } else {
            self.dates.push(date);
        }
    }

    pub fn clear(&mut self) {
        self.dates.clear();
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
