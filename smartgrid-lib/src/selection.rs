//! Row selection.
//!
//! Rows are selected by their index in the current (post-filter) view. The
//! grid clears the selection whenever that view changes shape.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

/// How many rows may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Selection disabled.
    #[default]
    None,
    /// At most one row (radio style).
    Single,
    /// Any number of rows (checkbox style).
    Multi,
}

/// Selected row indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    mode: SelectionMode,
    selected: BTreeSet<usize>,
}

impl Selection {
    /// Creates an empty selection with the given mode.
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            selected: BTreeSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Toggles a row. Returns `true` if the selection changed.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.mode {
            SelectionMode::None => false,
            SelectionMode::Single => {
                let was_selected = self.selected.contains(&index);
                self.selected.clear();
                if !was_selected {
                    self.selected.insert(index);
                }
                true
            }
            SelectionMode::Multi => {
                if !self.selected.remove(&index) {
                    self.selected.insert(index);
                }
                true
            }
        }
    }

    /// Selects every index below `count` (multi mode only).
    pub fn select_all(&mut self, count: usize) -> bool {
        if self.mode != SelectionMode::Multi {
            return false;
        }
        self.selected = (0..count).collect();
        true
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.selected.iter().copied()
    }

    /// Drops indices at or beyond `count`, e.g. after the row set shrank.
    pub fn retain_below(&mut self, count: usize) {
        self.selected.retain(|&i| i < count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_mode_ignores_toggles() {
        let mut selection = Selection::new(SelectionMode::None);
        assert!(!selection.toggle(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_single_mode_replaces() {
        let mut selection = Selection::new(SelectionMode::Single);
        selection.toggle(1);
        selection.toggle(4);
        assert_eq!(selection.indices().collect::<Vec<_>>(), [4]);

        selection.toggle(4);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_multi_mode_accumulates() {
        let mut selection = Selection::new(SelectionMode::Multi);
        selection.toggle(5);
        selection.toggle(2);
        selection.toggle(5);
        assert_eq!(selection.indices().collect::<Vec<_>>(), [2]);

        selection.select_all(3);
        selection.retain_below(2);
        assert_eq!(selection.indices().collect::<Vec<_>>(), [0, 1]);
    }
}
