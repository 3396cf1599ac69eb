use std::path::{Path, PathBuf};

use crate::locator::ContentLocator;

use super::scan::PickerEntry;

/// Result of a finished pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(ContentLocator),
    Cancelled,
}

/// Selection state of an open picker.
pub struct Picker {
    root: PathBuf,
    entries: Vec<PickerEntry>,
    /// Index into `entries`.
    pub selected: usize,
    pub query: String,
}

impl Picker {
    pub fn new(root: PathBuf, entries: Vec<PickerEntry>) -> Self {
        Self {
            root,
            entries,
            selected: 0,
            query: String::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    /// Indices of entries matching the current query, in list order.
    pub fn visible(&self) -> Vec<usize> {
        let query = self.query.trim();
        (0..self.entries.len())
            .filter(|&i| fuzzy_match_positions(&self.entries[i].label, query).is_some())
            .collect()
    }

    /// Character positions of `entry` that match the query, for highlighting.
    pub fn match_positions(&self, entry: usize) -> Option<Vec<usize>> {
        fuzzy_match_positions(&self.entries[entry].label, self.query.trim())
    }

    pub fn next(&mut self) {
        let visible = self.visible();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(p) => visible[(p + 1) % visible.len()],
            None => visible[0],
        };
    }

    pub fn prev(&mut self) {
        let visible = self.visible();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(0) | None => visible[visible.len() - 1],
            Some(p) => visible[p - 1],
        };
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.ensure_selected_visible();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.ensure_selected_visible();
    }

    /// Finish the pick with the highlighted entry; an empty view cancels.
    pub fn pick(&self) -> PickOutcome {
        if !self.visible().contains(&self.selected) {
            return PickOutcome::Cancelled;
        }
        match ContentLocator::new(self.entries[self.selected].path.clone()) {
            Ok(locator) => PickOutcome::Picked(locator),
            Err(_) => PickOutcome::Cancelled,
        }
    }

    fn ensure_selected_visible(&mut self) {
        let visible = self.visible();
        if !visible.contains(&self.selected) {
            self.selected = visible.first().copied().unwrap_or(0);
        }
    }
}

/// Case-insensitive subsequence match of `query` in `label`. Returns the
/// matched character positions of `label` itself.
fn fuzzy_match_positions(label: &str, query: &str) -> Option<Vec<usize>> {
    let mut positions: Vec<usize> = Vec::new();
    let mut label_iter = label.chars().enumerate();

    for qc in query.chars() {
        loop {
            match label_iter.next() {
                Some((li, lc)) if lc.to_lowercase().eq(qc.to_lowercase()) => {
                    positions.push(li);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}
