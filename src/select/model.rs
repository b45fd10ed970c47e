//! Selection model for the review phase
//!
//! Holds the updatable modules in display order together with a selected
//! flag per row. Filtering narrows the visible rows without touching the
//! selection of hidden ones.

use super::FilterPolicy;
use crate::domain::Module;
use std::collections::HashSet;

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// One row of the review list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// The module offered for upgrade
    pub module: Module,
    /// Whether the operator picked it
    pub selected: bool,
}

/// A page of visible rows
#[derive(Debug)]
pub struct Page<'a> {
    /// Zero-based page number
    pub number: usize,
    /// Number of pages in the current view (at least 1)
    pub count: usize,
    /// Rows with their 1-based position in the visible list
    pub rows: Vec<(usize, &'a ListItem)>,
}

/// Ordered, filterable, multi-select list of upgrade candidates
#[derive(Debug, Clone)]
pub struct SelectionModel {
    items: Vec<ListItem>,
    policy: FilterPolicy,
    query: String,
    page: usize,
    page_size: usize,
}

impl SelectionModel {
    /// Build the list from scan results
    ///
    /// Modules that are not updatable are dropped; a repeated identifier
    /// keeps its first record.
    pub fn new(modules: impl IntoIterator<Item = Module>, policy: FilterPolicy) -> Self {
        let mut seen = HashSet::new();
        let mut items: Vec<ListItem> = modules
            .into_iter()
            .filter(|m| m.updatable && seen.insert(m.identifier.clone()))
            .map(|module| ListItem {
                module,
                selected: false,
            })
            .collect();
        items.sort_by(|a, b| a.module.display_cmp(&b.module));

        Self {
            items,
            policy,
            query: String::new(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set rows per page (at least 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Number of rows, visible or not
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if there are no rows
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All rows in display order
    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    /// Current filter text
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Rows matching the filter, in display order
    pub fn visible(&self) -> Vec<&ListItem> {
        self.items
            .iter()
            .filter(|item| self.policy.matches(&item.module.identifier, &self.query))
            .collect()
    }

    /// Identifiers of the visible rows
    pub fn visible_identifiers(&self) -> Vec<String> {
        self.visible()
            .into_iter()
            .map(|item| item.module.identifier.clone())
            .collect()
    }

    /// Restrict the visible rows; resets paging
    pub fn set_filter(&mut self, query: impl Into<String>) {
        self.query = query.into().trim().to_string();
        self.page = 0;
    }

    /// Show every row again
    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    /// Flip the selection of one row; `None` if no such row
    pub fn toggle(&mut self, identifier: &str) -> Option<bool> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.module.identifier == identifier)?;
        item.selected = !item.selected;
        Some(item.selected)
    }

    /// Select all of `subset`, or deselect all of it if it is already
    /// entirely selected
    ///
    /// Returns the new state. Identifiers without a row are ignored.
    pub fn toggle_all(&mut self, subset: &[String]) -> bool {
        let wanted: HashSet<&str> = subset.iter().map(String::as_str).collect();
        let all_selected = self
            .items
            .iter()
            .filter(|item| wanted.contains(item.module.identifier.as_str()))
            .all(|item| item.selected);

        let state = !all_selected;
        for item in self
            .items
            .iter_mut()
            .filter(|item| wanted.contains(item.module.identifier.as_str()))
        {
            item.selected = state;
        }
        state
    }

    /// `toggle_all` over the rows currently visible
    pub fn toggle_all_visible(&mut self) -> bool {
        let visible = self.visible_identifiers();
        self.toggle_all(&visible)
    }

    /// Toggle rows by their 1-based position in the visible list
    ///
    /// Returns the identifiers that were toggled; out-of-range rows are
    /// skipped.
    pub fn toggle_rows(&mut self, rows: &[usize]) -> Vec<String> {
        let visible = self.visible_identifiers();
        let mut toggled = Vec::new();
        for &row in rows {
            let Some(identifier) = row.checked_sub(1).and_then(|i| visible.get(i)) else {
                continue;
            };
            if self.toggle(identifier).is_some() {
                toggled.push(identifier.clone());
            }
        }
        toggled
    }

    /// Select every row, hidden ones included
    pub fn select_all(&mut self) {
        for item in &mut self.items {
            item.selected = true;
        }
    }

    /// Number of selected rows
    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }

    /// Frozen copy of the selected modules in display order
    ///
    /// Returns `None` when nothing is selected; the caller stays in review.
    pub fn commit(&self) -> Option<Vec<Module>> {
        let selected: Vec<Module> = self
            .items
            .iter()
            .filter(|item| item.selected)
            .map(|item| item.module.clone())
            .collect();
        if selected.is_empty() {
            None
        } else {
            Some(selected)
        }
    }

    /// Number of pages in the current view
    pub fn page_count(&self) -> usize {
        self.visible().len().div_ceil(self.page_size).max(1)
    }

    /// Move to the next page; returns false on the last page
    pub fn next_page(&mut self) -> bool {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Move to the previous page; returns false on the first page
    pub fn prev_page(&mut self) -> bool {
        if self.page > 0 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Rows of the current page
    pub fn page(&self) -> Page<'_> {
        let count = self.page_count();
        let number = self.page.min(count - 1);
        let rows = self
            .visible()
            .into_iter()
            .enumerate()
            .skip(number * self.page_size)
            .take(self.page_size)
            .map(|(i, item)| (i + 1, item))
            .collect();
        Page {
            number,
            count,
            rows,
        }
    }
}
