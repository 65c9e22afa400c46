// ☑️ Selection Tracker - ID-keyed selection, stable across paging
//
// Selection is keyed by referral id, never by row position, so it survives
// filtering, sorting and page changes. Page-level bulk toggles only ever
// touch the ids visible on that page. "Everything on this page selected" is
// recomputed per render because paging changes which ids are on the page.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============================================================================
// SELECTION SET
// ============================================================================

/// Set of selected BEL ids, owned by the UI-state layer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: HashSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        SelectionSet { ids: HashSet::new() }
    }

    pub fn add(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Checkbox toggle for a single row
    pub fn toggle(&mut self, id: &str, checked: bool) {
        if checked {
            self.add(id);
        } else {
            self.remove(id);
        }
    }

    pub fn has(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected count, what the "N selected" label shows
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Header-checkbox toggle: membership changes only for the ids on the
    /// current page; ids off the page are never added or removed.
    pub fn select_all_on_page(&mut self, page_ids: &[String], checked: bool) {
        for id in page_ids {
            self.toggle(id, checked);
        }
    }

    /// Header-checkbox state: every id on the page is selected.
    /// False for an empty page. Recomputed per call, never cached.
    pub fn all_selected_on_page(&self, page_ids: &[String]) -> bool {
        !page_ids.is_empty() && page_ids.iter().all(|id| self.has(id))
    }

    /// Sorted snapshot of selected ids (deterministic render order)
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ids.iter().cloned().collect();
        ids.sort();
        ids
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn page(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_add_remove_has() {
        let mut selection = SelectionSet::new();
        selection.add("TW001");
        selection.add("US002");

        assert!(selection.has("TW001"));
        assert!(!selection.has("JP003"));
        assert_eq!(selection.len(), 2);

        selection.remove("TW001");
        assert!(!selection.has("TW001"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_toggle() {
        let mut selection = SelectionSet::new();
        selection.toggle("TW001", true);
        assert!(selection.has("TW001"));
        selection.toggle("TW001", false);
        assert!(!selection.has("TW001"));
    }

    #[test]
    fn test_select_all_on_page_touches_only_page_ids() {
        let mut selection = SelectionSet::new();
        selection.add("OFF1");

        let current_page = page(&["TW001", "US002"]);
        selection.select_all_on_page(&current_page, true);

        assert!(selection.has("TW001"));
        assert!(selection.has("US002"));
        assert!(selection.has("OFF1"));

        selection.select_all_on_page(&current_page, false);
        assert!(!selection.has("TW001"));
        assert!(!selection.has("US002"));

        // Selection off the page is untouched by the round trip
        assert!(selection.has("OFF1"));
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_all_selected_on_page() {
        let mut selection = SelectionSet::new();
        let current_page = page(&["TW001", "US002", "JP003"]);

        assert!(!selection.all_selected_on_page(&current_page));

        selection.add("TW001");
        selection.add("US002");
        assert!(!selection.all_selected_on_page(&current_page));

        selection.add("JP003");
        assert!(selection.all_selected_on_page(&current_page));

        // A different page is judged against its own ids
        let next_page = page(&["DE005"]);
        assert!(!selection.all_selected_on_page(&next_page));
    }

    #[test]
    fn test_all_selected_on_empty_page_is_false() {
        let mut selection = SelectionSet::new();
        selection.add("TW001");
        assert!(!selection.all_selected_on_page(&[]));
    }

    #[test]
    fn test_clear_and_ids_snapshot() {
        let mut selection = SelectionSet::new();
        selection.add("US002");
        selection.add("TW001");

        assert_eq!(selection.ids(), vec!["TW001".to_string(), "US002".to_string()]);

        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_duplicate_add_is_noop() {
        let mut selection = SelectionSet::new();
        selection.add("TW001");
        selection.add("TW001");
        assert_eq!(selection.len(), 1);
    }
}
