//! View-state derivation: a pure function of dataset, filter, selection and the
//! persisted expansion flags.
//!
//! The expansion-independent part ([`TreeDerivation`]) is what gets memoized; the
//! persisted flags are merged on top of it on every call, so a cached derivation
//! never carries stale expansion.

use std::sync::Arc;

use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::cache::DeriveCache;
use crate::filter::filter_dataset;
use crate::model::{Dataset, ExpandedMap, SidebarNode};
use crate::nav;

/// Filtered dataset, selection and grouping for one `(dataset, filter, selected)` input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeDerivation {
    filtered: Arc<Dataset>,
    selected: FxHashMap<String, bool>,
    forced_open: FxHashSet<String>,
    roots: Vec<String>,
    others: Vec<String>,
}

impl TreeDerivation {
    /// Filtered dataset the rest of the derivation refers to.
    #[inline]
    pub const fn filtered_dataset(&self) -> &Arc<Dataset> {
        &self.filtered
    }

    /// Ids that are always expanded: ancestors of the selection, section roots and
    /// nameless branches.
    #[inline]
    pub const fn forced_open(&self) -> &FxHashSet<String> {
        &self.forced_open
    }
}

/// Computes the expansion-independent derivation without any caching.
pub fn derive_tree(
    dataset: &Arc<Dataset>,
    filter: &str,
    selected_id: Option<&str>,
) -> TreeDerivation {
    let filtered = filter_dataset(dataset, filter);

    let mut selected = FxHashMap::with_capacity_and_hasher(filtered.len(), FxBuildHasher);
    for id in filtered.ids() {
        selected.insert(id.to_owned(), Some(id) == selected_id);
    }

    // Nameless branches render no head, so their children are always shown.
    let mut forced_open: FxHashSet<String> = filtered
        .iter()
        .filter(|node| node.is_branch() && node.name.is_empty())
        .map(|node| node.id.clone())
        .collect();
    if let Some(selected_id) = selected_id {
        forced_open.extend(
            nav::parents(selected_id, &filtered)
                .into_iter()
                .map(|node| node.id.clone()),
        );
    }

    let mut roots = Vec::new();
    let mut others = Vec::new();
    for node in nav::mains(&filtered) {
        if node.is_root {
            // Sections always show their body.
            forced_open.insert(node.id.clone());
            roots.push(node.id.clone());
        } else {
            others.push(node.id.clone());
        }
    }

    TreeDerivation {
        filtered,
        selected,
        forced_open,
        roots,
        others,
    }
}

/// Renderer-facing state of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewState {
    derivation: Arc<TreeDerivation>,
    expanded: ExpandedMap,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::from_derivation(
            Arc::new(derive_tree(&Arc::default(), "", None)),
            &ExpandedMap::default(),
        )
    }
}

/// Derives the full view state, going through `cache` when one is given.
///
/// Results are identical with and without a cache.
pub fn derive_state(
    prev_expanded: &ExpandedMap,
    dataset: &Arc<Dataset>,
    filter: &str,
    selected_id: Option<&str>,
    cache: Option<&DeriveCache>,
) -> ViewState {
    let _span = tracing::debug_span!("derive_state", filter, selected = ?selected_id).entered();
    let derivation = match cache {
        Some(cache) => cache.get_or_derive(dataset, filter, selected_id),
        None => Arc::new(derive_tree(dataset, filter, selected_id)),
    };
    ViewState::from_derivation(derivation, prev_expanded)
}

impl ViewState {
    /// Merges persisted expansion flags over a derivation; forced ids always win.
    pub fn from_derivation(derivation: Arc<TreeDerivation>, prev_expanded: &ExpandedMap) -> Self {
        let filtered = &derivation.filtered;
        let mut expanded = ExpandedMap::with_capacity_and_hasher(filtered.len(), FxBuildHasher);
        for id in filtered.ids() {
            let open = derivation.forced_open.contains(id)
                || prev_expanded.get(id).copied().unwrap_or(false);
            expanded.insert(id.to_owned(), open);
        }
        Self {
            derivation,
            expanded,
        }
    }

    #[inline]
    pub const fn derivation(&self) -> &Arc<TreeDerivation> {
        &self.derivation
    }

    #[inline]
    pub fn filtered_dataset(&self) -> &Dataset {
        &self.derivation.filtered
    }

    /// Selection flag for every id of the filtered dataset.
    #[inline]
    pub fn selected(&self) -> &FxHashMap<String, bool> {
        &self.derivation.selected
    }

    /// Effective expansion flag for every id of the filtered dataset.
    #[inline]
    pub const fn expanded(&self) -> &ExpandedMap {
        &self.expanded
    }

    /// Ids of top-level section roots.
    #[inline]
    pub fn roots(&self) -> &[String] {
        &self.derivation.roots
    }

    /// Ids of ungrouped top-level entries.
    #[inline]
    pub fn others(&self) -> &[String] {
        &self.derivation.others
    }

    pub fn root_nodes(&self) -> impl Iterator<Item = &SidebarNode> {
        self.roots()
            .iter()
            .filter_map(|id| self.filtered_dataset().get(id))
    }

    pub fn other_nodes(&self) -> impl Iterator<Item = &SidebarNode> {
        self.others()
            .iter()
            .filter_map(|id| self.filtered_dataset().get(id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.derivation.selected.get(id).copied().unwrap_or(false)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// `true` when nothing is left to render, e.g. the filter matched no node.
    pub fn is_zero_results(&self) -> bool {
        self.derivation.roots.is_empty() && self.derivation.others.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_nodes([
            SidebarNode::branch("a", "A", ["b", "c"]).as_root(),
            SidebarNode::leaf("b", "Apple"),
            SidebarNode::branch("c", "Banana", ["d"]),
            SidebarNode::leaf("d", "Date"),
            SidebarNode::branch("x", "Extra", ["y"]),
            SidebarNode::leaf("y", "Yam"),
        ]))
    }

    #[test]
    fn selection_forces_its_path_open() {
        let view = derive_state(&ExpandedMap::default(), &dataset(), "", Some("d"), None);

        assert!(view.is_selected("d"));
        assert!(!view.is_selected("c"));
        assert!(view.is_expanded("c"));
        assert!(view.is_expanded("a"));
        assert!(!view.is_expanded("x"));
    }

    #[test]
    fn persisted_flags_survive_but_do_not_override_forced() {
        let mut prev = ExpandedMap::default();
        prev.insert("x".into(), true);
        prev.insert("c".into(), false);
        let view = derive_state(&prev, &dataset(), "", Some("d"), None);

        assert!(view.is_expanded("x"));
        assert!(view.is_expanded("c"));
    }

    #[test]
    fn groups_top_level_entries() {
        let view = derive_state(&ExpandedMap::default(), &dataset(), "", None, None);

        assert_eq!(view.roots(), ["a".to_string()]);
        assert_eq!(view.others(), ["x".to_string()]);
        assert!(view.is_expanded("a"));
        assert!(!view.is_zero_results());
    }

    #[test]
    fn selection_outside_filter_selects_nothing() {
        let view = derive_state(&ExpandedMap::default(), &dataset(), "yam", Some("d"), None);

        assert!(view.selected().values().all(|selected| !selected));
        assert!(view.roots().is_empty());
        assert_eq!(view.others(), ["x".to_string()]);
    }

    #[test]
    fn cached_and_uncached_results_agree() {
        let cache = DeriveCache::new(4);
        let dataset = dataset();
        let prev = ExpandedMap::default();

        let plain = derive_state(&prev, &dataset, "an", Some("c"), None);
        let first = derive_state(&prev, &dataset, "an", Some("c"), Some(&cache));
        let second = derive_state(&prev, &dataset, "an", Some("c"), Some(&cache));

        assert_eq!(plain, first);
        assert!(Arc::ptr_eq(first.derivation(), second.derivation()));
    }
}
