use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::model::{Dataset, NodeFilter, SidebarNode};

/// Case-insensitive substring match against node names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameFilter {
    needle: String,
}

impl NameFilter {
    pub fn new(pattern: &str) -> Self {
        Self {
            needle: pattern.to_lowercase(),
        }
    }

    /// Returns `true` for an empty pattern, which matches everything.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

impl NodeFilter for NameFilter {
    fn is_match(&self, node: &SidebarNode) -> bool {
        self.needle.is_empty() || node.name.to_lowercase().contains(&self.needle)
    }
}

/// Reduces the dataset to name matches plus their ancestors.
///
/// An empty pattern returns the same `Arc` untouched.
pub fn filter_dataset(dataset: &Arc<Dataset>, pattern: &str) -> Arc<Dataset> {
    if pattern.is_empty() {
        return Arc::clone(dataset);
    }
    Arc::new(filter_with(dataset, &NameFilter::new(pattern)))
}

/// Keeps every node that matches `filter` or has a matching descendant.
///
/// Retained branches keep only their retained children, in original order.
/// Dangling child ids are dropped. Runs in O(nodes) thanks to a per-id memo.
pub fn filter_with<F: NodeFilter>(dataset: &Dataset, filter: &F) -> Dataset {
    let mut memo: FxHashMap<&str, bool> =
        FxHashMap::with_capacity_and_hasher(dataset.len(), FxBuildHasher);
    for id in dataset.ids() {
        subtree_has_match(dataset, id, filter, &mut memo);
    }

    let mut retained = IndexMap::with_capacity_and_hasher(memo.len(), FxBuildHasher);
    for node in dataset.iter() {
        if !memo.get(node.id.as_str()).copied().unwrap_or(false) {
            continue;
        }
        let mut kept = node.clone();
        if let Some(children) = kept.children.as_mut() {
            children.retain(|child| memo.get(child.as_str()).copied().unwrap_or(false));
        }
        retained.insert(kept.id.clone(), kept);
    }

    tracing::trace!(
        total = dataset.len(),
        retained = retained.len(),
        "filtered dataset"
    );
    Dataset::from_map(retained)
}

fn subtree_has_match<'a, F: NodeFilter>(
    dataset: &'a Dataset,
    id: &'a str,
    filter: &F,
    memo: &mut FxHashMap<&'a str, bool>,
) -> bool {
    if let Some(&cached) = memo.get(id) {
        return cached;
    }
    let Some(node) = dataset.get(id) else {
        tracing::warn!(id, "skipping dangling child reference");
        memo.insert(id, false);
        return false;
    };

    // Seed before recursing so a cyclic dataset terminates.
    memo.insert(id, false);
    let mut matched = filter.is_match(node);
    for child in node.children() {
        // Every child is visited so the memo covers the whole subtree.
        if subtree_has_match(dataset, child, filter, memo) {
            matched = true;
        }
    }

    memo.insert(id, matched);
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Arc<Dataset> {
        Arc::new(Dataset::from_nodes([
            SidebarNode::branch("a", "A", ["b", "c"]).as_root(),
            SidebarNode::leaf("b", "Apple"),
            SidebarNode::branch("c", "Banana", ["d"]),
            SidebarNode::leaf("d", "Cherry"),
        ]))
    }

    fn ids(dataset: &Dataset) -> Vec<&str> {
        dataset.ids().collect()
    }

    #[test]
    fn empty_pattern_returns_same_dataset() {
        let dataset = dataset();
        let filtered = filter_dataset(&dataset, "");

        assert!(Arc::ptr_eq(&dataset, &filtered));
    }

    #[test]
    fn keeps_matching_path_and_prunes_children() {
        let filtered = filter_dataset(&dataset(), "CHER");

        assert_eq!(ids(&filtered), vec!["a", "c", "d"]);
        assert_eq!(filtered.children("a"), ["c".to_string()]);
        assert_eq!(filtered.children("c"), ["d".to_string()]);
    }

    #[test]
    fn matching_branch_keeps_only_matching_children() {
        let filtered = filter_dataset(&dataset(), "an");

        assert_eq!(ids(&filtered), vec!["a", "c"]);
        assert!(filtered.children("c").is_empty());
        assert!(filtered.get("c").is_some_and(SidebarNode::is_branch));
    }

    #[test]
    fn no_match_yields_empty_dataset() {
        let filtered = filter_dataset(&dataset(), "zzz");

        assert!(filtered.is_empty());
    }

    #[test]
    fn dangling_and_cyclic_references_do_not_hang() {
        let dataset = Dataset::from_nodes([
            SidebarNode::branch("a", "Loop", ["b", "ghost"]),
            SidebarNode::branch("b", "Back", ["a"]),
        ]);
        let filtered = filter_with(&dataset, &NameFilter::new("back"));

        assert_eq!(ids(&filtered), vec!["a", "b"]);
        assert_eq!(filtered.children("a"), ["b".to_string()]);
    }
}
