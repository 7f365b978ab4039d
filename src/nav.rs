//! Depth-first traversal restricted to what is currently visible.
//!
//! A node's children are visible only while its expansion flag is set. Top-level
//! entries are siblings of each other, ordered with section roots first and
//! ungrouped entries after them, which is the order they are rendered in.
//! Dangling child ids are skipped everywhere.

use rustc_hash::{FxBuildHasher, FxHashSet};
use smallvec::SmallVec;

use crate::model::{Dataset, ExpandedMap, SidebarNode};

/// A node in visible preorder with its depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibleNode<'a> {
    pub id: &'a str,
    pub level: u16,
    pub parent: Option<&'a str>,
    pub has_children: bool,
}

#[inline]
fn is_expanded(expanded: &ExpandedMap, id: &str) -> bool {
    expanded.get(id).copied().unwrap_or(false)
}

fn present_children<'a>(
    dataset: &'a Dataset,
    node: &'a SidebarNode,
) -> impl DoubleEndedIterator<Item = &'a SidebarNode> + 'a {
    node.children()
        .iter()
        .filter_map(move |child| dataset.get(child))
}

/// Returns the node whose `children` contains `id`.
pub fn parent<'a>(id: &str, dataset: &'a Dataset) -> Option<&'a SidebarNode> {
    dataset
        .parent_id(id)
        .and_then(|parent_id| dataset.get(parent_id))
}

/// Returns the ancestor chain from the immediate parent up to the top level.
///
/// Unknown ids have no ancestors.
pub fn parents<'a>(id: &str, dataset: &'a Dataset) -> Vec<&'a SidebarNode> {
    let mut chain = Vec::new();
    if !dataset.contains(id) {
        return chain;
    }
    let mut current = parent(id, dataset);
    while let Some(node) = current {
        if chain.len() >= dataset.len() {
            tracing::warn!(id, "ancestor chain loops, truncating");
            break;
        }
        chain.push(node);
        current = parent(&node.id, dataset);
    }
    chain
}

/// Returns the top-level entries in dataset order.
pub fn mains(dataset: &Dataset) -> Vec<&SidebarNode> {
    dataset.top_level().collect()
}

/// Returns the top-level entries in render order: section roots, then the rest.
pub fn top_level_order(dataset: &Dataset) -> Vec<&SidebarNode> {
    let (mut roots, others): (Vec<_>, Vec<_>) =
        dataset.top_level().partition(|node| node.is_root);
    roots.extend(others);
    roots
}

fn siblings<'a>(id: &str, dataset: &'a Dataset) -> SmallVec<[&'a SidebarNode; 8]> {
    parent(id, dataset).map_or_else(
        || SmallVec::from_vec(top_level_order(dataset)),
        |node| present_children(dataset, node).collect(),
    )
}

fn sibling_after<'a>(id: &str, dataset: &'a Dataset) -> Option<&'a SidebarNode> {
    let siblings = siblings(id, dataset);
    let position = siblings.iter().position(|node| node.id == id)?;
    siblings.get(position + 1).copied()
}

fn sibling_before<'a>(id: &str, dataset: &'a Dataset) -> Option<&'a SidebarNode> {
    let siblings = siblings(id, dataset);
    let position = siblings.iter().position(|node| node.id == id)?;
    position.checked_sub(1).and_then(|prev| siblings.get(prev).copied())
}

fn last_visible_descendant<'a>(
    node: &'a SidebarNode,
    dataset: &'a Dataset,
    expanded: &ExpandedMap,
) -> &'a SidebarNode {
    let mut current = node;
    for _ in 0..dataset.len() {
        if !is_expanded(expanded, &current.id) {
            break;
        }
        match present_children(dataset, current).next_back() {
            Some(last) => current = last,
            None => break,
        }
    }
    current
}

/// Returns the node right after `id` in visible preorder.
///
/// An expanded branch continues into its first child; otherwise the walk goes to
/// the next sibling of the node or of its nearest ancestor that has one.
pub fn next<'a>(id: &str, dataset: &'a Dataset, expanded: &ExpandedMap) -> Option<&'a SidebarNode> {
    let node = dataset.get(id)?;
    if is_expanded(expanded, id)
        && let Some(first) = present_children(dataset, node).next()
    {
        return Some(first);
    }

    let mut current = node;
    for _ in 0..=dataset.len() {
        if let Some(sibling) = sibling_after(&current.id, dataset) {
            return Some(sibling);
        }
        current = parent(&current.id, dataset)?;
    }
    None
}

/// Returns the node right before `id` in visible preorder.
///
/// That is the deepest visible last descendant of the previous sibling, or the
/// parent when there is no previous sibling.
pub fn previous<'a>(
    id: &str,
    dataset: &'a Dataset,
    expanded: &ExpandedMap,
) -> Option<&'a SidebarNode> {
    if !dataset.contains(id) {
        return None;
    }
    if let Some(sibling) = sibling_before(id, dataset) {
        return Some(last_visible_descendant(sibling, dataset, expanded));
    }
    parent(id, dataset)
}

/// Linearizes the visible nodes in preorder.
pub fn visible_order<'a>(dataset: &'a Dataset, expanded: &ExpandedMap) -> Vec<VisibleNode<'a>> {
    let mut out = Vec::with_capacity(dataset.len());
    let mut seen: FxHashSet<&str> = FxHashSet::with_capacity_and_hasher(dataset.len(), FxBuildHasher);
    let mut stack: Vec<(&SidebarNode, u16, Option<&str>)> = top_level_order(dataset)
        .into_iter()
        .rev()
        .map(|node| (node, 0, None))
        .collect();

    while let Some((node, level, parent)) = stack.pop() {
        if !seen.insert(node.id.as_str()) {
            continue;
        }
        out.push(VisibleNode {
            id: node.id.as_str(),
            level,
            parent,
            has_children: node.has_children(),
        });
        if is_expanded(expanded, &node.id) {
            for child in present_children(dataset, node).rev() {
                stack.push((child, level.saturating_add(1), Some(node.id.as_str())));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // a (root) -> b, c -> d, e; f is ungrouped and listed before a.
    fn dataset() -> Dataset {
        Dataset::from_nodes([
            SidebarNode::leaf("f", "Free"),
            SidebarNode::branch("a", "A", ["b", "c"]).as_root(),
            SidebarNode::leaf("b", "B"),
            SidebarNode::branch("c", "C", ["d", "e"]),
            SidebarNode::leaf("d", "D"),
            SidebarNode::leaf("e", "E"),
        ])
    }

    fn expanded(ids: &[&str]) -> ExpandedMap {
        ids.iter().map(|id| ((*id).to_string(), true)).collect()
    }

    fn id_of(node: Option<&SidebarNode>) -> Option<&str> {
        node.map(|node| node.id.as_str())
    }

    #[test]
    fn parents_walk_up_to_top_level() {
        let dataset = dataset();
        let chain: Vec<_> = parents("d", &dataset).iter().map(|n| n.id.as_str()).collect();

        assert_eq!(chain, vec!["c", "a"]);
        assert!(parents("a", &dataset).is_empty());
        assert!(parents("missing", &dataset).is_empty());
    }

    #[test]
    fn top_level_puts_roots_first() {
        let dataset = dataset();
        let mains: Vec<_> = mains(&dataset).iter().map(|n| n.id.as_str()).collect();
        let order: Vec<_> = top_level_order(&dataset)
            .iter()
            .map(|n| n.id.as_str())
            .collect();

        assert_eq!(mains, vec!["f", "a"]);
        assert_eq!(order, vec!["a", "f"]);
    }

    #[test]
    fn next_respects_collapsed_branches() {
        let dataset = dataset();
        let collapsed = expanded(&["a"]);
        let open = expanded(&["a", "c"]);

        assert_eq!(id_of(next("c", &dataset, &collapsed)), Some("f"));
        assert_eq!(id_of(next("c", &dataset, &open)), Some("d"));
        assert_eq!(id_of(next("e", &dataset, &open)), Some("f"));
        assert_eq!(id_of(next("f", &dataset, &open)), None);
    }

    #[test]
    fn previous_descends_into_expanded_sibling() {
        let dataset = dataset();
        let open = expanded(&["a", "c"]);

        assert_eq!(id_of(previous("f", &dataset, &open)), Some("e"));
        assert_eq!(id_of(previous("f", &dataset, &expanded(&["a"]))), Some("c"));
        assert_eq!(id_of(previous("f", &dataset, &ExpandedMap::default())), Some("a"));
        assert_eq!(id_of(previous("d", &dataset, &open)), Some("c"));
        assert_eq!(id_of(previous("a", &dataset, &open)), None);
    }

    #[test]
    fn visible_order_matches_next_chain() {
        let dataset = dataset();
        let open = expanded(&["a", "c"]);
        let order: Vec<_> = visible_order(&dataset, &open)
            .iter()
            .map(|n| (n.id, n.level))
            .collect();

        assert_eq!(
            order,
            vec![("a", 0), ("b", 1), ("c", 1), ("d", 2), ("e", 2), ("f", 0)]
        );

        let mut walked = vec!["a"];
        while let Some(node) = next(walked[walked.len() - 1], &dataset, &open) {
            walked.push(node.id.as_str());
        }
        let ids: Vec<_> = order.iter().map(|(id, _)| *id).collect();
        assert_eq!(walked, ids);
    }

    #[test]
    fn dangling_children_are_skipped() {
        let dataset = Dataset::from_nodes([
            SidebarNode::branch("a", "A", ["ghost", "b", "phantom"]),
            SidebarNode::leaf("b", "B"),
        ]);
        let open = expanded(&["a"]);

        assert_eq!(id_of(next("a", &dataset, &open)), Some("b"));
        assert_eq!(id_of(previous("b", &dataset, &open)), Some("a"));
        assert_eq!(id_of(next("b", &dataset, &open)), None);
    }
}
