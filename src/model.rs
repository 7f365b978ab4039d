use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet, FxHasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// Per-id expansion flags. Missing ids count as collapsed.
pub type ExpandedMap = FxHashMap<String, bool>;

/// One entry of the sidebar dataset.
///
/// A node with `children` (even an empty list) is a branch; without, a leaf.
/// `children` order is display order.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SidebarNode {
    /// Stable unique identifier.
    pub id: String,
    /// Display name, also the text the filter matches against.
    pub name: String,
    /// Ordered child ids; `None` for leaves.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub children: Option<Vec<String>>,
    /// Top-level nodes with this flag render as named sections.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_root: bool,
    /// Opaque data forwarded to renderers untouched.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "BTreeMap::is_empty"))]
    pub payload: BTreeMap<String, String>,
}

impl SidebarNode {
    /// Creates a leaf node.
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: None,
            is_root: false,
            payload: BTreeMap::new(),
        }
    }

    /// Creates a branch node with the given children in display order.
    pub fn branch<I, S>(id: impl Into<String>, name: impl Into<String>, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            children: Some(children.into_iter().map(Into::into).collect()),
            ..Self::leaf(id, name)
        }
    }

    /// Flags the node as a section root.
    #[must_use]
    pub const fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Attaches one payload entry.
    #[must_use]
    pub fn with_payload(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Returns `true` if the node carries a `children` list.
    #[inline]
    pub const fn is_branch(&self) -> bool {
        self.children.is_some()
    }

    /// Returns the child ids (empty for leaves).
    #[inline]
    pub fn children(&self) -> &[String] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Returns `true` if the node has at least one child id.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// Flat id -> node mapping with a child -> parent index.
///
/// Iteration follows insertion order, which decides the order of top-level
/// entries. The dataset is immutable once built; a fingerprint of its content
/// is computed up front and used as the memoization key.
///
/// Expected shape (checked by [`Dataset::validate`]):
/// - every child id exists as a key;
/// - each node has at most one parent;
/// - no cycles.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    nodes: IndexMap<String, SidebarNode, FxBuildHasher>,
    parents: FxHashMap<String, String>,
    fingerprint: u64,
}

impl Dataset {
    /// Builds a dataset; a repeated id replaces the earlier node in place.
    pub fn from_nodes<I: IntoIterator<Item = SidebarNode>>(nodes: I) -> Self {
        let iter = nodes.into_iter();
        let mut map = IndexMap::with_capacity_and_hasher(iter.size_hint().0, FxBuildHasher);
        for node in iter {
            map.insert(node.id.clone(), node);
        }
        Self::from_map(map)
    }

    /// Builds a dataset and fails fast on duplicates or any [`validate`](Self::validate) error.
    pub fn try_from_nodes<I: IntoIterator<Item = SidebarNode>>(nodes: I) -> Result<Self> {
        let iter = nodes.into_iter();
        let mut map = IndexMap::with_capacity_and_hasher(iter.size_hint().0, FxBuildHasher);
        for node in iter {
            if map.contains_key(&node.id) {
                return Err(DatasetError::DuplicateId { id: node.id });
            }
            map.insert(node.id.clone(), node);
        }
        let dataset = Self::from_map(map);
        dataset.validate()?;
        Ok(dataset)
    }

    pub(crate) fn from_map(nodes: IndexMap<String, SidebarNode, FxBuildHasher>) -> Self {
        let mut parents = FxHashMap::with_capacity_and_hasher(nodes.len(), FxBuildHasher);
        let mut hasher = FxHasher::default();
        nodes.len().hash(&mut hasher);
        for node in nodes.values() {
            node.hash(&mut hasher);
            for child in node.children() {
                // First parent wins; validate() reports the conflict.
                parents
                    .entry(child.clone())
                    .or_insert_with(|| node.id.clone());
            }
        }
        Self {
            nodes,
            parents,
            fingerprint: hasher.finish(),
        }
    }

    /// Checks the structural invariants, reporting the first violation found.
    pub fn validate(&self) -> Result<()> {
        let mut seen: FxHashMap<&str, &str> =
            FxHashMap::with_capacity_and_hasher(self.parents.len(), FxBuildHasher);
        for node in self.nodes.values() {
            for child in node.children() {
                if !self.nodes.contains_key(child) {
                    return Err(DatasetError::DanglingChild {
                        parent: node.id.clone(),
                        child: child.clone(),
                    });
                }
                if let Some(first) = seen.insert(child.as_str(), node.id.as_str()) {
                    return Err(DatasetError::MultipleParents {
                        id: child.clone(),
                        first: first.to_owned(),
                        second: node.id.clone(),
                    });
                }
            }
        }

        // With single parents, anything unreachable from the top level hangs off a cycle.
        let mut reached: FxHashSet<&str> =
            FxHashSet::with_capacity_and_hasher(self.nodes.len(), FxBuildHasher);
        let mut stack: Vec<&str> = self.top_level().map(|node| node.id.as_str()).collect();
        while let Some(id) = stack.pop() {
            if reached.insert(id) {
                stack.extend(self.children(id).iter().map(String::as_str));
            }
        }
        if let Some(node) = self
            .nodes
            .values()
            .find(|node| !reached.contains(node.id.as_str()))
        {
            return Err(DatasetError::Cycle {
                id: node.id.clone(),
            });
        }
        Ok(())
    }

    /// Returns the node with the given id.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&SidebarNode> {
        self.nodes.get(id)
    }

    /// Returns `true` if the id is a key of the dataset.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &SidebarNode> {
        self.nodes.values()
    }

    /// Iterates ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Returns the id of the node whose `children` lists `id`.
    #[inline]
    pub fn parent_id(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    /// Returns the child ids of a node (empty for leaves and unknown ids).
    #[inline]
    pub fn children(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(SidebarNode::children)
            .unwrap_or_default()
    }

    /// Iterates entries without a parent, in insertion order.
    pub fn top_level(&self) -> impl Iterator<Item = &SidebarNode> {
        self.nodes
            .values()
            .filter(|node| !self.parents.contains_key(&node.id))
    }

    /// Content hash computed at construction time.
    #[inline]
    pub const fn fingerprint(&self) -> u64 {
        self.fingerprint
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        // Order matters: it decides the top-level order.
        self.fingerprint == other.fingerprint
            && self.nodes.len() == other.nodes.len()
            && self.nodes.values().eq(other.nodes.values())
    }
}

impl Eq for Dataset {}

impl FromIterator<SidebarNode> for Dataset {
    fn from_iter<I: IntoIterator<Item = SidebarNode>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

/// Match predicate applied to single nodes by the filter engine.
pub trait NodeFilter {
    /// Returns `true` if the node matches on its own (descendants are not considered).
    fn is_match(&self, node: &SidebarNode) -> bool;
}

impl<F> NodeFilter for F
where
    F: Fn(&SidebarNode) -> bool,
{
    #[inline]
    fn is_match(&self, node: &SidebarNode) -> bool {
        self(node)
    }
}

/// Filter that matches every node.
#[derive(Clone, Copy, Debug)]
pub struct NoFilter;

impl NodeFilter for NoFilter {
    #[inline]
    fn is_match(&self, _node: &SidebarNode) -> bool {
        true
    }
}
