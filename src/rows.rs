//! Linearizes a [`ViewState`] into the rows a renderer draws.
//!
//! Section roots become a title row followed by their children at depth 0.
//! Ungrouped entries follow in one trailing section whose title only appears
//! when root sections exist. A named branch yields a head row and, while
//! expanded, its children; a nameless branch yields only its children; a branch
//! with an empty child list yields nothing. Ids missing from the filtered
//! dataset render nothing.

use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::config::SidebarConfig;
use crate::derive::ViewState;
use crate::model::SidebarNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// Section header: a root's name or the "others" title.
    SectionTitle,
    /// Expandable branch row.
    Head,
    Leaf,
    /// Zero-result notice.
    Message,
}

/// One renderable line of the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarRow<'a> {
    pub kind: RowKind,
    /// Backing node; `None` for the "others" title and the message.
    pub node: Option<&'a SidebarNode>,
    pub label: &'a str,
    pub depth: u16,
    pub is_expanded: bool,
    pub is_selected: bool,
}

impl SidebarRow<'_> {
    pub fn id(&self) -> Option<&str> {
        self.node.map(|node| node.id.as_str())
    }

    /// Heads and leaves are the rows that can hold input focus.
    #[inline]
    pub const fn is_focusable(&self) -> bool {
        matches!(self.kind, RowKind::Head | RowKind::Leaf)
    }
}

/// Builds the row list for a view state.
pub fn build_rows<'a>(view: &'a ViewState, config: &'a SidebarConfig) -> Vec<SidebarRow<'a>> {
    let mut rows = Vec::with_capacity(view.filtered_dataset().len() + 2);
    if view.is_zero_results() {
        rows.push(SidebarRow {
            kind: RowKind::Message,
            node: None,
            label: config.empty_message.as_str(),
            depth: 0,
            is_expanded: false,
            is_selected: false,
        });
        return rows;
    }

    let mut seen = FxHashSet::with_capacity_and_hasher(view.filtered_dataset().len(), FxBuildHasher);
    for root in view.root_nodes() {
        rows.push(SidebarRow {
            kind: RowKind::SectionTitle,
            node: Some(root),
            label: root.name.as_str(),
            depth: 0,
            is_expanded: true,
            is_selected: view.is_selected(&root.id),
        });
        seen.insert(root.id.as_str());
        for child in root.children() {
            push_subtree(view, child, 0, &mut rows, &mut seen);
        }
    }

    if !view.others().is_empty() {
        if !view.roots().is_empty() {
            rows.push(SidebarRow {
                kind: RowKind::SectionTitle,
                node: None,
                label: config.others_title.as_str(),
                depth: 0,
                is_expanded: true,
                is_selected: false,
            });
        }
        for id in view.others() {
            push_subtree(view, id, 0, &mut rows, &mut seen);
        }
    }
    rows
}

fn push_subtree<'a>(
    view: &'a ViewState,
    id: &str,
    depth: u16,
    rows: &mut Vec<SidebarRow<'a>>,
    seen: &mut FxHashSet<&'a str>,
) {
    let Some(node) = view.filtered_dataset().get(id) else {
        return;
    };
    if !seen.insert(node.id.as_str()) {
        return;
    }

    if !node.is_branch() {
        rows.push(SidebarRow {
            kind: RowKind::Leaf,
            node: Some(node),
            label: node.name.as_str(),
            depth,
            is_expanded: false,
            is_selected: view.is_selected(&node.id),
        });
        return;
    }
    if !node.has_children() {
        return;
    }

    let show_children = if node.name.is_empty() {
        true
    } else {
        let is_expanded = view.is_expanded(&node.id);
        rows.push(SidebarRow {
            kind: RowKind::Head,
            node: Some(node),
            label: node.name.as_str(),
            depth,
            is_expanded,
            is_selected: view.is_selected(&node.id),
        });
        is_expanded
    };
    if show_children {
        for child in node.children() {
            push_subtree(view, child, depth.saturating_add(1), rows, seen);
        }
    }
}
