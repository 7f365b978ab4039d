use std::sync::Arc;

use rustc_hash::FxHashSet;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::action::{TreeAction, TreeEvent};
use crate::cache::DeriveCache;
use crate::config::{CachePolicy, CollapseFocus, SidebarConfig};
use crate::derive::{ViewState, derive_state};
use crate::error::Result;
use crate::focus::{FocusHost, element_id};
use crate::model::{Dataset, ExpandedMap};
use crate::nav::{self, VisibleNode};
use crate::rows::{SidebarRow, build_rows};
use crate::style::TreeScrollPolicy;

#[cfg(feature = "keymap")]
use crate::keymap::TreeKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// Engine instance behind one sidebar tree.
///
/// Owns the persisted expansion flags (the only state that survives a
/// re-derivation), the current inputs and the focused node. Every input change
/// re-derives the [`ViewState`]. One instance serves one widget; share it across
/// threads only behind a lock.
pub struct SidebarTreeState {
    dataset: Arc<Dataset>,
    filter: String,
    selected_id: Option<String>,
    expanded: ExpandedMap,
    view: ViewState,
    focused: Option<String>,
    offset: usize,
    config: SidebarConfig,
    cache: Option<Arc<DeriveCache>>,
    #[cfg(feature = "keymap")]
    keymap: TreeKeyBindings,
}

#[derive(Clone, Copy)]
enum Direction {
    Down,
    Up,
}

/// Snapshot of the interactive state (expansion, focus, filter, scroll).
///
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SidebarSnapshot {
    /// Ids with a persisted `true` expansion flag, sorted.
    pub expanded: Vec<String>,
    pub focused: Option<String>,
    pub filter: String,
    /// Scroll offset within the rendered rows.
    pub offset: usize,
}

impl Default for SidebarTreeState {
    fn default() -> Self {
        Self::new(Dataset::default())
    }
}

impl SidebarTreeState {
    /// Creates a state with the default configuration.
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, SidebarConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: SidebarConfig) -> Self {
        let cache = match config.cache {
            CachePolicy::Shared => Some(DeriveCache::shared()),
            CachePolicy::Private { capacity } => Some(Arc::new(DeriveCache::new(capacity))),
            CachePolicy::Disabled => None,
        };
        let mut state = Self {
            dataset: Arc::new(dataset),
            filter: String::new(),
            selected_id: None,
            expanded: ExpandedMap::default(),
            view: ViewState::default(),
            focused: None,
            offset: 0,
            config,
            cache,
            #[cfg(feature = "keymap")]
            keymap: TreeKeyBindings::new(),
        };
        state.rederive();
        state
    }

    /// Validates the dataset before creating the state.
    pub fn try_new(dataset: Dataset, config: SidebarConfig) -> Result<Self> {
        dataset.validate()?;
        Ok(Self::with_config(dataset, config))
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TreeKeyBindings {
        &mut self.keymap
    }

    #[inline]
    pub const fn config(&self) -> &SidebarConfig {
        &self.config
    }

    /// Current derived view state.
    #[inline]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    #[inline]
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Persisted expansion flags, before selection and section roots are forced open.
    #[inline]
    pub const fn expanded(&self) -> &ExpandedMap {
        &self.expanded
    }

    #[inline]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    #[inline]
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Node currently holding input focus.
    #[inline]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub(crate) const fn offset(&self) -> usize {
        self.offset
    }

    /// Replaces the dataset without validating it.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.set_dataset_arc(Arc::new(dataset));
    }

    /// Replaces the dataset with a shared one; reusing the same `Arc` keeps cache hits cheap.
    pub fn set_dataset_arc(&mut self, dataset: Arc<Dataset>) {
        self.dataset = dataset;
        self.rederive();
    }

    /// Validates and then replaces the dataset; the state is untouched on error.
    pub fn try_set_dataset(&mut self, dataset: Dataset) -> Result<()> {
        dataset.validate()?;
        self.set_dataset(dataset);
        Ok(())
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        let filter = filter.into();
        if filter == self.filter {
            return;
        }
        tracing::debug!(filter = %filter, "filter changed");
        self.filter = filter;
        self.rederive();
    }

    pub fn push_filter_char(&mut self, ch: char) {
        self.filter.push(ch);
        self.rederive();
    }

    pub fn pop_filter_char(&mut self) -> Option<char> {
        let popped = self.filter.pop();
        if popped.is_some() {
            self.rederive();
        }
        popped
    }

    pub fn clear_filter(&mut self) {
        self.set_filter(String::new());
    }

    /// Sets the externally selected node; its ancestors open on the next derivation.
    pub fn set_selected(&mut self, selected_id: Option<&str>) {
        if self.selected_id.as_deref() == selected_id {
            return;
        }
        self.selected_id = selected_id.map(str::to_owned);
        self.rederive();
    }

    /// Sets the persisted expansion flag of a node.
    pub fn set_expanded(&mut self, id: &str, expand: bool) {
        self.expanded.insert(id.to_owned(), expand);
        self.rederive();
    }

    /// Flips the persisted expansion flag of a node.
    ///
    /// Ancestors of the selection and section roots stay open in the view
    /// whatever the flag says.
    pub fn toggle(&mut self, id: &str) {
        let expand = !self.expanded.get(id).copied().unwrap_or(false);
        self.set_expanded(id, expand);
    }

    /// Clears every persisted expansion flag.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
        self.rederive();
    }

    /// Builds the rows currently rendered.
    pub fn rows(&self) -> Vec<SidebarRow<'_>> {
        build_rows(&self.view, &self.config)
    }

    /// Visible preorder of the filtered dataset.
    pub fn visible_nodes(&self) -> Vec<VisibleNode<'_>> {
        nav::visible_order(self.view.filtered_dataset(), self.view.expanded())
    }

    /// Returns `true` if the node is rendered as a head or leaf row.
    pub fn is_focusable(&self, id: &str) -> bool {
        self.rows()
            .iter()
            .any(|row| row.is_focusable() && row.id() == Some(id))
    }

    /// Moves focus to `id` if it is rendered; otherwise leaves focus unchanged.
    pub fn set_focus(&mut self, id: &str) -> bool {
        self.retarget_focus(id.to_owned()).is_some()
    }

    /// Host element id for a node under the configured prefix.
    pub fn element_id(&self, id: &str) -> String {
        element_id(&self.config.id_prefix, id)
    }

    /// Handles a click (or activation) on a node: flips its expansion.
    pub fn handle_click(&mut self, id: &str) -> TreeEvent {
        self.handle_action(id, TreeAction::Toggle)
    }

    /// Applies an action to the node `id` and returns the resulting event.
    ///
    /// Focus targets are computed against the visible order before the
    /// expansion change. Nodes without a focusable row (section titles, nameless
    /// branches, empty branches) are stepped over. A target that is not
    /// rendered afterwards leaves focus where it was.
    pub fn handle_action(&mut self, id: &str, action: TreeAction) -> TreeEvent {
        let _span = tracing::debug_span!("handle_action", id, ?action).entered();
        let Some(node) = self.view.filtered_dataset().get(id) else {
            tracing::debug!("node is not part of the view");
            return TreeEvent::Unhandled;
        };
        let is_leaf = !node.is_branch();
        let was_expanded = self.view.is_expanded(id);
        // Forced-open nodes stay open in the view, so collapse and toggle go by
        // the persisted flag.
        let persisted_open = self.expanded.get(id).copied().unwrap_or(false);

        let (target, expand) = {
            let rows = self.rows();
            let focusable: FxHashSet<&str> = rows
                .iter()
                .filter(|row| row.is_focusable())
                .filter_map(SidebarRow::id)
                .collect();
            match action {
                TreeAction::Expand => {
                    let target = if is_leaf || was_expanded {
                        self.step(id, Direction::Down, &focusable)
                    } else {
                        None
                    };
                    (target, Some(true))
                }
                TreeAction::Collapse => {
                    let target = if is_leaf || !persisted_open {
                        self.collapse_target(id, &focusable)
                    } else {
                        None
                    };
                    (target, Some(false))
                }
                TreeAction::MoveDown => (self.step(id, Direction::Down, &focusable), None),
                TreeAction::MoveUp => (self.step(id, Direction::Up, &focusable), None),
                TreeAction::Toggle => (None, Some(!persisted_open)),
            }
        };

        if let Some(expand) = expand {
            tracing::debug!(expand, "expansion changed");
            self.set_expanded(id, expand);
        }
        let focus = target.and_then(|target| self.retarget_focus(target));
        TreeEvent::Handled { focus }
    }

    /// Applies an action to the focused node.
    ///
    /// With nothing focused, moving down focuses the first row and moving up the
    /// last one.
    pub fn handle_focused_action(&mut self, action: TreeAction) -> TreeEvent {
        if let Some(focused) = self.focused.clone() {
            return self.handle_action(&focused, action);
        }
        let edge = {
            let rows = self.rows();
            let mut focusable = rows.iter().filter(|row| row.is_focusable());
            let edge = match action {
                TreeAction::MoveDown => focusable.next(),
                TreeAction::MoveUp => focusable.next_back(),
                _ => None,
            };
            edge.and_then(SidebarRow::id).map(str::to_owned)
        };
        match edge {
            Some(id) => TreeEvent::Handled {
                focus: self.retarget_focus(id),
            },
            None => TreeEvent::Unhandled,
        }
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event on node `id` into an action and handles it.
    pub fn handle_key(&mut self, id: &str, key: KeyEvent) -> TreeEvent {
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action(id, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<F>(&mut self, id: &str, key: KeyEvent, custom: F) -> TreeEvent
    where
        F: Fn(KeyEvent) -> Option<TreeAction>,
    {
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TreeEvent::Unhandled;
        };
        self.handle_action(id, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event against the focused node.
    pub fn handle_focused_key(&mut self, key: KeyEvent) -> TreeEvent {
        let Some(action) = self.keymap.resolve(key) else {
            return TreeEvent::Unhandled;
        };
        self.handle_focused_action(action)
    }

    /// Forwards the focus target of `event` to the host.
    ///
    /// Returns whether the host focused an element; a miss is logged and ignored.
    pub fn apply_focus<H: FocusHost>(&self, host: &mut H, event: &TreeEvent) -> bool {
        let Some(id) = event.focus() else {
            return false;
        };
        let element = self.element_id(id);
        let focused = host.focus_element(&element);
        if !focused {
            tracing::debug!(element = %element, "host could not focus element");
        }
        focused
    }

    /// Captures a snapshot of the interactive state.
    pub fn snapshot(&self) -> SidebarSnapshot {
        let mut expanded: Vec<String> = self
            .expanded
            .iter()
            .filter_map(|(id, open)| open.then(|| id.clone()))
            .collect();
        expanded.sort_unstable();
        SidebarSnapshot {
            expanded,
            focused: self.focused.clone(),
            filter: self.filter.clone(),
            offset: self.offset,
        }
    }

    /// Restores a previously captured snapshot.
    pub fn restore(&mut self, snapshot: SidebarSnapshot) {
        self.expanded = snapshot.expanded.into_iter().map(|id| (id, true)).collect();
        self.filter = snapshot.filter;
        self.focused = snapshot.focused;
        self.offset = snapshot.offset;
        self.rederive();
    }

    /// Adjusts the scroll offset so the focused row stays within the viewport.
    pub(crate) fn ensure_focus_visible(
        &mut self,
        focus_row: Option<usize>,
        total_rows: usize,
        viewport_height: usize,
        policy: TreeScrollPolicy,
    ) {
        let viewport_height = viewport_height.max(1);
        let max_offset = total_rows.saturating_sub(viewport_height);
        let Some(row) = focus_row else {
            self.offset = self.offset.min(max_offset);
            return;
        };
        match policy {
            TreeScrollPolicy::KeepInView => {
                if row < self.offset {
                    self.offset = row;
                } else if row >= self.offset + viewport_height {
                    self.offset = row + 1 - viewport_height;
                }
            }
            TreeScrollPolicy::CenterOnSelect => {
                self.offset = row.saturating_sub(viewport_height / 2);
            }
        }
        self.offset = self.offset.min(max_offset);
    }

    /// Walks the visible order from `id` to the next node that has a focusable row.
    fn step(&self, id: &str, direction: Direction, focusable: &FxHashSet<&str>) -> Option<String> {
        let filtered = self.view.filtered_dataset();
        let expanded = self.view.expanded();
        let mut current = id;
        for _ in 0..filtered.len() {
            let node = match direction {
                Direction::Down => nav::next(current, filtered, expanded),
                Direction::Up => nav::previous(current, filtered, expanded),
            }?;
            if focusable.contains(node.id.as_str()) {
                return Some(node.id.clone());
            }
            current = node.id.as_str();
        }
        None
    }

    fn collapse_target(&self, id: &str, focusable: &FxHashSet<&str>) -> Option<String> {
        let filtered = self.view.filtered_dataset();
        let ancestor = nav::parents(id, filtered)
            .into_iter()
            .find(|node| focusable.contains(node.id.as_str()))
            .map(|node| node.id.clone());
        match self.config.collapse_focus {
            CollapseFocus::Parent => ancestor,
            CollapseFocus::PreviousOrParent => {
                nav::parent(id, filtered)?;
                self.step(id, Direction::Up, focusable).or(ancestor)
            }
        }
    }

    fn retarget_focus(&mut self, target: String) -> Option<String> {
        if !self.is_focusable(&target) {
            tracing::debug!(target = %target, "focus target is not rendered");
            return None;
        }
        tracing::debug!(target = %target, "focus moved");
        self.focused = Some(target.clone());
        Some(target)
    }

    fn rederive(&mut self) {
        self.view = derive_state(
            &self.expanded,
            &self.dataset,
            &self.filter,
            self.selected_id.as_deref(),
            self.cache.as_deref(),
        );
        if let Some(focused) = self.focused.as_deref()
            && !self.is_focusable(focused)
        {
            tracing::debug!(id = focused, "focused node no longer rendered");
            self.focused = None;
        }
    }
}
