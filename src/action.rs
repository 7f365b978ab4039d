/// Tree operations triggered by key or pointer events on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeAction {
    /// Expand the node; move on to the next node if it is a leaf or already expanded.
    Expand,
    /// Collapse the node; move toward the parent if it is a leaf or already collapsed.
    ///
    /// "Already collapsed" reads the persisted flag. Ancestors of the selection
    /// stay open in the view either way; with their flag cleared, a press moves
    /// focus toward the parent.
    Collapse,
    /// Move focus to the next visible node.
    MoveDown,
    /// Move focus to the previous visible node.
    MoveUp,
    /// Flip the node's persisted expansion flag (click or activate).
    Toggle,
}

/// Result of handling an action or key event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeEvent {
    /// The event resolved to a tree operation. The host should suppress its
    /// default input handling (e.g. scrolling on arrow keys) and may move input
    /// focus to `focus`.
    Handled { focus: Option<String> },
    /// Nothing to do; default input handling must go ahead.
    Unhandled,
}

impl TreeEvent {
    /// Returns `true` if the host should suppress its default input behavior.
    #[inline]
    pub const fn prevents_default(&self) -> bool {
        matches!(self, Self::Handled { .. })
    }

    /// Node id that received focus as a result of the event, if any.
    pub fn focus(&self) -> Option<&str> {
        match self {
            Self::Handled { focus } => focus.as_deref(),
            Self::Unhandled => None,
        }
    }
}
