#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Capacity of the process-wide derivation cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Where focus goes when LEFT is pressed on a leaf or an already collapsed branch.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollapseFocus {
    /// Focus the parent node.
    #[default]
    Parent,
    /// Focus the previous visible node, falling back to the parent.
    /// Nothing happens for top-level nodes.
    PreviousOrParent,
}

/// Which memoization cache a state instance derives through.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// The process-wide cache shared by every instance.
    #[default]
    Shared,
    /// A cache owned by this instance.
    Private { capacity: usize },
    /// Always recompute.
    Disabled,
}

/// Engine configuration.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarConfig {
    /// Namespace for externally addressable element ids.
    pub id_prefix: String,
    pub cache: CachePolicy,
    pub collapse_focus: CollapseFocus,
    /// Title of the ungrouped section, shown only next to root sections.
    pub others_title: String,
    /// Text shown when the filter matches nothing.
    pub empty_message: String,
}

impl SidebarConfig {
    pub fn new() -> Self {
        Self {
            id_prefix: String::new(),
            cache: CachePolicy::Shared,
            collapse_focus: CollapseFocus::Parent,
            others_title: "Others".to_string(),
            empty_message: "This filter resulted in 0 results".to_string(),
        }
    }

    #[must_use]
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    #[must_use]
    pub const fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub const fn with_collapse_focus(mut self, collapse_focus: CollapseFocus) -> Self {
        self.collapse_focus = collapse_focus;
        self
    }

    #[must_use]
    pub fn with_others_title(mut self, title: impl Into<String>) -> Self {
        self.others_title = title.into();
        self
    }

    #[must_use]
    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self::new()
    }
}
