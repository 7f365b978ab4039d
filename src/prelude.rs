pub use crate::{
    CachePolicy, CollapseFocus, Dataset, DatasetError, DefaultRenderer, DeriveCache, ExpandedMap,
    FocusHost, NameFilter, NoFilter, NodeFilter, RowKind, SidebarConfig, SidebarNode,
    SidebarRenderer, SidebarRow, SidebarSnapshot, SidebarStyle, SidebarTreeState,
    SidebarTreeView, TreeAction, TreeEvent, TreeGlyphs, TreeScrollPolicy, ViewState,
    derive_state, filter_dataset,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TreeKeyBindings};
