//! State and navigation engine for a filterable, keyboard-navigable sidebar tree,
//! with a ratatui widget on top.
//!
//! The engine derives what the tree shows from three inputs (dataset, filter
//! text, selected id) plus the persisted expansion flags, and answers keyboard
//! actions with focus moves. Derivations are memoized in a small LRU cache.
//!
//! Feature flags:
//! - `keymap` (default): crossterm-based key bindings and `SidebarTreeState::handle_*key*` helpers.
//! - `serde`: serde support for `SidebarNode`, `SidebarConfig` and `SidebarSnapshot`.

mod action;
mod cache;
mod config;
mod derive;
mod error;
mod filter;
mod focus;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod model;
pub mod nav;
pub mod prelude;
mod render;
mod rows;
mod state;
mod style;
mod widget;

pub use action::{TreeAction, TreeEvent};
pub use cache::{DeriveCache, LruMap};
pub use config::{CachePolicy, CollapseFocus, DEFAULT_CACHE_CAPACITY, SidebarConfig};
pub use derive::{TreeDerivation, ViewState, derive_state, derive_tree};
pub use error::{DatasetError, Result};
pub use filter::{NameFilter, filter_dataset, filter_with};
pub use focus::{FocusHost, element_id, parse_element_id};
pub use glyphs::TreeGlyphs;
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TreeKeyBindings};
pub use model::{Dataset, ExpandedMap, NoFilter, NodeFilter, SidebarNode};
pub use nav::VisibleNode;
pub use render::{DefaultRenderer, SidebarRenderer, row_line};
pub use rows::{RowKind, SidebarRow, build_rows};
pub use state::{SidebarSnapshot, SidebarTreeState};
pub use style::{SidebarStyle, TreeScrollPolicy};
pub use widget::SidebarTreeView;
