use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::action::TreeAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    /// Arrow keys plus `h`/`j`/`k`/`l`.
    #[default]
    Default,
    Vim,
    Arrows,
}

/// Resolves raw key events into tree actions.
#[derive(Clone, Copy, Debug)]
pub struct TreeKeyBindings {
    profile: KeymapProfile,
}

impl Default for TreeKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    /// Returns the action bound to `key`, or `None` for keys the tree ignores.
    ///
    /// Release events never resolve, so a press is handled exactly once.
    pub fn resolve(&self, key: KeyEvent) -> Option<TreeAction> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => Self::resolve_default_nav(key),
            KeymapProfile::Vim => Self::resolve_vim_nav(key),
            KeymapProfile::Arrows => Self::resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        Self::resolve_common(key)
    }

    /// Like [`resolve`](Self::resolve), but consults `custom` first.
    pub fn resolve_with<F>(&self, key: KeyEvent, custom: F) -> Option<TreeAction>
    where
        F: Fn(KeyEvent) -> Option<TreeAction>,
    {
        if let Some(action) = custom(key) {
            return Some(action);
        }

        self.resolve(key)
    }

    const fn resolve_default_nav(key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(TreeAction::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(TreeAction::MoveDown),
            KeyCode::Left | KeyCode::Char('h') => Some(TreeAction::Collapse),
            KeyCode::Right | KeyCode::Char('l') => Some(TreeAction::Expand),
            _ => None,
        }
    }

    const fn resolve_vim_nav(key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Char('k') => Some(TreeAction::MoveUp),
            KeyCode::Char('j') => Some(TreeAction::MoveDown),
            KeyCode::Char('h') => Some(TreeAction::Collapse),
            KeyCode::Char('l') => Some(TreeAction::Expand),
            _ => None,
        }
    }

    const fn resolve_arrow_nav(key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Up => Some(TreeAction::MoveUp),
            KeyCode::Down => Some(TreeAction::MoveDown),
            KeyCode::Left => Some(TreeAction::Collapse),
            KeyCode::Right => Some(TreeAction::Expand),
            _ => None,
        }
    }

    const fn resolve_common(key: KeyEvent) -> Option<TreeAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => Some(TreeAction::Toggle),
            _ => None,
        }
    }
}
