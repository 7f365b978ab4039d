use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Borders;

/// Scroll policy applied when the focused row changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TreeScrollPolicy {
    #[default]
    KeepInView,
    CenterOnSelect,
}

/// Visual settings of the sidebar widget.
#[derive(Clone)]
pub struct SidebarStyle<'a> {
    pub title: Option<Line<'a>>,
    pub block_style: Style,
    pub border_style: Style,
    /// Applied to the row holding input focus.
    pub focus_style: Style,
    /// Applied to the externally selected row.
    pub selected_style: Style,
    pub section_style: Style,
    pub message_style: Style,
    pub filter_style: Style,
    pub highlight_symbol: &'a str,
    pub borders: Borders,
    pub scroll_policy: TreeScrollPolicy,
}

impl Default for SidebarStyle<'_> {
    fn default() -> Self {
        Self {
            title: None,
            block_style: Style::default(),
            border_style: Style::default(),
            focus_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            section_style: Style::default().add_modifier(Modifier::BOLD),
            message_style: Style::default().add_modifier(Modifier::ITALIC),
            filter_style: Style::default(),
            highlight_symbol: ">> ",
            borders: Borders::ALL,
            scroll_policy: TreeScrollPolicy::KeepInView,
        }
    }
}
