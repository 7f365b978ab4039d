use ratatui::text::{Line, Span};

use crate::glyphs::TreeGlyphs;
use crate::rows::{RowKind, SidebarRow};

/// Pluggable renderer strategies for every part of the sidebar.
///
/// Each method has a built-in default, so an implementation only overrides the
/// parts it wants to change. The engine hands over data only; how it looks is up
/// to the renderer.
pub trait SidebarRenderer {
    /// Filter input shown above the tree.
    fn filter_box<'a>(&self, filter: &'a str, glyphs: &TreeGlyphs<'a>) -> Line<'a> {
        let text = if filter.is_empty() {
            Span::raw("Filter")
        } else {
            Span::raw(filter)
        };
        Line::from(vec![Span::raw(glyphs.filter), Span::raw(" "), text])
    }

    /// Container around a section title.
    fn section<'a>(&self, title: Line<'a>) -> Line<'a> {
        title
    }

    /// Section title text.
    fn title<'a>(&self, row: &SidebarRow<'a>) -> Line<'a> {
        Line::from(row.label.to_uppercase())
    }

    /// Indentation of a list nested at `depth`.
    fn list<'a>(&self, depth: u16, glyphs: &TreeGlyphs<'a>) -> Span<'a> {
        Span::raw(glyphs.indent.repeat(usize::from(depth)))
    }

    /// Branch head: expander and name.
    fn head<'a>(&self, row: &SidebarRow<'a>, glyphs: &TreeGlyphs<'a>) -> Vec<Span<'a>> {
        let expander = if row.is_expanded {
            glyphs.expanded
        } else {
            glyphs.collapsed
        };
        vec![Span::raw(expander), Span::raw(" "), Span::raw(row.label)]
    }

    /// Leaf: marker and name.
    fn leaf<'a>(&self, row: &SidebarRow<'a>, glyphs: &TreeGlyphs<'a>) -> Vec<Span<'a>> {
        vec![Span::raw(glyphs.leaf), Span::raw(" "), Span::raw(row.label)]
    }

    /// Wraps a focusable row; `element_id` is the row's host-addressable id.
    fn link<'a>(
        &self,
        _row: &SidebarRow<'a>,
        _element_id: &str,
        content: Vec<Span<'a>>,
    ) -> Vec<Span<'a>> {
        content
    }

    /// Zero-result notice.
    fn empty_message<'a>(&self, row: &SidebarRow<'a>) -> Line<'a> {
        Line::from(row.label)
    }
}

/// Renderer that keeps every built-in strategy.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRenderer;

impl SidebarRenderer for DefaultRenderer {}

/// Renders one row through the strategies of `renderer`.
pub fn row_line<'a, R>(
    renderer: &R,
    row: &SidebarRow<'a>,
    element_id: &str,
    glyphs: &TreeGlyphs<'a>,
) -> Line<'a>
where
    R: SidebarRenderer + ?Sized,
{
    match row.kind {
        RowKind::SectionTitle => renderer.section(renderer.title(row)),
        RowKind::Message => renderer.empty_message(row),
        RowKind::Head | RowKind::Leaf => {
            let content = if row.kind == RowKind::Head {
                renderer.head(row, glyphs)
            } else {
                renderer.leaf(row, glyphs)
            };
            let mut spans = Vec::with_capacity(content.len() + 1);
            spans.push(renderer.list(row.depth, glyphs));
            spans.extend(renderer.link(row, element_id, content));
            Line::from(spans)
        }
    }
}
