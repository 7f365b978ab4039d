use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::text::Span;
use ratatui::widgets::{Block, StatefulWidget, Widget};

use crate::glyphs::TreeGlyphs;
use crate::render::{DefaultRenderer, SidebarRenderer, row_line};
use crate::rows::RowKind;
use crate::state::SidebarTreeState;
use crate::style::SidebarStyle;

/// Sidebar tree widget: optional filter box above the section/branch/leaf rows.
pub struct SidebarTreeView<'a, R = DefaultRenderer>
where
    R: SidebarRenderer,
{
    renderer: &'a R,
    style: SidebarStyle<'a>,
    glyphs: TreeGlyphs<'a>,
    show_filter: bool,
}

impl<'a> SidebarTreeView<'a, DefaultRenderer> {
    pub const fn new(style: SidebarStyle<'a>) -> Self {
        Self {
            renderer: &DefaultRenderer,
            style,
            glyphs: TreeGlyphs::unicode(),
            show_filter: true,
        }
    }
}

impl<'a, R: SidebarRenderer> SidebarTreeView<'a, R> {
    /// Swaps in custom renderer strategies.
    pub fn with_renderer<S: SidebarRenderer>(self, renderer: &'a S) -> SidebarTreeView<'a, S> {
        SidebarTreeView {
            renderer,
            style: self.style,
            glyphs: self.glyphs,
            show_filter: self.show_filter,
        }
    }

    #[must_use]
    pub const fn glyphs(mut self, glyphs: TreeGlyphs<'a>) -> Self {
        self.glyphs = glyphs;
        self
    }

    #[must_use]
    pub const fn show_filter(mut self, show: bool) -> Self {
        self.show_filter = show;
        self
    }

    fn row_style(&self, kind: RowKind, is_selected: bool) -> ratatui::style::Style {
        match kind {
            RowKind::SectionTitle => self.style.section_style,
            RowKind::Message => self.style.message_style,
            RowKind::Head | RowKind::Leaf if is_selected => self.style.selected_style,
            RowKind::Head | RowKind::Leaf => ratatui::style::Style::default(),
        }
    }
}

impl<R: SidebarRenderer> StatefulWidget for SidebarTreeView<'_, R> {
    type State = SidebarTreeState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut block = Block::default().borders(self.style.borders);
        if let Some(title) = self.style.title.clone() {
            block = block.title(title);
        }
        block = block
            .style(self.style.block_style)
            .border_style(self.style.border_style);
        let mut inner = block.inner(area);
        block.render(area, buf);

        if self.show_filter && inner.height > 0 {
            let line = self
                .renderer
                .filter_box(state.filter(), &self.glyphs)
                .patch_style(self.style.filter_style);
            line.render(Rect { height: 1, ..inner }, buf);
            inner.y += 1;
            inner.height -= 1;
        }
        if inner.height == 0 {
            return;
        }

        let (focus_row, total_rows) = {
            let rows = state.rows();
            let focus_row = rows
                .iter()
                .position(|row| row.is_focusable() && row.id() == state.focused());
            (focus_row, rows.len())
        };
        state.ensure_focus_visible(
            focus_row,
            total_rows,
            usize::from(inner.height),
            self.style.scroll_policy,
        );

        let offset = state.offset();
        let padding = " ".repeat(self.style.highlight_symbol.chars().count());
        let rows = state.rows();
        let visible = rows
            .iter()
            .enumerate()
            .skip(offset)
            .take(usize::from(inner.height));
        for (line_y, (idx, row)) in (inner.y..).zip(visible) {
            let element = row
                .id()
                .map(|id| state.element_id(id))
                .unwrap_or_default();
            let mut line = row_line(self.renderer, row, &element, &self.glyphs)
                .patch_style(self.row_style(row.kind, row.is_selected));
            let marker = if focus_row == Some(idx) {
                line = line.patch_style(self.style.focus_style);
                Span::raw(self.style.highlight_symbol)
            } else {
                Span::raw(padding.as_str())
            };
            line.spans.insert(0, marker);
            line.render(
                Rect {
                    y: line_y,
                    height: 1,
                    ..inner
                },
                buf,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CachePolicy, SidebarConfig};
    use crate::model::{Dataset, SidebarNode};

    fn state() -> SidebarTreeState {
        let mut nodes = vec![SidebarNode::branch(
            "root",
            "Stories",
            (0..12).map(|idx| format!("n{idx}")),
        )
        .as_root()];
        nodes.extend((0..12).map(|idx| SidebarNode::leaf(format!("n{idx}"), format!("node-{idx}"))));
        SidebarTreeState::with_config(
            Dataset::from_nodes(nodes),
            SidebarConfig::default().with_cache(CachePolicy::Disabled),
        )
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn renders_filter_title_and_rows() {
        let mut state = state();
        let area = Rect::new(0, 0, 24, 8);
        let mut buffer = Buffer::empty(area);

        SidebarTreeView::new(SidebarStyle::default())
            .glyphs(TreeGlyphs::ascii())
            .render(area, &mut buffer, &mut state);

        assert!(row_text(&buffer, 1).contains("/ Filter"));
        assert!(row_text(&buffer, 2).contains("STORIES"));
        assert!(row_text(&buffer, 3).contains("* node-0"));
    }

    #[test]
    fn scrolls_to_keep_focus_visible() {
        let mut state = state();
        state.set_focus("n11");
        let area = Rect::new(0, 0, 24, 6);
        let mut buffer = Buffer::empty(area);

        SidebarTreeView::new(SidebarStyle::default())
            .glyphs(TreeGlyphs::ascii())
            .show_filter(false)
            .render(area, &mut buffer, &mut state);

        assert!(row_text(&buffer, 4).contains(">> * node-11"));
    }

    #[test]
    fn zero_results_render_message() {
        let mut state = state();
        state.set_filter("nothing");
        let area = Rect::new(0, 0, 40, 4);
        let mut buffer = Buffer::empty(area);

        SidebarTreeView::new(SidebarStyle::default()).render(area, &mut buffer, &mut state);

        assert!(row_text(&buffer, 2).contains("This filter resulted in 0 results"));
    }
}
