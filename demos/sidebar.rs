// Sidebar demo: a storybook-style tree, a few key presses, a filter, and a custom link renderer.
// Set RUST_LOG=tui_sidebar_tree=debug to watch derivations and focus moves.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tui_sidebar_tree::{
    Dataset, SidebarConfig, SidebarNode, SidebarRenderer, SidebarRow, SidebarStyle,
    SidebarTreeState, SidebarTreeView, TreeGlyphs,
};

// Two sections plus one ungrouped story.
fn dataset() -> Dataset {
    Dataset::from_nodes([
        SidebarNode::branch("components", "Components", ["button", "card"]).as_root(),
        SidebarNode::branch("button", "Button", ["button--primary", "button--secondary"]),
        SidebarNode::leaf("button--primary", "Primary"),
        SidebarNode::leaf("button--secondary", "Secondary"),
        SidebarNode::branch("card", "Card", ["card--default"]),
        SidebarNode::leaf("card--default", "Default"),
        SidebarNode::branch("pages", "Pages", ["login"]).as_root(),
        SidebarNode::leaf("login", "Login"),
        SidebarNode::leaf("welcome", "Welcome"),
    ])
}

// Renderer override: only the link wrapper changes, showing the element id.
struct LinkIds;

impl SidebarRenderer for LinkIds {
    fn link<'a>(
        &self,
        _row: &SidebarRow<'a>,
        element_id: &str,
        mut content: Vec<Span<'a>>,
    ) -> Vec<Span<'a>> {
        content.push(Span::raw(format!("  #{element_id}")));
        content
    }
}

// Dump the buffer so the demo output is visible without a terminal.
fn print(buffer: &Buffer) {
    for y in 0..buffer.area.height {
        let line: String = (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect();
        println!("{}", line.trim_end());
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // State lives across frames; the selection opens its ancestors.
    let mut state = SidebarTreeState::with_config(
        dataset(),
        SidebarConfig::default().with_id_prefix("explorer"),
    );
    state.set_selected(Some("card--default"));

    // Simulated key presses against the focused node.
    for code in [KeyCode::Down, KeyCode::Right, KeyCode::Right, KeyCode::Down] {
        let event = state.handle_focused_key(KeyEvent::new(code, KeyModifiers::NONE));
        // A real host would focus the element and stop the default key handling here.
        let mut host = |element: &str| {
            println!("focus -> {element}");
            true
        };
        state.apply_focus(&mut host, &event);
    }

    let area = Rect::new(0, 0, 48, 14);
    let style = SidebarStyle {
        title: Some(Line::from(" Stories ")),
        ..SidebarStyle::default()
    };

    let mut buffer = Buffer::empty(area);
    SidebarTreeView::new(style.clone())
        .glyphs(TreeGlyphs::ascii())
        .render(area, &mut buffer, &mut state);
    print(&buffer);

    // Narrow the tree and render through the custom link strategy.
    state.set_filter("prim");
    let mut buffer = Buffer::empty(area);
    SidebarTreeView::new(style)
        .with_renderer(&LinkIds)
        .glyphs(TreeGlyphs::ascii())
        .render(area, &mut buffer, &mut state);
    print(&buffer);
}
