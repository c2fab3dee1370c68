// crates/planboard-client/src/components/help.rs

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::app::App;
use crate::ui::centered_rect;

pub fn draw_help(f: &mut Frame, _app: &App) {
    let area = centered_rect(60, 70, f.size());
    f.render_widget(Clear, area);

    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let entries = [
        ("Tab / Shift-Tab", "cycle panels"),
        ("c", "choose board rows"),
        ("g", "refresh the catalog"),
        ("r", "reconnect when offline"),
        ("Up / Down", "move in the focused panel"),
        ("Space", "select a demand"),
        ("a / n", "select all / none"),
        ("t", "track selected demands on the board"),
        ("f / b", "plan selection forward / backward"),
        ("u", "unplan selection"),
        ("Enter", "chat (in the chat panel)"),
        ("F1", "toggle this help"),
        ("q", "quit"),
    ];

    let items: Vec<ListItem> = entries
        .iter()
        .map(|(keys, what)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{keys:>16}"), key),
                Span::raw("  "),
                Span::raw(*what),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(list, area);
}
