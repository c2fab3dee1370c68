// crates/planboard-client/src/components/picker.rs

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs},
    Frame,
};

use planboard_core::{EntityKey, EntityKind};

use crate::app::App;
use crate::ui::centered_rect;

pub fn draw_picker(f: &mut Frame, app: &App) {
    let Some(picker) = &app.picker else {
        return;
    };

    let area = centered_rect(70, 70, f.size());
    f.render_widget(Clear, area);

    let block = Block::default()
        .title(" Choose board rows ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let titles: Vec<Line> = EntityKind::ALL
        .iter()
        .map(|kind| Line::from(kind.as_str()))
        .collect();
    let tabs = Tabs::new(titles)
        .select(picker.kind_cursor)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[0]);

    let kind = EntityKind::ALL[picker.kind_cursor];
    let names = app.catalog.names(kind);
    let visible = (chunks[1].height as usize).max(1);
    let start = picker.name_cursor.saturating_sub(visible - 1);

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, name)| {
            let key = EntityKey::new(kind, *name);
            let mark = if picker.chosen.contains(&key) {
                "[x] "
            } else {
                "[ ] "
            };
            let style = if i == picker.name_cursor {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else if picker.chosen.contains(&key) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![Span::raw(mark), Span::raw(*name)])).style(style)
        })
        .collect();
    f.render_widget(List::new(items), chunks[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Space: toggle  Tab: kind  Enter: apply  Esc: cancel",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(footer, chunks[2]);
}
