// crates/planboard-client/src/components/status_bar.rs

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Panel};

pub fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let hint = Style::default().fg(Color::Yellow);
    let text = Style::default().fg(Color::Gray);

    let spans: Vec<Span> = if app.notice.is_some() {
        vec![
            Span::styled("Enter", hint.add_modifier(Modifier::BOLD)),
            Span::styled(" dismiss the message", text),
        ]
    } else if app.picker.is_some() {
        vec![
            Span::styled("Space", hint),
            Span::styled(" toggle  ", text),
            Span::styled("Tab", hint),
            Span::styled(" kind  ", text),
            Span::styled("Enter", hint),
            Span::styled(" apply  ", text),
            Span::styled("Esc", hint),
            Span::styled(" cancel", text),
        ]
    } else if matches!(app.input_mode, InputMode::Chat) {
        vec![
            Span::styled("Enter", hint),
            Span::styled(" send  ", text),
            Span::styled("Esc", hint),
            Span::styled(" cancel", text),
        ]
    } else {
        let mut spans = vec![
            Span::styled("Tab", hint),
            Span::styled(" panel  ", text),
            Span::styled("c", hint),
            Span::styled(" rows  ", text),
            Span::styled("g", hint),
            Span::styled(" refresh  ", text),
        ];
        if matches!(app.current_panel, Panel::Demands) {
            spans.extend([
                Span::styled("Space", hint),
                Span::styled(" select  ", text),
                Span::styled("f/b", hint),
                Span::styled(" plan  ", text),
                Span::styled("u", hint),
                Span::styled(" unplan  ", text),
            ]);
        }
        if !app.connected {
            spans.extend([
                Span::styled("r", hint),
                Span::styled(" reconnect  ", text),
            ]);
        }
        spans.extend([
            Span::styled("F1", hint),
            Span::styled(" help  ", text),
            Span::styled("q", hint),
            Span::styled(" quit", text),
        ]);
        spans
    };

    let bar = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(bar, area);
}
