// crates/planboard-client/src/components/chat.rs

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode, Panel};

pub fn draw_chat(f: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.current_panel, Panel::Chat);
    let block = Block::default()
        .title(" Chat ")
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(block.inner(area));
    f.render_widget(block, area);

    let visible = chunks[0].height as usize;
    let messages: Vec<ListItem> = app
        .chat
        .iter()
        .rev()
        .take(visible.max(1))
        .rev()
        .map(|message| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    message.date.format("%H:%M ").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}: ", message.name),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(message.value.clone()),
            ]))
        })
        .collect();
    f.render_widget(List::new(messages), chunks[0]);

    let input = match app.input_mode {
        InputMode::Chat => Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Yellow)),
            Span::raw(app.chat_input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        InputMode::Normal => Line::from(Span::styled(
            "Press Enter to chat",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(input), chunks[1]);
}
