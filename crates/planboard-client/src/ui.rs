// crates/planboard-client/src/ui.rs

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::components::{
    draw_board, draw_chat, draw_demand_list, draw_help, draw_notice, draw_picker, draw_status_bar,
};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(f.size());

    draw_header(f, chunks[0], app);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_board(f, main[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(main[1]);

    draw_demand_list(f, right[0], app);
    draw_chat(f, right[1], app);

    draw_status_bar(f, chunks[2], app);

    if app.picker.is_some() {
        draw_picker(f, app);
    }
    if app.show_help {
        draw_help(f, app);
    }
    // The notice goes last: it blocks everything underneath.
    if app.notice.is_some() {
        draw_notice(f, app);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let title = Paragraph::new(Line::from(vec![Span::styled(
        " Planning Board ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Left);
    f.render_widget(title, chunks[0]);

    let (marker, label, color) = if app.connected {
        ("●", "Connected", Color::Green)
    } else {
        ("○", "Offline", Color::Red)
    };
    let connection = Paragraph::new(Line::from(vec![
        Span::styled(marker, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(color)),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center);
    f.render_widget(connection, chunks[1]);

    let who = Paragraph::new(Line::from(vec![
        Span::raw("User: "),
        Span::styled(
            app.user.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  Rows: {}", app.registry.len())),
    ]))
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Right);
    f.render_widget(who, chunks[2]);
}

/// A centered sub-rectangle, sized as percentages of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
