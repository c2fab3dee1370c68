// crates/planboard-client/src/components/notice.rs

use ratatui::{
    layout::Alignment,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::centered_rect;

/// A blocking message box. While it is up every key except the
/// dismissal is ignored.
pub fn draw_notice(f: &mut Frame, app: &App) {
    let Some(message) = &app.notice else {
        return;
    };

    let area = centered_rect(50, 30, f.size());
    f.render_widget(Clear, area);

    let body = vec![
        Line::from(Span::raw(message.clone())),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let paragraph = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Notice ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(paragraph, area);
}
