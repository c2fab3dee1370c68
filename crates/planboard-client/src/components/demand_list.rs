// crates/planboard-client/src/components/demand_list.rs

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Panel};

pub fn draw_demand_list(f: &mut Frame, area: Rect, app: &App) {
    let focused = matches!(app.current_panel, Panel::Demands);
    let block = Block::default()
        .title(format!(
            " Demands ({} selected) ",
            app.selected_demands.len()
        ))
        .borders(Borders::ALL)
        .border_style(if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if app.catalog.demands.is_empty() {
        let hint = Paragraph::new("No demands loaded. Press g to refresh.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let visible = (area.height.saturating_sub(4) as usize).max(1);
    // Keep the cursor row in view.
    let start = app.demand_cursor.saturating_sub(visible - 1);

    let rows: Vec<Row> = app
        .catalog
        .demands
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(i, info)| {
            let marker = if app.selected_demands.contains(&info.name) {
                "*"
            } else {
                " "
            };
            let style = if focused && i == app.demand_cursor {
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else if app.selected_demands.contains(&info.name) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(info.name.clone()),
                Cell::from(info.item.clone()),
                Cell::from(info.customer.clone()),
                Cell::from(format!("{:.0}", info.quantity)),
                Cell::from(info.due.format("%b %d").to_string()),
                Cell::from(format!("{}", info.priority)),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec![
        Cell::from(" "),
        Cell::from("Demand"),
        Cell::from("Item"),
        Cell::from("Customer"),
        Cell::from("Qty"),
        Cell::from("Due"),
        Cell::from("Prio"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(1),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
