// crates/planboard-client/src/components/board.rs

use chrono::{DateTime, Duration, Utc};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use planboard_core::{EntityPlan, FlowPoint};

use crate::app::{App, BoardRow, Panel};

const LEVEL_GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn draw_board(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Board ")
        .borders(Borders::ALL)
        .border_style(if matches!(app.current_panel, Panel::Board) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    let rows = app.board.rows_in_order();
    if rows.is_empty() {
        let hint = Paragraph::new("No rows on the board. Press c to choose rows.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(hint, area);
        return;
    }

    let window = time_window(&rows);
    let bar_width = area.width.saturating_sub(34).max(10) as usize;

    let visible = area.height.saturating_sub(4) as usize;
    let start = app.board_scroll.min(rows.len().saturating_sub(1));
    let shown = rows.iter().skip(start).take(visible.max(1));

    let table_rows: Vec<Row> = shown
        .map(|row| {
            let bar = bar_line(&row.plan, window, bar_width);
            Row::new(vec![
                Cell::from(format!("{}", row.index)),
                Cell::from(row.key.to_string()),
                Cell::from(summary(&row.plan)),
                Cell::from(bar).style(Style::default().fg(row_color(&row.plan))),
            ])
        })
        .collect();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Row"),
        Cell::from("Info"),
        Cell::from(format!(
            "{} .. {}",
            window.0.format("%b %d"),
            window.1.format("%b %d")
        )),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(4),
        Constraint::Length(22),
        Constraint::Length(12),
        Constraint::Min(10),
    ];
    let table = Table::new(table_rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

// ---- Timeline helpers ----

/// The span of time the bars cover: the extent of every drawn plan,
/// padded so single points still show.
fn time_window(rows: &[&BoardRow]) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    for row in rows {
        let Some((from, to)) = plan_bounds(&row.plan) else {
            continue;
        };
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(from), hi.max(to)),
            None => (from, to),
        });
    }
    match bounds {
        Some((lo, hi)) if hi > lo => (lo, hi),
        Some((lo, _)) => (lo, lo + Duration::days(1)),
        None => {
            let now = Utc::now();
            (now, now + Duration::days(7))
        }
    }
}

fn plan_bounds(plan: &EntityPlan) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let mut bounds: Option<(DateTime<Utc>, DateTime<Utc>)> = None;
    let mut fold = |from: DateTime<Utc>, to: DateTime<Utc>| {
        bounds = Some(match bounds {
            Some((lo, hi)) => (lo.min(from), hi.max(to)),
            None => (from, to),
        });
    };
    match plan {
        EntityPlan::Operation(spans) => {
            for span in spans {
                fold(span.start, span.end);
            }
        }
        EntityPlan::Resource(loads) => {
            for load in loads.iter().filter(|l| l.quantity >= 0.0) {
                fold(load.start, load.end);
            }
        }
        EntityPlan::Buffer(flows) => {
            for flow in flows {
                fold(flow.date, flow.date);
            }
        }
        EntityPlan::Demand(detail) => {
            fold(detail.due, detail.due);
            for span in &detail.deliveries {
                fold(span.start, span.end);
            }
        }
    }
    bounds
}

fn cell_of(t: DateTime<Utc>, window: (DateTime<Utc>, DateTime<Utc>), width: usize) -> usize {
    let total = (window.1 - window.0).num_seconds().max(1);
    let offset = (t - window.0).num_seconds().clamp(0, total);
    let last = width.saturating_sub(1);
    ((offset as f64 / total as f64) * last as f64).round() as usize
}

/// One text bar for a row: filled blocks for spans, a level profile
/// for buffers, a due marker for demands.
fn bar_line(plan: &EntityPlan, window: (DateTime<Utc>, DateTime<Utc>), width: usize) -> String {
    let mut cells = vec![' '; width];
    let mut fill = |from: DateTime<Utc>, to: DateTime<Utc>| {
        let a = cell_of(from, window, width);
        let b = cell_of(to, window, width);
        for cell in cells.iter_mut().take(b + 1).skip(a) {
            *cell = '█';
        }
    };
    match plan {
        EntityPlan::Operation(spans) => {
            for span in spans {
                fill(span.start, span.end);
            }
        }
        EntityPlan::Resource(loads) => {
            // Negative quantities are the unloading side; the board
            // only shows capacity in use.
            for load in loads.iter().filter(|l| l.quantity >= 0.0) {
                fill(load.start, load.end);
            }
        }
        EntityPlan::Buffer(flows) => {
            level_profile(&mut cells, flows, window);
        }
        EntityPlan::Demand(detail) => {
            for span in &detail.deliveries {
                fill(span.start, span.end);
            }
            let due = cell_of(detail.due, window, width);
            if let Some(cell) = cells.get_mut(due) {
                *cell = '▼';
            }
        }
    }
    cells.into_iter().collect()
}

/// Paint the on-hand level across the bar, carried forward between
/// flow points.
fn level_profile(cells: &mut [char], flows: &[FlowPoint], window: (DateTime<Utc>, DateTime<Utc>)) {
    if flows.is_empty() {
        return;
    }
    let peak = flows.iter().map(|p| p.onhand).fold(0.0_f64, f64::max);
    let total = (window.1 - window.0).num_seconds().max(1);
    let width = cells.len();
    for (i, cell) in cells.iter_mut().enumerate() {
        let at = window.0 + Duration::seconds(total * i as i64 / width.max(1) as i64);
        let onhand = flows
            .iter()
            .take_while(|p| p.date <= at)
            .last()
            .map(|p| p.onhand)
            .unwrap_or(0.0);
        let bucket = if peak > 0.0 {
            ((onhand / peak) * 8.0).clamp(0.0, 8.0) as usize
        } else {
            0
        };
        *cell = LEVEL_GLYPHS[bucket];
    }
}

fn summary(plan: &EntityPlan) -> String {
    match plan {
        EntityPlan::Operation(spans) => {
            let qty: f64 = spans.iter().map(|s| s.quantity).sum();
            format!("{} x {:.0}", spans.len(), qty)
        }
        EntityPlan::Resource(loads) => {
            let used = loads.iter().filter(|l| l.quantity >= 0.0).count();
            format!("{used} loads")
        }
        EntityPlan::Buffer(flows) => match flows.last() {
            Some(last) => format!("end {:.0}", last.onhand),
            None => "empty".to_string(),
        },
        EntityPlan::Demand(detail) => {
            format!("{:.0}/{:.0}", detail.planned, detail.quantity)
        }
    }
}

fn row_color(plan: &EntityPlan) -> Color {
    match plan {
        EntityPlan::Operation(_) => Color::Green,
        EntityPlan::Resource(_) => Color::Yellow,
        EntityPlan::Buffer(_) => Color::Blue,
        EntityPlan::Demand(detail) => {
            if detail.planned + 1e-9 < detail.quantity {
                Color::Red
            } else {
                Color::Magenta
            }
        }
    }
}
