//! UI widgets for the dashboard

pub mod stream;
pub mod table;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::App;
use sse_client::ConnectionState;

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_main(frame, app, chunks[1]);
    draw_footer(frame, app, chunks[2]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.connection_state();
    let status_color = match state {
        ConnectionState::Connected => Color::Green,
        ConnectionState::Connecting | ConnectionState::Reconnecting => Color::Yellow,
        ConnectionState::Disconnected | ConnectionState::ShuttingDown => Color::Red,
    };

    let header_text = format!(" Stream: {} | {}", state, app.stream_summary());

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Trade Review Dashboard "),
        );

    frame.render_widget(header, area);
}

fn draw_main(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let tables = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);

    let snapshot = app.snapshot_state.read().table_view();
    table::draw(frame, &snapshot, "Latest Rows", tables[0]);

    let orders = app.pending_orders_state.read().table_view();
    table::draw(frame, &orders, "Pending Orders", tables[1]);

    stream::draw(frame, app, columns[1]);
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let status = app.status_message.as_deref().unwrap_or("");
    let snapshot_summary = app.snapshot_summary();

    let footer_text = if status.is_empty() {
        format!(
            " {} | q=quit r=refresh o=orders j/k=scroll g/G=top/bottom",
            snapshot_summary
        )
    } else {
        format!(" {} | {}", snapshot_summary, status)
    };

    let footer = Paragraph::new(footer_text).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
