//! Stream widget - pretty-printed events, newest at the bottom

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::application::visualizer::App;

pub fn draw(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.event_offset == 0 {
        " Livestream ".to_string()
    } else {
        format!(" Livestream (+{} newer) ", app.event_offset)
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let height = block.inner(area).height as usize;

    let state = app.stream_state.read();
    if state.is_empty() {
        let empty = Paragraph::new(" No messages yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    // Walk back from the newest visible event until the pane is full
    let visible = state.len().saturating_sub(app.event_offset);
    let mut blocks: Vec<Vec<Line>> = Vec::new();
    let mut used = 0;
    for event in state.events().take(visible).rev() {
        if used >= height {
            break;
        }
        let mut lines = vec![Line::from(Span::styled(
            format!(
                "#{} {}",
                event.seq,
                event.received_at.format("%H:%M:%S%.3f")
            ),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))];
        lines.extend(event.pretty().lines().map(|l| Line::from(l.to_string())));
        used += lines.len();
        blocks.push(lines);
    }

    let mut lines: Vec<Line> = blocks.into_iter().rev().flatten().collect();
    if lines.len() > height {
        lines.drain(..lines.len() - height);
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
