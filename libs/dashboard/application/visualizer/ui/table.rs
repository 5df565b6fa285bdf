//! Table widget - renders a [`TableView`]

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::domain::{TableRow, TableView};

pub fn draw(frame: &mut Frame, view: &TableView, title: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = Vec::new();
    if view.caption.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if view.error.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut next = 0;
    if let Some(caption) = &view.caption {
        let caption = Paragraph::new(caption.as_str()).style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        );
        frame.render_widget(caption, chunks[next]);
        next += 1;
    }
    if let Some(error) = &view.error {
        let error = Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red));
        frame.render_widget(error, chunks[next]);
        next += 1;
    }

    draw_rows(frame, view, chunks[next]);
}

fn draw_rows(frame: &mut Frame, view: &TableView, area: Rect) {
    let columns = view.column_count().max(1) as u32;
    let widths = vec![Constraint::Ratio(1, columns); columns as usize];

    let header = Row::new(view.headers.iter().copied()).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = view
        .rows
        .iter()
        .filter_map(|row| row.cells())
        .map(|cells| Row::new(cells.iter().cloned()))
        .collect();

    frame.render_widget(Table::new(rows, widths).header(header), area);

    // ratatui tables have no column span; draw spanning rows across the body
    let spanning = view.rows.iter().filter_map(|row| match row {
        TableRow::Spanning { text, .. } => Some(text.as_str()),
        TableRow::Cells(_) => None,
    });
    for (i, text) in spanning.enumerate() {
        let y = area.y + 1 + i as u16;
        if y >= area.y + area.height {
            break;
        }
        let line = Rect::new(area.x, y, area.width, 1);
        let placeholder = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, line);
    }
}
