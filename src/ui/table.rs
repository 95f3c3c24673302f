//! Projection of the record list into the visual table. The table is rebuilt
//! from scratch on every draw: one row per record, no diffing, linear in
//! list size. Fine at the scale of a daily register.

use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::models::{Record, Status};

const COLUMN_TITLES: [&str; 5] = ["Date", "Reel Code", "Weight", "Zone", "Status"];

const COLUMN_WIDTHS: [Constraint; 5] = [
    Constraint::Length(12),
    Constraint::Min(12),
    Constraint::Length(12),
    Constraint::Length(8),
    Constraint::Min(10),
];

/// Visual marker for a status value. Three-way branch: the two known states
/// get their own colors, everything else falls through to the neutral one.
pub(crate) fn status_style(status: &Status) -> Style {
    match status {
        Status::Processed => Style::default().fg(Color::Green),
        Status::Pending => Style::default().fg(Color::Yellow),
        Status::Other(_) => Style::default().fg(Color::DarkGray),
    }
}

/// Rebuild every table row from the current list.
pub(crate) fn build_rows(records: &[Record]) -> Vec<Row<'static>> {
    records
        .iter()
        .map(|record| {
            Row::new(vec![
                Cell::from(record.date.clone()),
                Cell::from(record.reel_code.clone()),
                Cell::from(record.weight_display()),
                Cell::from(record.zone.clone()),
                Cell::from(Span::styled(
                    record.status.to_string(),
                    status_style(&record.status),
                )),
            ])
        })
        .collect()
}

/// Draw the records table, or the empty-state hint when there is nothing to
/// show yet.
pub(crate) fn render(frame: &mut Frame, area: Rect, records: &[Record], state: &mut TableState) {
    let block = Block::default().borders(Borders::ALL).title("Inward Records");

    if records.is_empty() {
        let message = Paragraph::new("No inward entries yet. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(COLUMN_TITLES.map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let table = Table::new(build_rows(records), COLUMN_WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, state);
}
