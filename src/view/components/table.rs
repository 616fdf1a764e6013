use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Cell, Row, Table},
    Frame,
};

use crate::app::App;
use crate::data::AREA_PREFIX;
use crate::icons;

use super::popups::truncate_string;

/// Render the repository labels inside the picker
pub fn render_label_table(f: &mut Frame, app: &App, area: Rect) {
    let rows: Vec<Row> = app
        .visible_labels()
        .iter()
        .map(|label| {
            let mark = if app.is_selected(&label.name) {
                icons::CHECKED
            } else {
                icons::UNCHECKED
            };
            // Area labels decide the tab group, so they stand out
            let name_style = if label.name.starts_with(AREA_PREFIX) {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::White)
            };
            Row::new(vec![
                Cell::from(mark).style(Style::default().fg(Color::Green)),
                Cell::from(truncate_string(&label.name, 40)).style(name_style),
            ])
        })
        .collect();

    let widths = [Constraint::Length(4), Constraint::Min(10)];
    let table = Table::new(rows, widths)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(icons::SELECTOR);

    f.render_stateful_widget(table, area, &mut app.picker_state.clone());
}
