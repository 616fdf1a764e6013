use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::icons;

/// Render the label picker's filter line
pub fn render_picker_query(f: &mut Frame, app: &App, area: Rect) {
    let total_count = app.available_labels.len();
    let filtered_count = app.picker_matches.len();

    let count_display = if app.picker_query.is_empty() {
        format!(" ({})", total_count)
    } else {
        format!(" ({}/{})", filtered_count, total_count)
    };

    let search_line = Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::styled(&app.picker_query, Style::default().fg(Color::White)),
        Span::styled(icons::CURSOR, Style::default().fg(Color::Cyan)),
        Span::styled(count_display, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(search_line), area);
}
