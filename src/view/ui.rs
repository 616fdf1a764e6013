use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::icons;

use super::components::{
    render_form, render_help_popup, render_label_picker, render_notice, render_title_bar,
};

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title
        Constraint::Length(1), // Separator
        Constraint::Min(0),    // Form
        Constraint::Length(2), // Notice
    ])
    .split(f.area());

    render_title_bar(f, app, chunks[0]);

    let separator = icons::SEPARATOR_CHAR.repeat(chunks[1].width as usize);
    f.render_widget(
        Paragraph::new(separator).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );

    render_form(f, app, chunks[2]);
    render_notice(f, app, chunks[3]);

    // Overlays, picker below help
    if app.show_label_picker {
        render_label_picker(f, app);
    }

    if app.show_help_popup {
        render_help_popup(f);
    }
}
