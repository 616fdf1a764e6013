use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Field};
use crate::data::{MAX_DAYS, MIN_DAYS};
use crate::icons;

const BUTTON_WIDTH: u16 = 24;

/// Render the query form
pub fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(3), // Labels
        Constraint::Length(3), // Days
        Constraint::Length(3), // Since
        Constraint::Length(1), // Group
        Constraint::Length(1), // Spacer
        Constraint::Length(3), // Load button
        Constraint::Min(0),
    ])
    .split(area);

    render_labels_field(f, app, rows[0]);
    render_text_field(
        f,
        app,
        rows[1],
        Field::Days,
        "Days",
        &app.form.days,
        &format!("{}-{}", MIN_DAYS, MAX_DAYS),
        app.days_invalid(),
    );
    render_text_field(
        f,
        app,
        rows[2],
        Field::Since,
        "Since",
        &app.form.since,
        "YYYY-MM-DD",
        app.since_invalid(),
    );
    render_group_toggle(f, app, rows[3]);
    render_load_button(f, app, rows[5]);
}

fn field_block(app: &App, field: Field, title: &str, invalid: bool) -> Block<'static> {
    let border_color = if invalid {
        Color::Red
    } else if app.focus == field && !app.show_label_picker {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    Block::default()
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(border_color))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
}

fn render_labels_field(f: &mut Frame, app: &App, area: Rect) {
    let block = field_block(app, Field::Labels, "Labels", false);

    let line = if app.form.labels.is_empty() {
        Line::styled("Any label", Style::default().fg(Color::DarkGray))
    } else {
        let mut spans = Vec::new();
        for (idx, label) in app.form.labels.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{}]", label),
                Style::default().fg(Color::Black).bg(Color::Gray),
            ));
        }
        Line::from(spans)
    };

    f.render_widget(
        Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

#[allow(clippy::too_many_arguments)]
fn render_text_field(
    f: &mut Frame,
    app: &App,
    area: Rect,
    field: Field,
    title: &str,
    value: &str,
    placeholder: &str,
    invalid: bool,
) {
    let block = field_block(app, field, title, invalid);
    let focused = app.focus == field && !app.show_label_picker;

    let mut spans = Vec::new();
    if value.is_empty() && !focused {
        spans.push(Span::styled(
            placeholder.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::styled(
            value.to_string(),
            Style::default().fg(Color::White),
        ));
    }
    if focused {
        spans.push(Span::styled(icons::CURSOR, Style::default().fg(Color::Cyan)));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_group_toggle(f: &mut Frame, app: &App, area: Rect) {
    let checkbox = if app.form.group {
        icons::CHECKED
    } else {
        icons::UNCHECKED
    };
    let focused = app.focus == Field::Group && !app.show_label_picker;
    let style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::White)
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(checkbox, Style::default().fg(Color::Green)),
        Span::styled(" Group by area label", style),
    ]);
    f.render_widget(line, area);
}

fn render_load_button(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Field::Submit && !app.show_label_picker;
    let enabled = app.can_submit();

    let style = match (enabled, focused) {
        (false, _) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (true, false) => Style::default().fg(Color::Cyan),
    };

    let label = if app.loading_issues {
        format!("{} Loading issues", app.spinner())
    } else {
        "Load issues".to_string()
    };

    let button = Paragraph::new(Line::from(label).centered())
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused {
                    Color::Cyan
                } else {
                    Color::DarkGray
                })),
        );

    let width = area.width.min(BUTTON_WIDTH);
    let button_area = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(area)[0];
    f.render_widget(button, button_area);
}
