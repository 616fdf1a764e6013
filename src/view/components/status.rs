use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AuthState};
use crate::icons;

/// Render the title bar
pub fn render_title_bar(f: &mut Frame, app: &App, area: Rect) {
    let activity = if app.auth == AuthState::Pending {
        format!("{} Authenticating ", app.spinner())
    } else if app.loading_issues {
        format!("{} Loading issues ", app.spinner())
    } else if app.loading_labels {
        format!("{} ", app.spinner())
    } else {
        String::new()
    };

    let left = Line::from(vec![Span::styled(
        " GitHub Issue Tabs ",
        Style::default().fg(Color::Cyan).bold(),
    )]);

    let mut right_spans = vec![
        Span::styled(activity, Style::default().fg(Color::Yellow)),
        Span::styled(
            format!("{} ", app.repo_display),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(user) = &app.user {
        right_spans.push(Span::styled(
            format!("@{} ", user),
            Style::default().fg(Color::Magenta),
        ));
    }
    let right = Line::from(right_spans);

    let chunks = Layout::horizontal([Constraint::Min(0), Constraint::Length(right.width() as u16)])
        .split(area);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

/// Render the transient notice line
pub fn render_notice(f: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };

    let (icon, color) = if notice.is_error {
        (icons::NOTICE_ERROR, Color::Red)
    } else {
        (icons::NOTICE_INFO, Color::Green)
    };

    let mut spans = vec![
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        Span::styled(notice.message.as_str(), Style::default().fg(Color::White)),
    ];

    if matches!(app.auth, AuthState::Failed(_)) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" retry"));
    } else {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" dismiss"));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true }),
        area,
    );
}
