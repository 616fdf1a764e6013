use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

use super::search::render_picker_query;
use super::table::render_label_table;

/// Render the help popup
pub fn render_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_width = 44u16;
    let popup_height = 15u16;
    let popup_area = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup_area);

    let entries = [
        ("Tab/↓   ", "Next field"),
        ("S-Tab/↑ ", "Previous field"),
        ("Enter   ", "Pick labels / toggle / load"),
        ("Space   ", "Pick labels / toggle grouping"),
        ("Bksp    ", "Delete character or last label"),
        ("Ctrl+U  ", "Clear field"),
        ("Esc     ", "Dismiss message"),
        ("r       ", "Retry sign-in"),
        ("?       ", "Help"),
        ("q/C-c   ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    help_lines.push(Line::raw(""));
    help_lines.push(Line::from("Press any key to close").centered());

    let help = Paragraph::new(help_lines).block(
        Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(help, popup_area);
}

/// Render the label picker popup
pub fn render_label_picker(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_width = 50u16.min(area.width.saturating_sub(2));
    let popup_height = 18u16.min(area.height.saturating_sub(2));
    let popup_area = centered_rect(popup_width, popup_height, area);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" Labels ({} selected) ", app.form.labels.len()))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Query
        Constraint::Min(0),    // Labels
        Constraint::Length(1), // Hint
    ])
    .split(inner);

    render_picker_query(f, app, chunks[0]);

    if app.loading_labels && app.available_labels.is_empty() {
        f.render_widget(
            Line::styled(
                format!("{} Loading labels", app.spinner()),
                Style::default().fg(Color::Yellow),
            ),
            chunks[1],
        );
    } else {
        render_label_table(f, app, chunks[1]);
    }

    let hint = Line::from(vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" move  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" toggle  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" done"),
    ])
    .centered();
    f.render_widget(hint, chunks[2]);
}

/// Calculate a centered rectangle within an area
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);

    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate_string("area:core", 20), "area:core");
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate_string("área:cörë", 5), "área…");
    }
}
