use ratatui::widgets::TableState;

use crate::data::MAX_DAYS;
use crate::services::filter_labels;
use crate::tabs::LoadOutcome;

use super::message::{Command, Job, JobResult, Message};
use super::model::{App, AuthState, Field, Notice};

const DAYS_MAX_LEN: usize = 2;
const SINCE_MAX_LEN: usize = 10;

/// Update the application state based on a message.
/// Returns an optional command to be executed by the main loop.
pub fn update(app: &mut App, msg: Message) -> Option<Command> {
    match msg {
        // Navigation
        Message::FocusNext => {
            app.focus = app.focus.next();
            None
        }
        Message::FocusPrevious => {
            app.focus = app.focus.previous();
            None
        }

        // Form editing
        Message::Input(c) => {
            input_char(app, c);
            None
        }
        Message::Backspace => {
            if app.loading_issues {
                return None;
            }
            match app.focus {
                Field::Days => {
                    app.form.days.pop();
                }
                Field::Since => {
                    app.form.since.pop();
                }
                Field::Labels => {
                    app.form.labels.pop();
                }
                Field::Group | Field::Submit => {}
            }
            None
        }
        Message::ClearField => {
            if app.loading_issues {
                return None;
            }
            match app.focus {
                Field::Days => app.form.days.clear(),
                Field::Since => app.form.since.clear(),
                Field::Labels => app.form.labels.clear(),
                Field::Group | Field::Submit => {}
            }
            None
        }
        Message::ToggleGroup => {
            if !app.loading_issues {
                app.form.group = !app.form.group;
            }
            None
        }
        Message::RemoveLastLabel => {
            if !app.loading_issues {
                app.form.labels.pop();
            }
            None
        }
        Message::Activate => match app.focus {
            Field::Labels => update(app, Message::OpenLabelPicker),
            Field::Group => update(app, Message::ToggleGroup),
            Field::Days | Field::Since | Field::Submit => update(app, Message::Submit),
        },
        Message::Submit => submit(app),

        // Label picker
        Message::OpenLabelPicker => {
            open_label_picker(app);
            None
        }
        Message::CloseLabelPicker => {
            app.show_label_picker = false;
            app.picker_query.clear();
            None
        }
        Message::PickerInput(c) => {
            app.picker_query.push(c);
            update_picker_matches(app);
            None
        }
        Message::PickerBackspace => {
            app.picker_query.pop();
            update_picker_matches(app);
            None
        }
        Message::PickerNext => {
            picker_next(app);
            None
        }
        Message::PickerPrevious => {
            picker_previous(app);
            None
        }
        Message::PickerToggle => {
            toggle_highlighted_label(app);
            None
        }

        // Popups
        Message::ToggleHelp => {
            app.show_help_popup = !app.show_help_popup;
            None
        }
        Message::DismissHelp => {
            app.show_help_popup = false;
            None
        }
        Message::DismissNotice => {
            app.notice = None;
            None
        }
        Message::RetryAuth => {
            if matches!(app.auth, AuthState::Failed(_)) {
                app.notice = None;
                return Some(Command::StartJob(Job::Authenticate));
            }
            None
        }

        // Async results
        Message::JobFinished(result) => handle_job_result(app, result),

        // System
        Message::Tick => {
            if app.is_busy() {
                app.update_spinner();
            }
            // Auth failures stay up until retried
            let auth_failed = matches!(app.auth, AuthState::Failed(_));
            if !auth_failed && app.notice.as_ref().is_some_and(Notice::expired) {
                app.notice = None;
            }
            None
        }
        Message::Quit => Some(Command::Quit),
    }
}

// Helper functions

fn input_char(app: &mut App, c: char) {
    if app.loading_issues {
        return;
    }
    match app.focus {
        Field::Days => {
            if c.is_ascii_digit() && app.form.days.len() < DAYS_MAX_LEN {
                app.form.days.push(c);
            }
        }
        Field::Since => {
            if (c.is_ascii_digit() || c == '-') && app.form.since.len() < SINCE_MAX_LEN {
                app.form.since.push(c);
            }
        }
        Field::Group if c == ' ' => app.form.group = !app.form.group,
        Field::Labels if c == ' ' => open_label_picker(app),
        _ => {}
    }
}

fn submit(app: &mut App) -> Option<Command> {
    if !app.can_submit() {
        return None;
    }
    if app.since_invalid() {
        app.notice = Some(Notice::error("Since must be a date like 2024-01-31"));
        return None;
    }
    if app.days_invalid() {
        app.notice = Some(Notice::error(format!("Days must be between 1 and {}", MAX_DAYS)));
        return None;
    }

    let query = app.query();
    app.form = query.to_form();
    Some(Command::StartJob(Job::LoadIssues(query)))
}

fn open_label_picker(app: &mut App) {
    if app.loading_issues {
        return;
    }
    app.show_label_picker = true;
    app.picker_query.clear();
    update_picker_matches(app);
}

fn update_picker_matches(app: &mut App) {
    app.picker_matches = filter_labels(&app.available_labels, &app.picker_query);
    app.picker_state = TableState::default();
    if !app.picker_matches.is_empty() {
        app.picker_state.select(Some(0));
    }
}

fn picker_next(app: &mut App) {
    if app.picker_matches.is_empty() {
        return;
    }
    let i = match app.picker_state.selected() {
        Some(i) => {
            if i >= app.picker_matches.len() - 1 {
                i
            } else {
                i + 1
            }
        }
        None => 0,
    };
    app.picker_state.select(Some(i));
}

fn picker_previous(app: &mut App) {
    if app.picker_matches.is_empty() {
        return;
    }
    let i = match app.picker_state.selected() {
        Some(i) => i.saturating_sub(1),
        None => 0,
    };
    app.picker_state.select(Some(i));
}

fn toggle_highlighted_label(app: &mut App) {
    let Some(name) = app.highlighted_label().map(|label| label.name.clone()) else {
        return;
    };

    if let Some(pos) = app.form.labels.iter().position(|l| *l == name) {
        app.form.labels.remove(pos);
    } else {
        app.form.labels.push(name);
    }
}

fn handle_job_result(app: &mut App, result: JobResult) -> Option<Command> {
    match result {
        JobResult::Authenticated { user } => {
            app.auth = AuthState::Ready;
            app.user = user;
            Some(Command::StartJob(Job::LoadLabels))
        }
        JobResult::AuthFailed(e) => {
            app.auth = AuthState::Failed(e.clone());
            app.notice = Some(Notice::error(e));
            None
        }
        JobResult::LabelsLoaded(mut labels) => {
            labels.sort_by(|a, b| a.name.cmp(&b.name));
            app.available_labels = labels;
            app.loading_labels = false;
            if app.show_label_picker {
                update_picker_matches(app);
            }
            None
        }
        JobResult::LabelsFailed(e) => {
            app.loading_labels = false;
            app.notice = Some(Notice::error(format!("Failed to load labels: {}", e)));
            None
        }
        JobResult::IssuesLoaded(outcome) => {
            app.loading_issues = false;
            // A missing window is not reported
            if let LoadOutcome::Opened(summary) = outcome {
                app.notice = Some(Notice::info(summary.describe()));
            }
            None
        }
        JobResult::LoadFailed(e) => {
            app.loading_issues = false;
            app.notice = Some(Notice::error(e));
            None
        }
    }
}
