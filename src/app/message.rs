use crate::data::{Label, Query};
use crate::tabs::LoadOutcome;

/// Work handed to the background worker
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Authenticate,
    LoadLabels,
    LoadIssues(Query),
}

/// Result from a background job
#[derive(Debug)]
pub enum JobResult {
    Authenticated { user: Option<String> },
    AuthFailed(String),
    LabelsLoaded(Vec<Label>),
    LabelsFailed(String),
    IssuesLoaded(LoadOutcome),
    LoadFailed(String),
}

/// Command to be executed after update
#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    StartJob(Job),
}

/// All possible messages/events in the application
pub enum Message {
    // Navigation
    FocusNext,
    FocusPrevious,

    // Form editing
    Input(char),
    Backspace,
    ClearField,
    ToggleGroup,
    RemoveLastLabel,
    Activate,
    Submit,

    // Label picker
    OpenLabelPicker,
    CloseLabelPicker,
    PickerInput(char),
    PickerBackspace,
    PickerNext,
    PickerPrevious,
    PickerToggle,

    // Popups
    ToggleHelp,
    DismissHelp,
    DismissNotice,
    RetryAuth,

    // Async results
    JobFinished(JobResult),

    // System
    Tick,
    Quit,
}
