use anyhow::Result;
use ratatui::widgets::TableState;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, warn};

use crate::config::Config;
use crate::data::{FormInput, Label, Query, SPINNER_FRAMES};
use crate::services::{SettingsStore, SqliteSettingsStore};

use super::message::{Job, JobResult};
use super::worker::Worker;

/// How long a notice stays up.
pub const NOTICE_TIMEOUT: Duration = Duration::from_secs(3);

/// Focusable form rows, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Labels,
    Days,
    Since,
    Group,
    Submit,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Labels,
        Field::Days,
        Field::Since,
        Field::Group,
        Field::Submit,
    ];

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, Field::Days | Field::Since)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Pending,
    Ready,
    Failed(String),
}

/// Transient message at the bottom of the form.
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
            shown_at: Instant::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
            shown_at: Instant::now(),
        }
    }

    pub fn expired(&self) -> bool {
        self.shown_at.elapsed() >= NOTICE_TIMEOUT
    }
}

pub struct App {
    // Form state
    pub form: FormInput,
    pub focus: Field,

    // Data state
    pub available_labels: Vec<Label>,
    pub repo_display: String,
    pub user: Option<String>,

    // Loading state
    pub auth: AuthState,
    pub loading_labels: bool,
    pub loading_issues: bool,

    // Popup state
    pub show_help_popup: bool,
    pub show_label_picker: bool,
    pub notice: Option<Notice>,

    // Label picker state
    pub picker_query: String,
    pub picker_matches: Vec<usize>,
    pub picker_state: TableState,

    // Async communication
    pub job_tx: Sender<Job>,
    pub result_rx: Receiver<JobResult>,

    // Spinner state
    pub spinner_idx: usize,
    pub last_spinner_update: Instant,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let (job_tx, job_rx) = mpsc::channel::<Job>();
        let (result_tx, result_rx) = mpsc::channel::<JobResult>();

        let rt = tokio::runtime::Runtime::new()?;
        let worker = Worker::from_config(config);
        thread::Builder::new()
            .name("ghtabs-worker".to_string())
            .spawn(move || worker.run(rt, job_rx, result_tx))?;

        // Settings are read once, at startup
        let store = SqliteSettingsStore::new(config.settings_path.clone());
        let query = match store.load() {
            Ok(record) => record.map(|r| Query::from_record(&r)).unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not read saved settings");
                Query::default()
            }
        };

        Ok(Self::from_parts(
            &query,
            config.repo_display(),
            job_tx,
            result_rx,
        ))
    }

    pub fn from_parts(
        query: &Query,
        repo_display: String,
        job_tx: Sender<Job>,
        result_rx: Receiver<JobResult>,
    ) -> Self {
        Self {
            form: query.to_form(),
            focus: Field::Labels,
            available_labels: Vec::new(),
            repo_display,
            user: None,
            auth: AuthState::Pending,
            loading_labels: false,
            loading_issues: false,
            show_help_popup: false,
            show_label_picker: false,
            notice: None,
            picker_query: String::new(),
            picker_matches: Vec::new(),
            picker_state: TableState::default(),
            job_tx,
            result_rx,
            spinner_idx: 0,
            last_spinner_update: Instant::now(),
        }
    }

    // Getters

    pub fn is_busy(&self) -> bool {
        self.auth == AuthState::Pending || self.loading_labels || self.loading_issues
    }

    /// The load action is available once signed in and idle.
    pub fn can_submit(&self) -> bool {
        self.auth == AuthState::Ready && !self.loading_issues
    }

    pub fn query(&self) -> Query {
        Query::build(&self.form)
    }

    pub fn days_invalid(&self) -> bool {
        !self.form.days.trim().is_empty() && self.query().days.is_none()
    }

    pub fn since_invalid(&self) -> bool {
        !self.form.since.trim().is_empty() && self.query().since.is_none()
    }

    pub fn visible_labels(&self) -> Vec<&Label> {
        self.picker_matches
            .iter()
            .filter_map(|&idx| self.available_labels.get(idx))
            .collect()
    }

    pub fn highlighted_label(&self) -> Option<&Label> {
        self.picker_state
            .selected()
            .and_then(|sel| self.picker_matches.get(sel))
            .and_then(|&idx| self.available_labels.get(idx))
    }

    pub fn is_selected(&self, label: &str) -> bool {
        self.form.labels.iter().any(|l| l == label)
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_idx]
    }

    // Spinner update

    pub fn update_spinner(&mut self) {
        if self.last_spinner_update.elapsed() >= Duration::from_millis(80) {
            self.spinner_idx = (self.spinner_idx + 1) % SPINNER_FRAMES.len();
            self.last_spinner_update = Instant::now();
        }
    }

    // Job management

    pub fn start_job(&mut self, job: Job) {
        match &job {
            Job::Authenticate => self.auth = AuthState::Pending,
            Job::LoadLabels => self.loading_labels = true,
            Job::LoadIssues(_) => {
                self.loading_issues = true;
                self.notice = None;
            }
        }
        if let Err(e) = self.job_tx.send(job) {
            error!(job = ?e.0, "background worker is gone");
            match e.0 {
                Job::Authenticate => {
                    self.auth = AuthState::Failed("Background worker stopped".to_string())
                }
                Job::LoadLabels => self.loading_labels = false,
                Job::LoadIssues(_) => self.loading_issues = false,
            }
            self.notice = Some(Notice::error("Background worker stopped; restart ghtabs"));
        }
    }

    pub fn check_job_result(&mut self) -> Option<JobResult> {
        self.result_rx.try_recv().ok()
    }
}
