use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, path::Path, path::PathBuf, time::Duration};
use tracing::info;

use ghtabs::app::{AuthState, Worker};
use ghtabs::services::{SettingsStore, SqliteSettingsStore};
use ghtabs::{
    ui, update, App, Command, Config, ConfigOverrides, Job, JobResult, LoadOutcome, Message,
    Query,
};

/// Open recently updated GitHub issues as browser tabs, grouped by area
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
struct Cli {
    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: (),

    /// Repository to triage, as owner/name
    #[arg(long, env = "GHTABS_REPO")]
    repo: Option<String>,

    /// Base URL of the sign-in service; uses `gh auth token` when unset
    #[arg(long, env = "GHTABS_LOGIN_URL")]
    login_url: Option<String>,

    /// Command used to open URLs
    #[arg(long, env = "GHTABS_BROWSER")]
    browser: Option<String>,

    /// Flag passed to the browser for the first tab of a new window
    #[arg(long, env = "GHTABS_NEW_WINDOW_FLAG")]
    new_window_flag: Option<String>,

    /// Settings database location
    #[arg(long)]
    settings_file: Option<PathBuf>,

    /// Log file location
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Clear the saved query and exit
    #[arg(long)]
    clear_settings: bool,

    /// Open the saved query without the interface and exit
    #[arg(long)]
    load: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::resolve(ConfigOverrides {
        repo: cli.repo,
        login_url: cli.login_url,
        browser: cli.browser,
        new_window_flag: cli.new_window_flag,
        settings_file: cli.settings_file,
        log_file: cli.log_file,
    })?;

    if cli.clear_settings {
        let path = &config.settings_path;
        if path.exists() {
            SqliteSettingsStore::new(path.clone()).clear()?;
            eprintln!("Settings cleared: {}", path.display());
        } else {
            eprintln!("No settings file found at: {}", path.display());
        }
        return Ok(());
    }

    init_logging(&config.log_path)?;
    info!(repo = %config.repo_display(), "starting");

    if cli.load {
        return load_saved_query(&config);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = App::new(&config).and_then(|mut app| {
        app.start_job(Job::Authenticate);
        run_app(&mut terminal, &mut app)
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn init_logging(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory '{}'", parent.display())
            })?;
        }
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("failed to open log file '{}'", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .init();

    Ok(())
}

/// Run the saved query once, printing what was opened
fn load_saved_query(config: &Config) -> Result<()> {
    let store = SqliteSettingsStore::new(config.settings_path.clone());
    let query = store
        .load()?
        .map(|record| Query::from_record(&record))
        .unwrap_or_default();

    let rt = tokio::runtime::Runtime::new()?;
    let mut worker = Worker::from_config(config);

    rt.block_on(async {
        if let JobResult::AuthFailed(e) = worker.handle(Job::Authenticate).await {
            anyhow::bail!("Authentication failed: {}", e);
        }

        match worker.handle(Job::LoadIssues(query)).await {
            JobResult::IssuesLoaded(LoadOutcome::Opened(summary)) => {
                println!("{}", summary.describe());
                Ok(())
            }
            JobResult::IssuesLoaded(LoadOutcome::WindowUnavailable) => {
                println!("No window available");
                Ok(())
            }
            JobResult::LoadFailed(e) => anyhow::bail!(e),
            other => anyhow::bail!("Unexpected result: {:?}", other),
        }
    })
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        // Check for background job results
        while let Some(result) = app.check_job_result() {
            if let Some(cmd) = update(app, Message::JobFinished(result)) {
                if handle_command(app, cmd) {
                    return Ok(());
                }
            }
        }

        // Update spinner and expire notices
        if let Some(cmd) = update(app, Message::Tick) {
            if handle_command(app, cmd) {
                return Ok(());
            }
        }

        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(msg) = key_to_message(app, key.code, key.modifiers) {
                        if let Some(cmd) = update(app, msg) {
                            if handle_command(app, cmd) {
                                return Ok(());
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Handle a command returned from update
fn handle_command(app: &mut App, cmd: Command) -> bool {
    match cmd {
        Command::Quit => true,
        Command::StartJob(job) => {
            app.start_job(job);
            false
        }
    }
}

/// Convert a key event to a message
fn key_to_message(app: &App, key: KeyCode, modifiers: KeyModifiers) -> Option<Message> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match key {
            KeyCode::Char('c') => Some(Message::Quit),
            KeyCode::Char('u') if !app.show_label_picker => Some(Message::ClearField),
            _ => None,
        };
    }

    // Help popup, any key closes it
    if app.show_help_popup {
        return Some(Message::DismissHelp);
    }

    // Label picker
    if app.show_label_picker {
        return match key {
            KeyCode::Esc => Some(Message::CloseLabelPicker),
            KeyCode::Enter => Some(Message::PickerToggle),
            KeyCode::Down | KeyCode::Tab => Some(Message::PickerNext),
            KeyCode::Up | KeyCode::BackTab => Some(Message::PickerPrevious),
            KeyCode::Backspace => Some(Message::PickerBackspace),
            KeyCode::Char(c) => Some(Message::PickerInput(c)),
            _ => None,
        };
    }

    // Form
    match key {
        KeyCode::Tab | KeyCode::Down => Some(Message::FocusNext),
        KeyCode::BackTab | KeyCode::Up => Some(Message::FocusPrevious),
        KeyCode::Enter => Some(Message::Activate),
        KeyCode::Backspace => Some(Message::Backspace),
        KeyCode::Esc => Some(Message::DismissNotice),
        KeyCode::Char('?') => Some(Message::ToggleHelp),
        KeyCode::Char('q') if !app.focus.is_text() => Some(Message::Quit),
        KeyCode::Char('r') if matches!(app.auth, AuthState::Failed(_)) => {
            Some(Message::RetryAuth)
        }
        KeyCode::Char(c) => Some(Message::Input(c)),
        _ => None,
    }
}
