pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod icons;
pub mod services;
pub mod tabs;
pub mod utils;
pub mod view;

pub use app::{update, App, Command, Job, JobResult, Message};
pub use config::{Config, ConfigOverrides};
pub use data::{FormInput, Issue, Query, SettingsRecord};
pub use error::TriageError;
pub use tabs::{LoadOutcome, LoadSummary, TabGroupEngine, WindowOrchestrator};
pub use view::ui;
