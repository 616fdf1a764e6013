pub mod message;
pub mod model;
pub mod update;
pub mod worker;

pub use message::{Command, Job, JobResult, Message};
pub use model::{App, AuthState, Field, Notice};
pub use update::update;
pub use worker::Worker;
