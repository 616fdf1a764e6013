pub mod engine;
pub mod orchestrator;

pub use engine::{Assignment, GroupState, TabGroupEngine};
pub use orchestrator::{LoadOutcome, LoadSummary, Stage, WindowOrchestrator};
