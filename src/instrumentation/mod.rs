pub mod logger;
pub mod session;

pub use logger::{RunLog, RunLogger};
pub use session::{LogEntry, ResearchLogger, SessionLog};
