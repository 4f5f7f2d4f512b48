mod filter;
mod message;
mod runner;

pub use filter::{Decision, EventFilter, Reminder, SkipReason};
pub use message::render_message;
pub use runner::{run_reminders, RunSummary};
