/// Runtime orchestrator module - Gateway

mod orchestrator;
mod watch;

pub use orchestrator::Orchestrator;
pub use watch::{parse_watch_command, TerminalSink, WatchCommand, WatchRunner};
