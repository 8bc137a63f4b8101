/// CLI argument parsing and command handling - Gateway
mod args;
mod commands;
mod output;

pub use args::{Cli, Commands, OutputFormat};
pub use commands::{handle_command, line_range, read_document, show_version};
pub use output::{format_markers, format_notification, format_popup};
