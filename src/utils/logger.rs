use std::io;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is unset
///
/// Only this crate gets the chosen level; the HTTP stack stays at `warn`.
pub fn default_directive(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,complexity_lens={}", level)
}

/// Initialize the logging system on stderr
///
/// Stdout carries command output and markers, so it is never logged to.
pub fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init();
}

/// Log an info message with emoji prefix
pub fn log_info(emoji: &str, message: impl std::fmt::Display) {
    info!("{} {}", emoji, message);
}

/// Log a warning message with emoji prefix
pub fn log_warn(emoji: &str, message: impl std::fmt::Display) {
    warn!("{} {}", emoji, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_scopes_crate() {
        assert_eq!(default_directive(false), "warn,complexity_lens=info");
        assert_eq!(default_directive(true), "warn,complexity_lens=debug");
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }
}
