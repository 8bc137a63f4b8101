use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{
    app::{Config, Session},
    cli::{format_markers, format_notification, format_popup, line_range, read_document},
    constants::WATCH_POLL_INTERVAL_MS,
    document::{Document, Position, ViewId},
    render::{AnnotationSink, InlineMarker},
    utils::{log_info, log_warn, FileEvent, FileSystemWatcher},
};

/// Prints each replace-all marker set to stdout
pub struct TerminalSink {
    label: String,
}

impl TerminalSink {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl AnnotationSink for TerminalSink {
    fn replace_all(&self, _view: ViewId, markers: Vec<InlineMarker>) {
        println!("{}", format_markers(&self.label, &markers));
    }
}

/// Commands typed at the watch prompt; line numbers are 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Hover(usize),
    Analyze(usize, usize),
    Toggle,
    Stats,
    Help,
    Quit,
}

pub fn parse_watch_command(input: &str) -> Result<WatchCommand> {
    let mut parts = input.split_whitespace();
    let verb = parts.next().unwrap_or("");
    let mut number = |name: &str| -> Result<usize> {
        parts
            .next()
            .with_context(|| format!("missing {}", name))?
            .parse::<usize>()
            .with_context(|| format!("{} must be a line number", name))
    };

    let command = match verb {
        "hover" | "h" => WatchCommand::Hover(number("line")?),
        "analyze" | "a" => {
            let start = number("start line")?;
            let end = number("end line")?;
            WatchCommand::Analyze(start, end)
        }
        "toggle" | "t" => WatchCommand::Toggle,
        "stats" => WatchCommand::Stats,
        "help" | "?" => WatchCommand::Help,
        "quit" | "exit" | "q" => WatchCommand::Quit,
        other => anyhow::bail!("unknown command '{}' (try 'help')", other),
    };
    Ok(command)
}

const HELP: &str = "\
Commands:
  hover <line>          hover the function at a line
  analyze <start> <end> analyze a line selection
  toggle                turn inline annotations on or off
  stats                 show cache statistics
  quit                  stop watching";

/// Single-view host: file changes are edits, stdin lines are user actions
pub struct WatchRunner {
    session: Session,
    path: PathBuf,
    view: ViewId,
    document: Document,
}

impl WatchRunner {
    pub fn new(config: Config, path: PathBuf) -> Result<Self> {
        let document = read_document(&path)?;
        let sink = Arc::new(TerminalSink::new(path.display().to_string()));
        let session = Session::connect(config, sink)?;

        Ok(Self {
            session,
            path,
            view: ViewId(1),
            document,
        })
    }

    pub async fn run(mut self) -> Result<()> {
        let watcher = FileSystemWatcher::new(&self.path)?;
        log_info("👀", format!("Watching {} (type 'help')", self.path.display()));

        self.session
            .scheduler()
            .on_view_activated(self.view, self.document.clone());

        let mut stdin = BufReader::new(tokio::io::stdin()).lines();
        let mut ticker = tokio::time::interval(Duration::from_millis(WATCH_POLL_INTERVAL_MS));

        loop {
            tokio::select! {
                _ = ticker.tick() => self.drain_file_events(&watcher),
                line = stdin.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match parse_watch_command(&line) {
                        Ok(WatchCommand::Quit) => break,
                        Ok(command) => self.execute(command).await,
                        Err(e) => println!("{}", e.to_string().yellow()),
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        self.session.scheduler().close_view(self.view);
        Ok(())
    }

    fn drain_file_events(&mut self, watcher: &FileSystemWatcher) {
        for event in watcher.check_events() {
            match event {
                FileEvent::Modified(path) => match read_document(&path) {
                    Ok(document) if document != self.document => {
                        self.document = document;
                        self.session
                            .scheduler()
                            .on_text_changed(self.view, self.document.clone());
                    }
                    Ok(_) => {}
                    Err(e) => log_warn("⚠️", e),
                },
                FileEvent::Deleted(path) => {
                    log_warn("⚠️", format!("{} was removed; keeping last text", path.display()))
                }
            }
        }
    }

    async fn execute(&mut self, command: WatchCommand) {
        let coordinator = self.session.coordinator();
        match command {
            WatchCommand::Hover(line) => {
                if line == 0 {
                    println!("{}", "Line numbers start at 1".yellow());
                    return;
                }
                match coordinator
                    .hover(&self.document, Position::new(line - 1, 0))
                    .await
                {
                    Some(popup) => println!("{}", format_popup(&popup)),
                    None => println!("{}", "No function at this position".dimmed()),
                }
            }
            WatchCommand::Analyze(start, end) => match line_range(&self.document, start, end) {
                Ok(range) => {
                    let notification = coordinator.analyze_selection(&self.document, &range).await;
                    println!("{}", format_notification(&notification));
                }
                Err(e) => println!("{}", e.to_string().yellow()),
            },
            WatchCommand::Toggle => {
                let scheduler = self.session.scheduler();
                let enabled = !scheduler.is_enabled();
                scheduler.set_enabled(enabled);
                log_info(
                    "🔁",
                    format!("Inline annotations {}", if enabled { "on" } else { "off" }),
                );
                return;
            }
            WatchCommand::Stats => {
                println!("{}", self.session.cache().stats().format());
                return;
            }
            WatchCommand::Help => {
                println!("{}", HELP);
                return;
            }
            WatchCommand::Quit => return,
        }

        // Returning from the prompt refocuses the view
        self.session
            .scheduler()
            .on_view_activated(self.view, self.document.clone());
    }
}
