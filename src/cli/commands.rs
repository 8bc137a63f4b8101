use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

use crate::{
    app::{init_config, Config, Session},
    document::{Document, Position, TextRange, ViewId},
    render::{AnnotationSink, InlineMarker, NotificationLevel},
    utils::log_info,
};

use super::output::{format_notification, format_popup};
use super::{Commands, OutputFormat};

/// One-shot commands never schedule passes, so markers go nowhere
struct DiscardSink;

impl AnnotationSink for DiscardSink {
    fn replace_all(&self, _view: ViewId, _markers: Vec<InlineMarker>) {}
}

/// Handle every subcommand except `watch`
pub async fn handle_command(command: &Commands, config: Config) -> Result<()> {
    match command {
        Commands::Analyze {
            file,
            start_line,
            end_line,
            output_format,
        } => analyze_file(config, file, *start_line, *end_line, *output_format).await,
        Commands::Hover {
            file,
            line,
            output_format,
        } => hover_file(config, file, *line, *output_format).await,
        Commands::Status => show_status(config).await,
        Commands::Init => {
            let path = init_config()?;
            log_info("📝", format!("Configuration at: {}", path.display()));
            Ok(())
        }
        Commands::Version => {
            show_version();
            Ok(())
        }
        Commands::Watch { .. } => anyhow::bail!("watch is handled by the runtime"),
    }
}

pub fn read_document(path: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(Document::new(text))
}

/// Whole-line range from 1-based inclusive line numbers
pub fn line_range(document: &Document, start_line: usize, end_line: usize) -> Result<TextRange> {
    let line_count = document.line_count();
    if start_line == 0 || end_line == 0 {
        anyhow::bail!("Line numbers start at 1");
    }
    if start_line > end_line {
        anyhow::bail!("Start line {} is after end line {}", start_line, end_line);
    }
    if end_line > line_count {
        anyhow::bail!("End line {} is past the end of the file ({} lines)", end_line, line_count);
    }
    Ok(TextRange::lines(start_line - 1, end_line - 1, document))
}

async fn analyze_file(
    config: Config,
    file: &Path,
    start_line: usize,
    end_line: usize,
    format: OutputFormat,
) -> Result<()> {
    let document = read_document(file)?;
    let range = line_range(&document, start_line, end_line)?;
    let session = Session::connect(config, Arc::new(DiscardSink))?;

    let notification = session.coordinator().analyze_selection(&document, &range).await;
    match format {
        OutputFormat::Text => println!("{}", format_notification(&notification)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&notification)?),
    }

    if notification.level == NotificationLevel::Error {
        std::process::exit(1);
    }
    Ok(())
}

async fn hover_file(config: Config, file: &Path, line: usize, format: OutputFormat) -> Result<()> {
    if line == 0 {
        anyhow::bail!("Line numbers start at 1");
    }
    let document = read_document(file)?;
    let session = Session::connect(config, Arc::new(DiscardSink))?;

    let popup = session
        .coordinator()
        .hover(&document, Position::new(line - 1, 0))
        .await;

    match (popup, format) {
        (Some(popup), OutputFormat::Text) => println!("{}", format_popup(&popup)),
        (Some(popup), OutputFormat::Json) => println!("{}", serde_json::to_string_pretty(&popup)?),
        (None, OutputFormat::Text) => println!("{}", "No function at this position".dimmed()),
        (None, OutputFormat::Json) => println!("null"),
    }
    Ok(())
}

/// Show classifier health and the configuration in effect
async fn show_status(config: Config) -> Result<()> {
    let endpoint = config.classifier.endpoint.clone();
    let has_key = config.classifier.credential().is_some();
    let annotations = config.annotations.clone();
    let cache = config.cache.clone();
    let session = Session::connect(config, Arc::new(DiscardSink))?;

    println!("complexity-lens status:");
    println!();
    if session.health_check().await {
        println!("  [OK] Classifier: reachable at {}", endpoint.green());
    } else {
        println!("  [ERROR] Classifier: unreachable at {}", endpoint.red());
    }
    println!(
        "  Credential: {}",
        if has_key { "Set" } else { "Not set" }
    );
    println!(
        "  Inline annotations: {}",
        if annotations.enabled { "enabled" } else { "disabled" }
    );
    println!("  Show metrics: {}", annotations.show_metrics);
    println!("  Hover delay: {} ms", annotations.analysis_delay_ms);
    println!(
        "  Cache: {} min TTL, {} entries max",
        cache.ttl_minutes, cache.max_entries
    );
    println!();
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("complexity-lens v{}", env!("CARGO_PKG_VERSION"));
    println!("   Per-function complexity annotations backed by a remote classifier");
}
