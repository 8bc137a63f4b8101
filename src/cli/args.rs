use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lens")]
#[command(version)]
#[command(about = "Per-function complexity annotations backed by a remote classifier", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Classifier endpoint (overrides configuration)
    #[arg(long, global = true, env = "LENS_ENDPOINT")]
    pub endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze an explicit line selection (1-based, inclusive)
    Analyze {
        file: PathBuf,
        #[arg(long)]
        start_line: usize,
        #[arg(long)]
        end_line: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// Show the hover popup for the function at a line (1-based)
    Hover {
        file: PathBuf,
        #[arg(long)]
        line: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output_format: OutputFormat,
    },
    /// Watch a file and keep its inline annotations live
    Watch {
        file: PathBuf,
        /// Start with inline annotations disabled
        #[arg(long)]
        no_annotations: bool,
    },
    /// Check classifier health and show the active configuration
    Status,
    /// Initialize configuration
    Init,
    /// Show version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON structured output
    Json,
}
