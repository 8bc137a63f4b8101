use anyhow::Result;
use clap::Parser;

use complexity_lens::{cli::Cli, runtime::Orchestrator, utils::init_logger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let orchestrator = Orchestrator::new(cli)?;
    orchestrator.run().await
}
