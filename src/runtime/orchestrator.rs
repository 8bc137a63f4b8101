use anyhow::Result;

use crate::{
    app::{load_config, load_config_from, Config},
    cli::{handle_command, Cli, Commands},
    utils::log_warn,
};

use super::watch::WatchRunner;

/// Main runtime orchestrator
pub struct Orchestrator {
    cli: Cli,
    config: Config,
}

impl Orchestrator {
    /// Create a new orchestrator from CLI args
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = if let Some(config_path) = &cli.config {
            load_config_from(config_path)?
        } else {
            match load_config() {
                Ok(cfg) => cfg,
                Err(e) => {
                    log_warn("⚠️", format!("Failed to load config: {}. Using defaults.", e));
                    Config::default()
                }
            }
        };

        if let Some(endpoint) = &cli.endpoint {
            config.classifier.endpoint = endpoint.clone();
        }

        Ok(Self { cli, config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the orchestrator
    pub async fn run(self) -> Result<()> {
        match &self.cli.command {
            Commands::Watch {
                file,
                no_annotations,
            } => {
                let mut config = self.config.clone();
                if *no_annotations {
                    config.annotations.enabled = false;
                }
                WatchRunner::new(config, file.clone())?.run().await
            }
            command => handle_command(command, self.config).await,
        }
    }
}
