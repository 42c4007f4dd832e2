//! Command execution
//!
//! Wires config → paced client → fetcher → spawned retrieval session, and
//! acts as the session's consumer: identifiers are written one per line as
//! they arrive. On failure the partial output is kept and the root cause is
//! reported with a non-zero exit.

use super::commands::{Cli, Commands};
use crate::config::RetrieverConfig;
use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::http::{PacedHttpClient, PacedHttpClientConfig};
use crate::retriever::start_session;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Executes CLI commands
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the requested command
    pub async fn run(self) -> Result<()> {
        match &self.cli.command {
            Commands::Export {
                base_url,
                path,
                rate,
                capacity,
                output,
            } => {
                let config = self.load_config(
                    base_url.as_deref(),
                    path.as_deref(),
                    *rate,
                    *capacity,
                )?;
                export(config, output.as_deref()).await
            }
            Commands::Validate => {
                let config_path = self.cli.config.as_deref().ok_or_else(|| {
                    Error::config("validate requires --config")
                })?;
                let config = read_config_file(config_path)?;
                info!(base_url = %config.base_url, "configuration is valid");
                Ok(())
            }
        }
    }

    /// Merge the config file (if any) with command-line overrides
    fn load_config(
        &self,
        base_url: Option<&str>,
        path: Option<&str>,
        rate: Option<u32>,
        capacity: Option<usize>,
    ) -> Result<RetrieverConfig> {
        let mut config = match (&self.cli.config, base_url) {
            (Some(file), _) => {
                let mut config = read_config_file(file)?;
                if let Some(url) = base_url {
                    config.base_url = url.to_string();
                }
                config
            }
            (None, Some(url)) => RetrieverConfig::new(url),
            (None, None) => {
                return Err(Error::config("either --config or --base-url is required"))
            }
        };

        if let Some(path) = path {
            config.identifiers_path = path.to_string();
        }
        if let Some(rate) = rate {
            config.calls_per_second = rate;
        }
        if let Some(capacity) = capacity {
            config.queue_capacity = capacity;
        }
        config.validate()
    }
}

/// Read and validate a JSON config file
fn read_config_file(path: &Path) -> Result<RetrieverConfig> {
    let contents = std::fs::read_to_string(path)?;
    let config: RetrieverConfig = serde_json::from_str(&contents)?;
    config.validate()
}

/// Run one retrieval session to completion, writing identifiers as lines
async fn export(config: RetrieverConfig, output: Option<&Path>) -> Result<()> {
    let client = PacedHttpClient::with_config(
        PacedHttpClientConfig::builder()
            .base_url(&config.base_url)
            .calls_per_second(config.calls_per_second)
            .timeout(config.timeout())
            .build(),
    )?;
    let fetcher = PageFetcher::with_path(client, &config.identifiers_path)
        .with_retry(config.retry_policy());

    let (handle, consumer) = start_session(fetcher, config.queue_capacity);

    let mut writer = open_output(output)?;
    let mut written = 0u64;
    while let Some(id) = consumer.recv().await {
        writeln!(writer, "{id}")?;
        written += 1;
    }
    writer.flush()?;

    // The queue is closed and drained; the handle carries the outcome
    let stats = handle.join().await?;
    info!(
        pages = stats.pages_fetched,
        identifiers = written,
        "export finished"
    );
    Ok(())
}

fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            Ok(Box::new(std::io::BufWriter::new(file)))
        }
        None => Ok(Box::new(std::io::BufWriter::new(std::io::stdout()))),
    }
}
