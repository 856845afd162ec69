//! CLI config: environment config plus command-line overrides.

use std::path::PathBuf;

use topicflow::{ConfigError, FlowConfig, FlowError, StoreConfig};

/// Error running a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Flow(#[from] FlowError),
    /// `--state` was not a JSON object.
    #[error("invalid --state: {0}")]
    InvalidState(String),
    #[error("serializing output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Overrides taken from the command line. `None` keeps the env value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    /// JSON fixture; forces the in-memory store.
    pub fixture: Option<PathBuf>,
    pub max_steps: Option<usize>,
}

/// Builds a [`FlowConfig`] from `lookup` (usually the process env) and applies `options`.
pub fn build_config<F>(options: &CliOptions, lookup: F) -> Result<FlowConfig, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = FlowConfig::from_lookup(lookup)?;
    if let Some(path) = &options.fixture {
        config.store = StoreConfig::Memory {
            fixture: Some(path.clone()),
        };
    }
    if let Some(max_steps) = options.max_steps {
        if max_steps == 0 {
            return Err(ConfigError::InvalidNumber {
                var: "--max-steps",
                value: max_steps.to_string(),
            }
            .into());
        }
        config.max_steps = max_steps;
    }
    Ok(config)
}
