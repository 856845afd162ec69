//! topicflow-cli library: config assembly and the `structure` / `run` commands.
//!
//! Reads flow config from env (.env loaded by the binary), applies command-line
//! overrides, builds a [`FlowRuntime`](topicflow::FlowRuntime) and runs one command.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), topicflow_cli::Error> {
//! let options = topicflow_cli::CliOptions::default();
//! let config = topicflow_cli::build_config(&options, |k| std::env::var(k).ok())?;
//! let report = topicflow_cli::run_agent(&config, "A", None, true).await?;
//! println!("{}", report.final_state);
//! # Ok(())
//! # }
//! ```

mod config;
mod run;

pub use config::{build_config, CliOptions, Error};
pub use run::{parse_state, run_agent, show_structure, RunReport, TraceLine};

#[cfg(test)]
mod tests;
