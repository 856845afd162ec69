//! topicflow binary: inspect or run an agent's topic flow and print JSON.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use topicflow_cli::{build_config, run_agent, show_structure, CliOptions};

#[derive(Parser, Debug)]
#[command(name = "topicflow")]
#[command(about = "Agent topic flows: print the graph structure or run it against a state")]
struct Args {
    /// JSON fixture with agents and topics (overrides TOPICFLOW_FIXTURE / GRAPH_STORE)
    #[arg(long, global = true, value_name = "PATH")]
    fixture: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the agent's graph structure
    Structure { agent_id: String },
    /// Run the agent's flow and print the final state
    Run {
        agent_id: String,
        /// Initial state as a JSON object
        #[arg(long, value_name = "JSON")]
        state: Option<String>,
        /// Also print each executed node
        #[arg(long)]
        trace: bool,
        /// Maximum node executions for this run (overrides MAX_STEPS)
        #[arg(long, value_name = "N")]
        max_steps: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let _ = dotenv::dotenv();
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut options = CliOptions {
        fixture: args.fixture.clone(),
        max_steps: None,
    };

    let output = match &args.command {
        Command::Structure { agent_id } => {
            let config = build_config(&options, |k| std::env::var(k).ok())?;
            show_structure(&config, agent_id).await.map(|spec| {
                serde_json::to_string_pretty(&spec).unwrap_or_else(|_| spec.to_string())
            })
        }
        Command::Run {
            agent_id,
            state,
            trace,
            max_steps,
        } => {
            options.max_steps = *max_steps;
            let config = build_config(&options, |k| std::env::var(k).ok())?;
            run_agent(&config, agent_id, state.as_deref(), *trace)
                .await
                .map(|report| {
                    for line in &report.trace {
                        match &line.next {
                            Some(next) => println!("[{}] {} -> {}", line.step, line.node, next),
                            None => println!("[{}] {} (end)", line.step, line.node),
                        }
                    }
                    serde_json::to_string_pretty(&report.final_state)
                        .unwrap_or_else(|_| report.final_state.to_string())
                })
        }
    };

    match output {
        Ok(text) => {
            println!("{}", text);
            Ok(())
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
