mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod rpc;
mod services;
#[cfg(test)]
mod test_support;
mod workflow;

use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::relay::{self, TargetArgs};
use crate::config::{AppConfig, LogFormat};
use crate::context::AppContext;
use crate::error::AppResult;

#[derive(Parser)]
#[command(
    name = "ticket-relay",
    author,
    version,
    about = "Route prompts to a chat reply or a generated Jira ticket"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the relay operations over HTTP.
    Serve,
    /// Acknowledge a project sync.
    Sync(SyncArgs),
    /// Generate a ticket from a prompt and create it.
    Card(CardArgs),
    /// Send a free-form message; it is answered locally or turned into a ticket.
    Message(MessageArgs),
    /// Inspect configuration.
    Config(ConfigArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Jira project key.
    #[arg(short, long)]
    project: String,
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args)]
struct CardArgs {
    /// Jira project key. Falls back to JIRA_PROJECT_KEY.
    #[arg(short, long, default_value = "")]
    project: String,
    /// What the ticket should be about.
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Args)]
struct MessageArgs {
    #[arg(required = true, num_args = 1..)]
    prompt: Vec<String>,
    #[command(flatten)]
    target: TargetArgs,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    init_logging(config.log_format);

    match cli.command {
        Commands::Serve => {
            relay::warn_missing_credentials(&config);
            rpc::server::serve(AppContext::from_config(config)).await
        }
        Commands::Sync(args) => {
            let target = relay::relay_for(config, &args.target);
            relay::sync(target.as_ref(), &args.project).await
        }
        Commands::Card(args) => {
            let target = relay::relay_for(config, &args.target);
            relay::create_card(target.as_ref(), &args.project, &args.prompt.join(" ")).await
        }
        Commands::Message(args) => {
            let target = relay::relay_for(config, &args.target);
            relay::message(target.as_ref(), &args.prompt.join(" ")).await
        }
        Commands::Config(args) => config_cmd::run(&config, args.command),
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}
