//! review-robot CLI

mod cli;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "review-robot")]
#[command(about = "Review commands and merge eligibility checks for pull requests")]
#[command(version)]
struct Cli {
    /// Log filter (e.g. `warn`, `review_robot=debug`)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// GitHub API base URL (GitHub Enterprise or a test server)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the handlers for one webhook delivery
    Handle {
        /// Bot configuration file (YAML)
        #[arg(long)]
        config: PathBuf,

        /// Event type: `pull_request` or `issue_comment`
        #[arg(long)]
        event: String,

        /// Payload file (JSON), `-` for stdin
        #[arg(long)]
        payload: PathBuf,
    },

    /// Evaluate whether a PR may be merged, without merging
    Check {
        /// Bot configuration file (YAML)
        #[arg(long)]
        config: PathBuf,

        /// Organization
        #[arg(long)]
        org: String,

        /// Repository
        #[arg(long)]
        repo: String,

        /// PR number
        #[arg(long)]
        number: u64,

        /// Evaluate on behalf of this commenter
        #[arg(long)]
        trigger: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Handle {
            config,
            event,
            payload,
        } => {
            cli::run_handle(&config, cli.api_url.as_deref(), &event, &payload)
                .await
                .with_context(|| format!("failed to handle {event} event"))?;
        }
        Commands::Check {
            config,
            org,
            repo,
            number,
            trigger,
        } => {
            cli::run_check(
                &config,
                cli.api_url.as_deref(),
                &org,
                &repo,
                number,
                trigger.as_deref(),
            )
            .await
            .with_context(|| format!("failed to check {org}/{repo}#{number}"))?;
        }
    }

    Ok(())
}
