//! Deployment Dashboard CLI
//!
//! A command-line tool for listing deployments and checking the health of
//! the deployment dashboard server.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{deployments, health};

/// Deployment Dashboard CLI
#[derive(Parser)]
#[command(name = "dashctl")]
#[command(author, version, about = "CLI for the Deployment Dashboard", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via DASHBOARD_API_URL env var)
    #[arg(long, env = "DASHBOARD_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List deployments with their pods, images and warnings
    Deployments {
        /// Namespace, or comma separated namespaces (all if not specified)
        #[arg(long, short)]
        namespace: Option<String>,

        /// Case-insensitive text the deployment name must contain
        #[arg(long)]
        filter: Option<String>,

        /// Comma separated properties the filter is matched against
        #[arg(long)]
        filter_by: Option<String>,

        /// Sort criteria as order,property pairs (e.g. d,creationTimestamp)
        #[arg(long)]
        sort: Option<String>,

        /// Zero-based page number
        #[arg(long)]
        page: Option<usize>,

        /// Items per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show server and cluster API health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    let client = client::ApiClient::new(&config.resolve_api_url(cli.api_url))?;
    let format = cli
        .format
        .or(config.default_format)
        .unwrap_or_default();

    match cli.command {
        Commands::Deployments {
            namespace,
            filter,
            filter_by,
            sort,
            page,
            page_size,
        } => {
            let query = client::ListQuery {
                filter_text: filter,
                filter_by,
                sort_by: sort,
                page_number: page,
                page_size: page_size.or(config.page_size),
            };
            let namespace = namespace.or(config.default_namespace);
            deployments::list_deployments(&client, namespace, query, format).await?;
        }
        Commands::Health => {
            health::show_health(&client, format).await?;
        }
    }

    Ok(())
}
