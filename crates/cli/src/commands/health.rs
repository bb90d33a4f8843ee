//! Server health command

use anyhow::Result;
use colored::Colorize;

use crate::client::ApiClient;
use crate::output::{color_status, print_json, OutputFormat};

/// Show the health of the dashboard server and its components
pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health().await?;

    match format {
        OutputFormat::Json => print_json(&health)?,
        OutputFormat::Table => {
            println!("{} {}", "Dashboard:".bold(), color_status(&health.status));

            let mut names: Vec<&String> = health.components.keys().collect();
            names.sort();

            for name in names {
                let component = &health.components[name];
                let detail = match &component.message {
                    Some(message) => format!(
                        " ({}, {} consecutive failures)",
                        message, component.consecutive_failures
                    ),
                    None => String::new(),
                };
                println!("  {:<12} {}{}", name, color_status(&component.status), detail);
            }
        }
    }

    Ok(())
}
