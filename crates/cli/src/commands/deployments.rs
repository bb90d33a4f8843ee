//! Deployment list command

use anyhow::Result;
use tabled::Tabled;

use crate::client::{ApiClient, DeploymentList, ListQuery};
use crate::output::{format_list, format_pods, print_info, print_json, print_warning, OutputFormat};

/// Row for the deployments table
#[derive(Tabled)]
struct DeploymentRow {
    #[tabled(rename = "Namespace")]
    namespace: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pods")]
    pods: String,
    #[tabled(rename = "Pending")]
    pending: i32,
    #[tabled(rename = "Failed")]
    failed: i32,
    #[tabled(rename = "Images")]
    images: String,
    #[tabled(rename = "Warnings")]
    warnings: usize,
}

/// API path for a namespace selection
pub fn list_path(namespace: Option<&str>) -> String {
    match namespace {
        Some(ns) => format!("api/v1/deployment/{}", ns),
        None => "api/v1/deployment".to_string(),
    }
}

/// List deployments with optional filter, sort and page
pub async fn list_deployments(
    client: &ApiClient,
    namespace: Option<String>,
    query: ListQuery,
    format: OutputFormat,
) -> Result<()> {
    let path = list_path(namespace.as_deref());
    let page = query.page_number.unwrap_or(0);
    let page_size = query.page_size;

    let result: DeploymentList = client.get(&path, &query).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => {
            if result.deployments.is_empty() {
                print_warning("No deployments found");
                return Ok(());
            }

            let rows: Vec<DeploymentRow> = result
                .deployments
                .iter()
                .map(|d| DeploymentRow {
                    namespace: d.object_meta.namespace.clone(),
                    name: d.object_meta.name.clone(),
                    pods: format_pods(d.pods.running, d.pods.desired),
                    pending: d.pods.pending,
                    failed: d.pods.failed,
                    images: format_list(&d.container_images, 2),
                    warnings: d.pods.warnings.len(),
                })
                .collect();

            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);

            match page_size {
                Some(size) if size > 0 => {
                    let pages = result.list_meta.total_items.div_ceil(size);
                    println!(
                        "\nPage {} of {} ({} deployments)",
                        page + 1,
                        pages,
                        result.list_meta.total_items
                    );
                }
                _ => println!("\nTotal: {} deployments", result.list_meta.total_items),
            }

            for d in result.deployments.iter().filter(|d| !d.pods.warnings.is_empty()) {
                print_info(&format!(
                    "{}/{}: {}",
                    d.object_meta.namespace,
                    d.object_meta.name,
                    d.pods.warnings.join("; ")
                ));
            }
        }
    }

    Ok(())
}
