//! Dashboard server configuration

use anyhow::Result;
use dashboard_lib::NamespaceQuery;
use serde::Deserialize;

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Instance name used in structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Port for the list API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Comma separated namespaces listed by `/api/v1/deployment`. Empty means
    /// all namespaces.
    #[serde(default)]
    pub namespace: String,

    /// Consecutive cluster fetch failures before the server reports unhealthy
    #[serde(default = "default_unhealthy_after_failures")]
    pub unhealthy_after_failures: u32,
}

fn default_instance_name() -> String {
    std::env::var("POD_NAME").unwrap_or_else(|_| "dashboard".to_string())
}

fn default_api_port() -> u16 {
    9090
}

fn default_unhealthy_after_failures() -> u32 {
    dashboard_lib::health::DEFAULT_UNHEALTHY_AFTER_FAILURES
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            api_port: default_api_port(),
            namespace: String::new(),
            unhealthy_after_failures: default_unhealthy_after_failures(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `DASHBOARD_*` environment variables
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("DASHBOARD"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Namespaces served when a request does not name one
    pub fn namespaces(&self) -> NamespaceQuery {
        parse_namespaces(&self.namespace)
    }
}

/// Parse a comma separated namespace list
pub fn parse_namespaces(value: &str) -> NamespaceQuery {
    NamespaceQuery::new(value.split(',').map(str::trim))
}
