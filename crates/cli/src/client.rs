//! API client for communicating with the dashboard server

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// API client for the dashboard server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request with query parameters
    pub async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Health endpoint; a 503 still carries a health body worth showing
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.base_url.join("healthz").context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        response.json().await.context("Failed to parse response")
    }
}

/// Query parameters of the deployment list endpoint
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

// API response types

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentList {
    pub list_meta: ListMeta,
    pub deployments: Vec<Deployment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total_items: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub object_meta: ObjectMeta,
    pub pods: PodInfo,
    pub container_images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodInfo {
    pub current: i32,
    pub desired: i32,
    pub running: i32,
    pub pending: i32,
    pub failed: i32,
    #[serde(default)]
    pub succeeded: i32,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub components: HashMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub consecutive_failures: u32,
    pub last_check_timestamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
        "listMeta": {"totalItems": 5},
        "deployments": [{
            "objectMeta": {"name": "frontend", "namespace": "web"},
            "typeMeta": {"kind": "deployment"},
            "pods": {"current": 2, "desired": 3, "running": 1, "pending": 1,
                     "failed": 0, "succeeded": 0, "warnings": ["Back-off"]},
            "containerImages": ["nginx:1.25"]
        }]
    }"#;

    #[tokio::test]
    async fn test_get_deployment_list_with_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/deployment/web")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("filterText".into(), "front".into()),
                mockito::Matcher::UrlEncoded("pageSize".into(), "1".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(LIST_BODY)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let query = ListQuery {
            filter_text: Some("front".into()),
            page_size: Some(1),
            ..Default::default()
        };
        let list: DeploymentList = client.get("api/v1/deployment/web", &query).await.unwrap();

        mock.assert_async().await;
        assert_eq!(list.list_meta.total_items, 5);
        assert_eq!(list.deployments[0].object_meta.name, "frontend");
        assert_eq!(list.deployments[0].pods.warnings, vec!["Back-off"]);
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/deployment")
            .with_status(500)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"failed to list pods: connection refused"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client
            .get::<DeploymentList, _>("api/v1/deployment", &ListQuery::default())
            .await
            .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("failed to list pods: connection refused"));
    }

    #[tokio::test]
    async fn test_health_reads_unavailable_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/healthz")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"status":"unhealthy","components":{"cluster_api":{"status":"unhealthy","message":"timeout","consecutive_failures":3,"last_check_timestamp":0}}}"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health = client.health().await.unwrap();
        assert_eq!(health.status, "unhealthy");
        assert_eq!(health.components["cluster_api"].consecutive_failures, 3);
    }
}
