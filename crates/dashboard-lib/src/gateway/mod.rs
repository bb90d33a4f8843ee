//! Concurrent fan-in of the resource lists a deployment list is built from
//!
//! Deployments, pods and events are fetched by three independent tasks. Each
//! task owns its own result, so nothing is shared between them; the results
//! are consumed in a fixed order once the tasks finish.

mod kube_source;


pub use kube_source::KubeClusterSource;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{DashboardError, Result, SourceError};
use crate::models::{EventRecord, PodRecord, ResourceKind, WorkloadDescriptor};

/// Namespaces a list request is scoped to. Empty means all namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceQuery {
    namespaces: Vec<String>,
}

impl NamespaceQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new<S: Into<String>>(namespaces: impl IntoIterator<Item = S>) -> Self {
        Self {
            namespaces: namespaces
                .into_iter()
                .map(Into::into)
                .filter(|ns: &String| !ns.is_empty())
                .collect(),
        }
    }

    pub fn single(namespace: impl Into<String>) -> Self {
        Self::new([namespace.into()])
    }

    /// Namespace to scope the API request to. Several namespaces are served
    /// by a cluster-wide list filtered afterwards.
    pub fn to_request_namespace(&self) -> Option<&str> {
        match self.namespaces.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }

    pub fn matches(&self, namespace: &str) -> bool {
        self.namespaces.is_empty() || self.namespaces.iter().any(|ns| ns == namespace)
    }

    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }
}

/// Read access to the cluster resources the dashboard needs
#[async_trait]
pub trait ClusterSource: Send + Sync {
    async fn list_deployments(
        &self,
        namespaces: &NamespaceQuery,
    ) -> Result<Vec<WorkloadDescriptor>, SourceError>;

    async fn list_pods(&self, namespaces: &NamespaceQuery) -> Result<Vec<PodRecord>, SourceError>;

    async fn list_events(
        &self,
        namespaces: &NamespaceQuery,
    ) -> Result<Vec<EventRecord>, SourceError>;
}

/// Immutable snapshot of the three resource lists
#[derive(Debug, Clone, Default)]
pub struct ResourceSnapshot {
    pub deployments: Vec<WorkloadDescriptor>,
    pub pods: Vec<PodRecord>,
    pub events: Vec<EventRecord>,
}

/// Fetch deployments, pods and events concurrently.
///
/// Results are checked in the order deployments, pods, events and the first
/// fatal error is returned without waiting on the remaining tasks. A
/// deployment kind the server does not serve yields an empty snapshot.
pub async fn fetch_all(
    source: Arc<dyn ClusterSource>,
    namespaces: &NamespaceQuery,
) -> Result<ResourceSnapshot> {
    let deployments_task = {
        let source = Arc::clone(&source);
        let namespaces = namespaces.clone();
        tokio::spawn(async move { source.list_deployments(&namespaces).await })
    };
    let pods_task = {
        let source = Arc::clone(&source);
        let namespaces = namespaces.clone();
        tokio::spawn(async move { source.list_pods(&namespaces).await })
    };
    let events_task = {
        let source = Arc::clone(&source);
        let namespaces = namespaces.clone();
        tokio::spawn(async move { source.list_events(&namespaces).await })
    };

    let mut deployments = match join(ResourceKind::Deployment, deployments_task).await? {
        Ok(deployments) => deployments,
        Err(err) if err.is_kind_unsupported() => {
            debug!(error = %err, "Deployments not served by the cluster, returning empty list");
            return Ok(ResourceSnapshot::default());
        }
        Err(err) => {
            return Err(DashboardError::Fetch {
                kind: ResourceKind::Deployment,
                source: err,
            })
        }
    };

    let mut pods = join(ResourceKind::Pod, pods_task)
        .await?
        .map_err(|source| DashboardError::Fetch {
            kind: ResourceKind::Pod,
            source,
        })?;

    let mut events = join(ResourceKind::Event, events_task)
        .await?
        .map_err(|source| DashboardError::Fetch {
            kind: ResourceKind::Event,
            source,
        })?;

    deployments.retain(|d| namespaces.matches(&d.meta.namespace));
    pods.retain(|p| namespaces.matches(&p.meta.namespace));
    events.retain(|e| namespaces.matches(&e.involved_object.namespace));

    debug!(
        deployments = deployments.len(),
        pods = pods.len(),
        events = events.len(),
        "Fetched resource snapshot"
    );

    Ok(ResourceSnapshot {
        deployments,
        pods,
        events,
    })
}

async fn join<T>(
    kind: ResourceKind,
    task: JoinHandle<Result<Vec<T>, SourceError>>,
) -> Result<Result<Vec<T>, SourceError>> {
    task.await
        .map_err(|source| DashboardError::TaskFailed { kind, source })
}
