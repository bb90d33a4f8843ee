//! Deployment list assembly
//!
//! Runs the selector over the deployments of a resource snapshot and joins
//! each selected deployment with its pods and their warning events.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use crate::dataselect::{select, ComparableValue, DataCell, DataSelectQuery, PropertyName};
use crate::error::Result;
use crate::events::pods_warning_messages;
use crate::gateway::{fetch_all, ClusterSource, NamespaceQuery};
use crate::health::{components, HealthRegistry};
use crate::models::{
    Deployment, DeploymentList, EventRecord, ListMeta, PodRecord, ResourceKind, TypeMeta,
    WorkloadDescriptor,
};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::pods::{filter_pods_by_selector, pod_info};

impl DataCell for WorkloadDescriptor {
    fn property(&self, name: PropertyName) -> Option<ComparableValue> {
        match name {
            PropertyName::Name => Some(ComparableValue::Str(self.meta.name.clone())),
            PropertyName::Namespace => Some(ComparableValue::Str(self.meta.namespace.clone())),
            PropertyName::CreationTimestamp => {
                self.meta.creation_timestamp.map(ComparableValue::Time)
            }
            PropertyName::DesiredReplicas => {
                Some(ComparableValue::Int(self.desired_replicas as i64))
            }
            PropertyName::ObservedReplicas => {
                Some(ComparableValue::Int(self.observed_replicas as i64))
            }
        }
    }
}

/// Distinct images in first-seen order
pub fn container_images(images: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    images
        .iter()
        .filter(|image| seen.insert(image.as_str()))
        .cloned()
        .collect()
}

/// Build the view model for one deployment
pub fn to_deployment(
    workload: WorkloadDescriptor,
    pods: &[PodRecord],
    events: &[EventRecord],
) -> Deployment {
    let matched = filter_pods_by_selector(pods, &workload.meta.namespace, &workload.selector);
    let mut info = pod_info(workload.observed_replicas, workload.desired_replicas, &matched);
    info.warnings = pods_warning_messages(events, &matched);

    Deployment {
        container_images: container_images(&workload.template_images),
        object_meta: workload.meta,
        type_meta: TypeMeta::new(ResourceKind::Deployment),
        pods: info,
    }
}

/// Select deployments with `query` and build a view model for each, in
/// selection order
pub fn create_deployment_list(
    deployments: Vec<WorkloadDescriptor>,
    pods: &[PodRecord],
    events: &[EventRecord],
    query: &DataSelectQuery,
) -> DeploymentList {
    let selected = select(deployments, query);

    DeploymentList {
        list_meta: ListMeta {
            total_items: selected.total_items,
        },
        deployments: selected
            .items
            .into_iter()
            .map(|workload| to_deployment(workload, pods, events))
            .collect(),
    }
}

/// Fetch everything needed from `source` and assemble the list. A failed
/// fetch aborts without a partial list.
pub async fn get_deployment_list(
    source: Arc<dyn ClusterSource>,
    namespaces: &NamespaceQuery,
    query: &DataSelectQuery,
) -> Result<DeploymentList> {
    let snapshot = fetch_all(source, namespaces).await?;
    Ok(create_deployment_list(
        snapshot.deployments,
        &snapshot.pods,
        &snapshot.events,
        query,
    ))
}

/// Deployment listing with metrics, logging and health reporting
#[derive(Clone)]
pub struct DeploymentListService {
    source: Arc<dyn ClusterSource>,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
    health: HealthRegistry,
}

impl DeploymentListService {
    pub fn new(
        source: Arc<dyn ClusterSource>,
        metrics: DashboardMetrics,
        logger: StructuredLogger,
        health: HealthRegistry,
    ) -> Self {
        Self {
            source,
            metrics,
            logger,
            health,
        }
    }

    pub async fn list(
        &self,
        namespaces: &NamespaceQuery,
        query: &DataSelectQuery,
    ) -> Result<DeploymentList> {
        let started = Instant::now();
        self.metrics.inc_list_requests();

        let snapshot = match fetch_all(Arc::clone(&self.source), namespaces).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.metrics.inc_list_errors();
                self.logger
                    .log_list_failed(namespaces.namespaces(), &err.to_string());
                self.health
                    .record_failure(components::CLUSTER_API, err.to_string())
                    .await;
                return Err(err);
            }
        };
        self.metrics
            .observe_fetch_latency(started.elapsed().as_secs_f64());
        self.health.record_success(components::CLUSTER_API).await;

        let list = create_deployment_list(
            snapshot.deployments,
            &snapshot.pods,
            &snapshot.events,
            query,
        );

        let elapsed = started.elapsed();
        self.metrics.observe_list_latency(elapsed.as_secs_f64());
        self.metrics
            .set_deployments_listed(list.list_meta.total_items);
        self.logger.log_list_served(
            namespaces.namespaces(),
            list.list_meta.total_items,
            list.deployments.len(),
            elapsed.as_millis(),
        );

        Ok(list)
    }
}
