//! `ClusterSource` backed by the Kubernetes API

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Event, Pod};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta as K8sObjectMeta;
use kube::api::{Api, ListParams};
use kube::Client;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use tracing::debug;

use super::{ClusterSource, NamespaceQuery};
use crate::error::SourceError;
use crate::models::{
    EventRecord, EventSeverity, ObjectMeta, ObjectRef, PodPhase, PodRecord, WorkloadDescriptor,
};

/// Reads deployments, pods and events through a kube client
#[derive(Clone)]
pub struct KubeClusterSource {
    client: Client,
}

impl KubeClusterSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the local kubeconfig or in-cluster environment
    pub async fn try_default() -> Result<Self, SourceError> {
        Ok(Self::new(Client::try_default().await?))
    }

    fn api<K>(&self, namespaces: &NamespaceQuery) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        <K as kube::Resource>::DynamicType: Default,
    {
        match namespaces.to_request_namespace() {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    async fn list<K>(&self, namespaces: &NamespaceQuery) -> Result<Vec<K>, SourceError>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + Debug,
        <K as kube::Resource>::DynamicType: Default,
    {
        let api: Api<K> = self.api(namespaces);
        let list = api.list(&ListParams::default()).await?;
        debug!(
            kind = %K::kind(&Default::default()),
            items = list.items.len(),
            "Listed resources"
        );
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterSource for KubeClusterSource {
    async fn list_deployments(
        &self,
        namespaces: &NamespaceQuery,
    ) -> Result<Vec<WorkloadDescriptor>, SourceError> {
        let items: Vec<Deployment> = self.list(namespaces).await?;
        Ok(items.iter().map(workload_from_deployment).collect())
    }

    async fn list_pods(&self, namespaces: &NamespaceQuery) -> Result<Vec<PodRecord>, SourceError> {
        let items: Vec<Pod> = self.list(namespaces).await?;
        Ok(items.iter().map(pod_record).collect())
    }

    async fn list_events(
        &self,
        namespaces: &NamespaceQuery,
    ) -> Result<Vec<EventRecord>, SourceError> {
        let items: Vec<Event> = self.list(namespaces).await?;
        Ok(items.iter().map(event_record).collect())
    }
}

fn object_meta(meta: &K8sObjectMeta) -> ObjectMeta {
    ObjectMeta {
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        labels: meta.labels.clone().unwrap_or_default(),
        creation_timestamp: meta.creation_timestamp.as_ref().map(|t| t.0),
    }
}

pub(crate) fn workload_from_deployment(deployment: &Deployment) -> WorkloadDescriptor {
    let spec = deployment.spec.as_ref();

    let template_images = spec
        .and_then(|s| s.template.spec.as_ref())
        .map(|pod_spec| {
            pod_spec
                .containers
                .iter()
                .filter_map(|c| c.image.clone())
                .collect()
        })
        .unwrap_or_default();

    WorkloadDescriptor {
        meta: object_meta(&deployment.metadata),
        // The API server defaults an unset replica count to 1
        desired_replicas: spec.and_then(|s| s.replicas).unwrap_or(1),
        observed_replicas: deployment
            .status
            .as_ref()
            .and_then(|s| s.replicas)
            .unwrap_or(0),
        selector: spec
            .and_then(|s| s.selector.match_labels.clone())
            .unwrap_or_default(),
        template_images,
    }
}

pub(crate) fn pod_record(pod: &Pod) -> PodRecord {
    let phase = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        .map(PodPhase::parse)
        .unwrap_or_default();

    PodRecord::new(object_meta(&pod.metadata), phase)
}

pub(crate) fn event_record(event: &Event) -> EventRecord {
    let target = &event.involved_object;

    EventRecord {
        involved_object: ObjectRef {
            kind: target.kind.clone().unwrap_or_default(),
            namespace: target
                .namespace
                .clone()
                .or_else(|| event.metadata.namespace.clone())
                .unwrap_or_default(),
            name: target.name.clone().unwrap_or_default(),
        },
        severity: event
            .type_
            .as_deref()
            .map(EventSeverity::parse)
            .unwrap_or_default(),
        reason: event.reason.clone(),
        message: event.message.clone().unwrap_or_default(),
    }
}
