//! Core data models for the deployment dashboard
//!
//! The record types (`WorkloadDescriptor`, `PodRecord`, `EventRecord`) are
//! read-only snapshots of cluster objects. The view types (`PodInfo`,
//! `Deployment`, `DeploymentList`) are rebuilt on every list request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kinds of cluster resources the dashboard reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Deployment,
    Pod,
    Event,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Deployment => "deployment",
            ResourceKind::Pod => "pod",
            ResourceKind::Event => "event",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity metadata shared by every record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
}

impl ObjectMeta {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn with_labels<K, V>(mut self, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = labels
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn with_creation_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.creation_timestamp = Some(timestamp);
        self
    }
}

/// Resource kind as reported to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMeta {
    pub kind: ResourceKind,
}

impl TypeMeta {
    pub fn new(kind: ResourceKind) -> Self {
        Self { kind }
    }
}

/// A deployment as read from the cluster API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDescriptor {
    pub meta: ObjectMeta,
    /// `spec.replicas`
    pub desired_replicas: i32,
    /// `status.replicas`
    pub observed_replicas: i32,
    /// `spec.selector.matchLabels`
    pub selector: BTreeMap<String, String>,
    /// Images of the pod template containers, in declaration order
    pub template_images: Vec<String>,
}

/// Lifecycle phase of a pod
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PodPhase {
    Pending,
    Running,
    Succeeded,
    Failed,
    #[default]
    Unknown,
}

impl PodPhase {
    /// Parse the phase string reported in `status.phase`
    pub fn parse(phase: &str) -> Self {
        match phase {
            "Pending" => PodPhase::Pending,
            "Running" => PodPhase::Running,
            "Succeeded" => PodPhase::Succeeded,
            "Failed" => PodPhase::Failed,
            _ => PodPhase::Unknown,
        }
    }
}

/// A pod as read from the cluster API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodRecord {
    pub meta: ObjectMeta,
    pub phase: PodPhase,
}

impl PodRecord {
    pub fn new(meta: ObjectMeta, phase: PodPhase) -> Self {
        Self { meta, phase }
    }
}

/// Event type classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSeverity {
    #[default]
    Normal,
    Warning,
}

impl EventSeverity {
    /// Parse the `type` field of an event; anything but `Warning` is normal
    pub fn parse(value: &str) -> Self {
        if value == "Warning" {
            EventSeverity::Warning
        } else {
            EventSeverity::Normal
        }
    }
}

/// Reference to the object an event concerns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

/// A cluster event as read from the cluster API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub involved_object: ObjectRef,
    pub severity: EventSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub message: String,
}

/// Aggregate information about the pods belonging to one workload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodInfo {
    /// Replicas the workload reports as existing
    pub current: i32,
    /// Replicas the workload asks for
    pub desired: i32,
    pub running: i32,
    pub pending: i32,
    pub failed: i32,
    pub succeeded: i32,
    /// Warning event messages for the matched pods
    pub warnings: Vec<String>,
}

/// Presentation view of a deployment with its correlated pods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub object_meta: ObjectMeta,
    pub type_meta: TypeMeta,
    pub pods: PodInfo,
    pub container_images: Vec<String>,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    /// Item count after filtering, before pagination
    pub total_items: usize,
}

/// Deployment list returned to the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentList {
    pub list_meta: ListMeta,
    pub deployments: Vec<Deployment>,
}

impl DeploymentList {
    pub fn empty() -> Self {
        Self::default()
    }
}
