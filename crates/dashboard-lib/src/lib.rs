//! Deployment dashboard core
//!
//! This crate turns cluster state into the deployment list shown by the
//! dashboard:
//! - Concurrent fan-in of deployments, pods and events
//! - Generic sort, filter and pagination
//! - Pod correlation by label selector and warning event extraction
//! - Health checks and observability

pub mod dataselect;
pub mod deployment;
pub mod error;
pub mod events;
pub mod gateway;
pub mod health;
pub mod models;
pub mod observability;
pub mod pods;

pub use dataselect::{DataSelectQuery, SelectionRequest};
pub use deployment::{create_deployment_list, get_deployment_list, DeploymentListService};
pub use error::{DashboardError, SourceError};
pub use gateway::{ClusterSource, KubeClusterSource, NamespaceQuery};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
