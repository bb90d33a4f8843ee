//! Error types for the dashboard core

use crate::models::ResourceKind;
use thiserror::Error;

/// Failure reported by a `ClusterSource` list call
#[derive(Debug, Error)]
pub enum SourceError {
    /// The server does not serve this resource kind at all
    #[error("resource kind {kind} is not served by the cluster")]
    KindUnsupported { kind: ResourceKind },

    #[error(transparent)]
    Kube(#[from] kube::Error),

    #[error("cluster API unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    /// True when the error means the kind is missing on the server rather
    /// than a failed request
    pub fn is_kind_unsupported(&self) -> bool {
        match self {
            SourceError::KindUnsupported { .. } => true,
            SourceError::Kube(kube::Error::Api(response)) => {
                response.code == 404 || response.reason == "NotFound"
            }
            _ => false,
        }
    }
}

/// Errors surfaced to callers of the dashboard core
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to list {kind}s: {source}")]
    Fetch {
        kind: ResourceKind,
        #[source]
        source: SourceError,
    },

    #[error("{kind} fetch task did not complete: {source}")]
    TaskFailed {
        kind: ResourceKind,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("invalid selection query: {0}")]
    InvalidQuery(String),
}

impl DashboardError {
    /// True for errors caused by the caller's query rather than the cluster
    pub fn is_client_error(&self) -> bool {
        matches!(self, DashboardError::InvalidQuery(_))
    }
}

pub type Result<T, E = DashboardError> = std::result::Result<T, E>;
