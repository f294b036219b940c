use kubesnap_k8s::ClientError;
use kubesnap_types::ClusterSnapshot;
use thiserror::Error;

/// Errors that abort a snapshot scan.
///
/// Per-query failures are not errors at this level; they are recorded
/// inside the snapshot itself.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Without the namespace list there is nothing to scan
    #[error("failed to list namespaces")]
    NamespaceList(#[source] ClientError),

    /// The control plane became unreachable mid-scan
    #[error("control plane unreachable during scan")]
    ConnectionLost(#[source] ClientError),

    /// The scan was cancelled; whatever had been merged is carried along
    #[error("snapshot cancelled before completion")]
    Cancelled { partial: Box<ClusterSnapshot> },

    /// A fan-out task panicked
    #[error("scan worker panicked")]
    WorkerPanicked(#[source] tokio::task::JoinError),
}
