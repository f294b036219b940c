use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use kubesnap_k8s::{ClientError, ClusterClient};
use kubesnap_types::{ClusterSnapshot, QueryFailure, ResourceKind};

use crate::error::SnapshotError;

/// Cluster name used when the client cannot report one
const UNKNOWN_CLUSTER: &str = "unknown";

/// Default cap on in-flight list requests against the API server
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Builds point-in-time snapshots of resource names across a cluster.
///
/// The client is an explicit dependency so tests can inject a double.
pub struct SnapshotBuilder {
    client: Arc<dyn ClusterClient>,
    max_in_flight: usize,
}

impl SnapshotBuilder {
    pub fn new(client: Arc<dyn ClusterClient>) -> Self {
        Self {
            client,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Cap the number of list requests in flight at once
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Scan the cluster and assemble a snapshot.
    ///
    /// Namespaces are listed once; that list fixes the key set of all
    /// three resource maps. Each (namespace, kind) pair then runs as
    /// its own query under a shared semaphore. A failed query marks its
    /// entry and the scan continues; an unreachable control plane or a
    /// fired cancellation token aborts the remaining work.
    pub async fn build(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ClusterSnapshot, SnapshotError> {
        let cluster_name = match self.client.cluster_name().await {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "cluster identity unavailable, using sentinel");
                UNKNOWN_CLUSTER.to_string()
            }
        };

        let namespaces = tokio::select! {
            _ = cancel.cancelled() => {
                return Err(SnapshotError::Cancelled {
                    partial: Box::new(ClusterSnapshot::new(cluster_name, Vec::new())),
                });
            }
            res = self.client.list_namespaces() => {
                res.map_err(SnapshotError::NamespaceList)?
            }
        };
        debug!(count = namespaces.len(), "namespaces listed");

        // Seeding up front makes the key-set invariant hold no matter
        // which queries complete.
        let mut snapshot = ClusterSnapshot::new(cluster_name, namespaces.clone());

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut queries = JoinSet::new();

        for namespace in namespaces {
            for kind in ResourceKind::ALL {
                let client = Arc::clone(&self.client);
                let semaphore = Arc::clone(&semaphore);
                let cancel = cancel.clone();
                let namespace = namespace.clone();

                queries.spawn(async move {
                    let _permit = semaphore.acquire().await.expect("semaphore closed");

                    tokio::select! {
                        _ = cancel.cancelled() => None,
                        res = list_kind(client.as_ref(), kind, &namespace) => {
                            Some((namespace, kind, res))
                        }
                    }
                });
            }
        }

        while let Some(joined) = queries.join_next().await {
            let outcome = joined.map_err(SnapshotError::WorkerPanicked)?;

            let Some((namespace, kind, result)) = outcome else {
                queries.abort_all();
                return Err(SnapshotError::Cancelled {
                    partial: Box::new(snapshot),
                });
            };

            match result {
                Ok(names) => {
                    debug!(namespace = %namespace, kind = %kind, count = names.len(), "query completed");
                    snapshot.insert(kind, &namespace, names);
                }
                Err(err) if err.is_fatal() => {
                    queries.abort_all();
                    return Err(SnapshotError::ConnectionLost(err));
                }
                Err(err) => {
                    warn!(namespace = %namespace, kind = %kind, error = %err, "resource query failed");
                    snapshot.record_failure(QueryFailure {
                        namespace,
                        kind,
                        message: err.to_string(),
                    });
                }
            }
        }

        Ok(snapshot)
    }
}

async fn list_kind(
    client: &dyn ClusterClient,
    kind: ResourceKind,
    namespace: &str,
) -> Result<Vec<String>, ClientError> {
    match kind {
        ResourceKind::Pod => client.list_pods(namespace).await,
        ResourceKind::Deployment => client.list_deployments(namespace).await,
        ResourceKind::Service => client.list_services(namespace).await,
    }
}
