//! Shared types for kubesnap
//!
//! This crate contains the snapshot data model that the aggregator
//! produces and the presentation layer consumes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Resource kinds collected into a snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    Deployment,
    Service,
}

impl ResourceKind {
    /// Every kind a scan collects, in the order queries are issued
    pub const ALL: [ResourceKind; 3] = [Self::Pod, Self::Deployment, Self::Service];

    /// Plural label used in display and serialized output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pods",
            Self::Deployment => "deployments",
            Self::Service => "services",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-namespace, per-kind query that failed during a scan
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryFailure {
    pub namespace: String,
    pub kind: ResourceKind,
    pub message: String,
}

/// Point-in-time view of resource names across a cluster
///
/// The namespace list fetched at scan start is the authoritative key
/// set: every namespace has an entry in all three maps, even when its
/// queries failed. A failed query keeps its (empty) entry and is
/// recorded in `errors`, so an empty namespace and a failed query stay
/// distinguishable.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClusterSnapshot {
    pub cluster_name: String,
    pub taken_at: DateTime<Utc>,
    /// Namespaces in the order the API server returned them
    pub namespaces: Vec<String>,
    pub pods: BTreeMap<String, Vec<String>>,
    pub deployments: BTreeMap<String, Vec<String>>,
    pub services: BTreeMap<String, Vec<String>>,
    /// Queries that failed; their map entries are present but empty
    pub errors: Vec<QueryFailure>,
}

impl ClusterSnapshot {
    /// Create a snapshot seeded with an empty entry per namespace in
    /// all three maps
    pub fn new(cluster_name: String, namespaces: Vec<String>) -> Self {
        let seed = || -> BTreeMap<String, Vec<String>> {
            namespaces
                .iter()
                .map(|ns| (ns.clone(), Vec::new()))
                .collect()
        };

        Self {
            cluster_name,
            taken_at: Utc::now(),
            pods: seed(),
            deployments: seed(),
            services: seed(),
            namespaces,
            errors: Vec::new(),
        }
    }

    /// The mapping for one resource kind
    pub fn names(&self, kind: ResourceKind) -> &BTreeMap<String, Vec<String>> {
        match kind {
            ResourceKind::Pod => &self.pods,
            ResourceKind::Deployment => &self.deployments,
            ResourceKind::Service => &self.services,
        }
    }

    fn names_mut(&mut self, kind: ResourceKind) -> &mut BTreeMap<String, Vec<String>> {
        match kind {
            ResourceKind::Pod => &mut self.pods,
            ResourceKind::Deployment => &mut self.deployments,
            ResourceKind::Service => &mut self.services,
        }
    }

    /// Store the result of one completed (namespace, kind) query
    pub fn insert(&mut self, kind: ResourceKind, namespace: &str, names: Vec<String>) {
        self.names_mut(kind).insert(namespace.to_string(), names);
    }

    /// Record a failed query; its map entry stays seeded and empty
    pub fn record_failure(&mut self, failure: QueryFailure) {
        self.errors.push(failure);
    }

    /// Whether any query failed during the scan
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether this (namespace, kind) entry is empty because its query
    /// failed rather than because the namespace holds nothing
    pub fn failed(&self, namespace: &str, kind: ResourceKind) -> bool {
        self.errors
            .iter()
            .any(|e| e.namespace == namespace && e.kind == kind)
    }
}
