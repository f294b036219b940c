//! Kubernetes client for kubesnap
//!
//! This crate provides the control-plane capability the aggregator
//! consumes: listing namespaces and the resource names inside them.
//! The `ClusterClient` trait is the seam; `KubeClusterClient` is the
//! production implementation on top of the kube API client.

mod client;
mod error;

pub use client::{ClusterClient, KubeClusterClient};
pub use error::ClientError;
