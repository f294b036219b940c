use anyhow::{Context, Result};
use async_trait::async_trait;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Namespace, Pod, Service};
use kube::Api;
use kube::api::ListParams;
use kube::config::{KubeConfigOptions, Kubeconfig};
use tracing::debug;

use crate::error::ClientError;

/// Read-only view of a cluster's control plane.
///
/// The aggregator takes this as an explicit dependency so production
/// code runs against `KubeClusterClient` and tests against a double.
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Name of the cluster backing this client
    async fn cluster_name(&self) -> Result<String, ClientError>;

    /// List all namespace names in the cluster
    async fn list_namespaces(&self) -> Result<Vec<String>, ClientError>;

    /// List pod names in a namespace
    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClientError>;

    /// List deployment names in a namespace
    async fn list_deployments(&self, namespace: &str) -> Result<Vec<String>, ClientError>;

    /// List service names in a namespace
    async fn list_services(&self, namespace: &str) -> Result<Vec<String>, ClientError>;
}

/// `ClusterClient` backed by the kube API client
pub struct KubeClusterClient {
    client: kube::Client,
    cluster_name: Option<String>,
}

impl KubeClusterClient {
    /// Connect using the default kubeconfig, optionally overriding the
    /// context
    pub async fn new(context: Option<&str>) -> Result<Self> {
        let kubeconfig =
            Kubeconfig::read().context("Failed to read kubeconfig. Is kubectl configured?")?;

        let context_name = context
            .map(str::to_owned)
            .or_else(|| kubeconfig.current_context.clone());

        // The cluster name lives on the context entry, as metadata only;
        // a kubeconfig without one still yields a working client.
        let cluster_name = context_name.as_ref().and_then(|name| {
            kubeconfig
                .contexts
                .iter()
                .find(|ctx| ctx.name == *name)
                .and_then(|ctx| ctx.context.as_ref())
                .map(|ctx| ctx.cluster.clone())
        });

        let config = kube::Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context_name.clone(),
                ..Default::default()
            },
        )
        .await
        .context(format!(
            "Failed to create config for context: {}",
            context_name.as_deref().unwrap_or("<current>")
        ))?;

        let client = kube::Client::try_from(config).context("Failed to create client")?;

        Ok(Self {
            client,
            cluster_name,
        })
    }
}

#[async_trait]
impl ClusterClient for KubeClusterClient {
    async fn cluster_name(&self) -> Result<String, ClientError> {
        self.cluster_name
            .clone()
            .ok_or_else(|| ClientError::Identity("no cluster entry for the active context".into()))
    }

    async fn list_namespaces(&self) -> Result<Vec<String>, ClientError> {
        let namespaces: Api<Namespace> = Api::all(self.client.clone());
        let list = namespaces.list(&ListParams::default()).await?;

        debug!(count = list.items.len(), "listed namespaces");
        Ok(list
            .items
            .into_iter()
            .filter_map(|ns| ns.metadata.name)
            .collect())
    }

    async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ClientError> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let list = pods.list(&ListParams::default()).await?;

        debug!(namespace, count = list.items.len(), "listed pods");
        Ok(list
            .items
            .into_iter()
            .filter_map(|pod| pod.metadata.name)
            .collect())
    }

    async fn list_deployments(&self, namespace: &str) -> Result<Vec<String>, ClientError> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        let list = deployments.list(&ListParams::default()).await?;

        debug!(namespace, count = list.items.len(), "listed deployments");
        Ok(list
            .items
            .into_iter()
            .filter_map(|deploy| deploy.metadata.name)
            .collect())
    }

    async fn list_services(&self, namespace: &str) -> Result<Vec<String>, ClientError> {
        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let list = services.list(&ListParams::default()).await?;

        debug!(namespace, count = list.items.len(), "listed services");
        Ok(list
            .items
            .into_iter()
            .filter_map(|svc| svc.metadata.name)
            .collect())
    }
}
