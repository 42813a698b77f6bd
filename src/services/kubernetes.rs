//! Kubernetes engine
//!
//! Managed clusters, worker pools, and everywhere nodes, served by the
//! `kubernetes` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::KUBERNETES;
use crate::client::Client;
use crate::error::Result;

/// Kubernetes engine façade, obtained via [`Client::kubernetes`].
pub struct KubernetesService<'a> {
    client: &'a Client,
}

impl Client {
    /// Kubernetes engine operations.
    pub fn kubernetes(&self) -> KubernetesService<'_> {
        KubernetesService { client: self }
    }
}

/// A managed cluster as it appears in listings.
#[derive(Debug, Clone, Deserialize)]
pub struct Cluster {
    pub uid: String,
    pub name: String,
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub cluster_status: String,
    #[serde(default)]
    pub vpc_network_id: String,
    #[serde(default)]
    pub worker_pools_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Full cluster detail including worker pools.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterDetail {
    #[serde(flatten)]
    pub cluster: Cluster,
    #[serde(default)]
    pub worker_pools: Vec<WorkerPool>,
}

/// A worker pool.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerPool {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub volume_type: String,
    #[serde(default)]
    pub volume_size: u32,
    #[serde(default)]
    pub desired_size: u32,
    #[serde(default)]
    pub enable_autoscaling: bool,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default)]
    pub max_size: u32,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub nodes: Vec<PoolNode>,
    /// Provider-side labels and taints; left as loose JSON.
    #[serde(default)]
    pub labels: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub physical_id: String,
    #[serde(default)]
    pub status: String,
}

/// Worker pool shape accepted on cluster create and pool add.
#[derive(Debug, Clone, Serialize, Default)]
pub struct WorkerPoolSpec {
    pub name: String,
    pub flavor: String,
    pub volume_type: String,
    pub volume_size: u32,
    pub desired_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_autoscaling: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

/// Parameters for creating a cluster.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ClusterCreateRequest {
    pub name: String,
    /// Version id from [`KubernetesService::versions`].
    pub version: String,
    pub vpc_network_id: String,
    pub worker_pools: Vec<WorkerPoolSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// A supported control-plane version.
#[derive(Debug, Clone, Deserialize)]
pub struct K8sVersion {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// A node registered through the everywhere program (external hardware
/// joined to a managed control plane).
#[derive(Debug, Clone, Deserialize)]
pub struct EverywhereNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
struct AddPoolsRequest<'a> {
    worker_pools: &'a [WorkerPoolSpec],
}

impl<'a> KubernetesService<'a> {
    /// List clusters.
    pub async fn list(&self) -> Result<Vec<Cluster>> {
        #[derive(Deserialize)]
        struct ListResponse {
            clusters: Vec<Cluster>,
        }
        let response: ListResponse = self.client.api_get(KUBERNETES, "/clusters").await?;
        Ok(response.clusters)
    }

    /// Fetch one cluster with its worker pools.
    pub async fn get(&self, cluster_id: &str) -> Result<ClusterDetail> {
        self.client
            .api_get(KUBERNETES, format!("/clusters/{cluster_id}"))
            .await
    }

    /// Create a cluster.
    pub async fn create(&self, request: &ClusterCreateRequest) -> Result<ClusterDetail> {
        self.client.api_post(KUBERNETES, "/clusters", request).await
    }

    /// Delete a cluster and its worker pools.
    pub async fn delete(&self, cluster_id: &str) -> Result<()> {
        self.client
            .api_delete(KUBERNETES, format!("/clusters/{cluster_id}"))
            .await
    }

    /// Fetch one worker pool.
    pub async fn get_worker_pool(&self, cluster_id: &str, pool_id: &str) -> Result<WorkerPool> {
        self.client
            .api_get(KUBERNETES, format!("/clusters/{cluster_id}/{pool_id}"))
            .await
    }

    /// Add worker pools to an existing cluster.
    pub async fn add_worker_pools(
        &self,
        cluster_id: &str,
        pools: &[WorkerPoolSpec],
    ) -> Result<ClusterDetail> {
        self.client
            .api_put(
                KUBERNETES,
                format!("/clusters/{cluster_id}"),
                &AddPoolsRequest {
                    worker_pools: pools,
                },
            )
            .await
    }

    /// Delete a worker pool.
    pub async fn delete_worker_pool(&self, cluster_id: &str, pool_id: &str) -> Result<()> {
        self.client
            .api_delete(KUBERNETES, format!("/clusters/{cluster_id}/{pool_id}"))
            .await
    }

    /// Remove one node from a worker pool.
    pub async fn delete_node(
        &self,
        cluster_id: &str,
        pool_id: &str,
        node_id: &str,
    ) -> Result<()> {
        self.client
            .api_delete(
                KUBERNETES,
                format!("/clusters/{cluster_id}/{pool_id}/{node_id}"),
            )
            .await
    }

    /// Fetch the cluster's kubeconfig as raw YAML.
    pub async fn kubeconfig(&self, cluster_id: &str) -> Result<String> {
        let request = self.client.new_request::<()>(
            reqwest::Method::GET,
            KUBERNETES,
            format!("/clusters/{cluster_id}/kubeconfig"),
            None,
        )?;
        let response = self.client.send(&request).await?;
        Ok(response.text().await?)
    }

    /// Control-plane versions available for new clusters.
    pub async fn versions(&self) -> Result<Vec<K8sVersion>> {
        #[derive(Deserialize)]
        struct ListResponse {
            controller_versions: Vec<K8sVersion>,
        }
        let response: ListResponse = self.client.api_get(KUBERNETES, "/k8s-versions").await?;
        Ok(response.controller_versions)
    }

    /// Nodes registered through the everywhere program.
    pub async fn everywhere_nodes(&self) -> Result<Vec<EverywhereNode>> {
        self.client.api_get(KUBERNETES, "/everywheres").await
    }

    /// Fetch one everywhere node.
    pub async fn get_everywhere_node(&self, node_id: &str) -> Result<EverywhereNode> {
        self.client
            .api_get(KUBERNETES, format!("/everywheres/{node_id}"))
            .await
    }
}
