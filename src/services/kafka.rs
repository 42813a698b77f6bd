//! Managed Kafka
//!
//! Kafka clusters and their flavor/version catalog, served by the `kafka`
//! service.

use serde::{Deserialize, Serialize};

use super::KAFKA;
use crate::client::Client;
use crate::error::Result;

/// Kafka façade, obtained via [`Client::kafka`].
pub struct KafkaService<'a> {
    client: &'a Client,
}

impl Client {
    /// Managed Kafka operations.
    pub fn kafka(&self) -> KafkaService<'_> {
        KafkaService { client: self }
    }
}

/// A managed Kafka cluster.
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaCluster {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub broker_count: u32,
    #[serde(default)]
    pub volume_size: u32,
    #[serde(default)]
    pub vpc_network_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for creating a cluster.
#[derive(Debug, Clone, Serialize, Default)]
pub struct KafkaClusterCreateRequest {
    pub name: String,
    /// Version id from [`KafkaService::versions`].
    pub version_id: String,
    pub flavor: String,
    pub broker_count: u32,
    pub volume_size: u32,
    pub vpc_network_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

/// A broker flavor.
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaFlavor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub ram: u32,
}

/// A supported Kafka version.
#[derive(Debug, Clone, Deserialize)]
pub struct KafkaVersion {
    pub id: String,
    pub version: String,
}

impl<'a> KafkaService<'a> {
    /// List clusters.
    pub async fn list(&self) -> Result<Vec<KafkaCluster>> {
        #[derive(Deserialize)]
        struct ListResponse {
            clusters: Vec<KafkaCluster>,
        }
        let response: ListResponse = self.client.api_get(KAFKA, "/clusters").await?;
        Ok(response.clusters)
    }

    /// Fetch one cluster by id.
    pub async fn get(&self, id: &str) -> Result<KafkaCluster> {
        self.client.api_get(KAFKA, format!("/clusters/{id}")).await
    }

    /// Create a cluster.
    pub async fn create(&self, request: &KafkaClusterCreateRequest) -> Result<KafkaCluster> {
        self.client.api_post(KAFKA, "/clusters", request).await
    }

    /// Delete a cluster.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(KAFKA, format!("/clusters/{id}"))
            .await
    }

    /// Broker flavors.
    pub async fn flavors(&self) -> Result<Vec<KafkaFlavor>> {
        #[derive(Deserialize)]
        struct ListResponse {
            flavors: Vec<KafkaFlavor>,
        }
        let response: ListResponse = self.client.api_get(KAFKA, "/flavors").await?;
        Ok(response.flavors)
    }

    /// Supported versions.
    pub async fn versions(&self) -> Result<Vec<KafkaVersion>> {
        #[derive(Deserialize)]
        struct ListResponse {
            versions: Vec<KafkaVersion>,
        }
        let response: ListResponse = self.client.api_get(KAFKA, "/versions").await?;
        Ok(response.versions)
    }
}
