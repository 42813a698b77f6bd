//! Managed databases
//!
//! Database instances, nodes, configurations, backups and schedules,
//! autoscaling, trusted sources, and the engine/flavor catalog, served by
//! the `database` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DATABASE;
use crate::client::Client;
use crate::error::Result;

/// Managed database façade, obtained via [`Client::database`].
pub struct DatabaseService<'a> {
    client: &'a Client,
}

impl Client {
    /// Managed database operations.
    pub fn database(&self) -> DatabaseService<'_> {
        DatabaseService { client: self }
    }
}

/// A database instance (primary plus its replicas).
#[derive(Debug, Clone, Deserialize)]
pub struct DbInstance {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub volume_size: u32,
    #[serde(default)]
    pub nodes: Vec<DbNode>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Provider metadata the schema does not pin down.
    #[serde(default)]
    pub metadata: Value,
}

/// One node of an instance.
#[derive(Debug, Clone, Deserialize)]
pub struct DbNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub addresses: Value,
}

/// Parameters for creating an instance.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DbInstanceCreateRequest {
    pub name: String,
    /// Engine id from [`DatabaseService::engines`].
    pub engine_id: String,
    pub flavor: String,
    pub volume_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscaling: Option<AutoscalingSpec>,
}

/// Volume autoscaling bounds.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AutoscalingSpec {
    pub enable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_limited: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_threshold: Option<u32>,
}

/// A configuration group of engine parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct DbConfiguration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub datastore: Value,
    #[serde(default)]
    pub node_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A backup of an instance or node.
#[derive(Debug, Clone, Deserialize)]
pub struct DbBackup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: f64,
    #[serde(default)]
    pub node_id: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
}

/// A recurring backup schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct DbBackupSchedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub node_id: String,
    #[serde(default)]
    pub limit_backup: u32,
    #[serde(default)]
    pub pattern: String,
    #[serde(default)]
    pub next_execution_time: Option<String>,
}

/// A database engine with its available versions.
#[derive(Debug, Clone, Deserialize)]
pub struct DbEngine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub versions: Vec<DbEngineVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbEngineVersion {
    pub id: String,
    #[serde(default)]
    pub version: String,
}

/// An async database task.
#[derive(Debug, Clone, Deserialize)]
pub struct DbTask {
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub result: Value,
}

#[derive(Serialize)]
struct ResizeFlavorRequest<'a> {
    action: &'a str,
    flavor_name: &'a str,
}

#[derive(Serialize)]
struct ResizeVolumeRequest<'a> {
    action: &'a str,
    new_size: u32,
}

#[derive(Serialize)]
struct TrustedSourcesRequest<'a> {
    trusted_sources: &'a [String],
}

#[derive(Serialize)]
struct ScheduleCreateRequest<'a> {
    name: &'a str,
    /// Crontab-style pattern understood by the provider.
    pattern: &'a str,
    limit_backup: u32,
}

#[derive(Serialize)]
struct BackupCreateRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parent_id: Option<&'a str>,
}

#[derive(Serialize)]
struct ConfigurationRequest<'a> {
    configuration_name: &'a str,
    configuration_parameters: &'a Value,
}

impl<'a> DatabaseService<'a> {
    // Instances

    /// List instances.
    pub async fn list_instances(&self) -> Result<Vec<DbInstance>> {
        #[derive(Deserialize)]
        struct ListResponse {
            instances: Vec<DbInstance>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/instances").await?;
        Ok(response.instances)
    }

    /// Fetch one instance by id.
    pub async fn get_instance(&self, id: &str) -> Result<DbInstance> {
        self.client
            .api_get(DATABASE, format!("/instances/{id}"))
            .await
    }

    /// Create an instance.
    pub async fn create_instance(&self, request: &DbInstanceCreateRequest) -> Result<DbInstance> {
        self.client.api_post(DATABASE, "/instances", request).await
    }

    /// Delete an instance and all its nodes.
    pub async fn delete_instance(&self, id: &str) -> Result<DbTask> {
        let request = self.client.new_request::<()>(
            reqwest::Method::DELETE,
            DATABASE,
            format!("/instances/{id}"),
            None,
        )?;
        self.client.send_decode(&request).await
    }

    // Nodes

    /// List all nodes across instances.
    pub async fn list_nodes(&self) -> Result<Vec<DbNode>> {
        #[derive(Deserialize)]
        struct ListResponse {
            nodes: Vec<DbNode>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/nodes").await?;
        Ok(response.nodes)
    }

    /// Fetch one node by id.
    pub async fn get_node(&self, id: &str) -> Result<DbNode> {
        self.client.api_get(DATABASE, format!("/nodes/{id}")).await
    }

    /// Move a node to another flavor.
    pub async fn resize_node_flavor(&self, id: &str, flavor_name: &str) -> Result<DbTask> {
        self.client
            .api_post(
                DATABASE,
                format!("/nodes/{id}/action"),
                &ResizeFlavorRequest {
                    action: "resize_flavor",
                    flavor_name,
                },
            )
            .await
    }

    /// Grow a node's data volume.
    pub async fn resize_node_volume(&self, id: &str, new_size: u32) -> Result<DbTask> {
        self.client
            .api_post(
                DATABASE,
                format!("/nodes/{id}/action"),
                &ResizeVolumeRequest {
                    action: "resize_volume",
                    new_size,
                },
            )
            .await
    }

    // Configurations

    /// List configuration groups.
    pub async fn list_configurations(&self) -> Result<Vec<DbConfiguration>> {
        #[derive(Deserialize)]
        struct ListResponse {
            configurations: Vec<DbConfiguration>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/configurations").await?;
        Ok(response.configurations)
    }

    /// Fetch one configuration group.
    pub async fn get_configuration(&self, id: &str) -> Result<DbConfiguration> {
        self.client
            .api_get(DATABASE, format!("/configurations/{id}"))
            .await
    }

    /// Create a configuration group. Parameter names and values are
    /// engine-specific and stay an opaque map.
    pub async fn create_configuration(
        &self,
        name: &str,
        parameters: &Value,
    ) -> Result<DbConfiguration> {
        self.client
            .api_post(
                DATABASE,
                "/configurations",
                &ConfigurationRequest {
                    configuration_name: name,
                    configuration_parameters: parameters,
                },
            )
            .await
    }

    /// Update a configuration group's parameters.
    pub async fn update_configuration(
        &self,
        id: &str,
        name: &str,
        parameters: &Value,
    ) -> Result<DbConfiguration> {
        self.client
            .api_put(
                DATABASE,
                format!("/configurations/{id}"),
                &ConfigurationRequest {
                    configuration_name: name,
                    configuration_parameters: parameters,
                },
            )
            .await
    }

    /// Delete a configuration group.
    pub async fn delete_configuration(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(DATABASE, format!("/configurations/{id}"))
            .await
    }

    // Backups and schedules

    /// List backups.
    pub async fn list_backups(&self) -> Result<Vec<DbBackup>> {
        #[derive(Deserialize)]
        struct ListResponse {
            backups: Vec<DbBackup>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/backups").await?;
        Ok(response.backups)
    }

    /// Fetch one backup.
    pub async fn get_backup(&self, id: &str) -> Result<DbBackup> {
        self.client.api_get(DATABASE, format!("/backups/{id}")).await
    }

    /// Back a node up now. `parent_id` makes the backup incremental.
    pub async fn create_backup(
        &self,
        node_id: &str,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<DbBackup> {
        self.client
            .api_post(
                DATABASE,
                format!("/nodes/{node_id}/backup"),
                &BackupCreateRequest { name, parent_id },
            )
            .await
    }

    /// Delete a backup.
    pub async fn delete_backup(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(DATABASE, format!("/backups/{id}"))
            .await
    }

    /// List backup schedules.
    pub async fn list_backup_schedules(&self) -> Result<Vec<DbBackupSchedule>> {
        #[derive(Deserialize)]
        struct ListResponse {
            schedules: Vec<DbBackupSchedule>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/schedules").await?;
        Ok(response.schedules)
    }

    /// Create a recurring backup schedule on a node.
    pub async fn create_backup_schedule(
        &self,
        node_id: &str,
        name: &str,
        pattern: &str,
        limit_backup: u32,
    ) -> Result<DbBackupSchedule> {
        self.client
            .api_post(
                DATABASE,
                format!("/nodes/{node_id}/schedule"),
                &ScheduleCreateRequest {
                    name,
                    pattern,
                    limit_backup,
                },
            )
            .await
    }

    /// Delete a schedule.
    pub async fn delete_backup_schedule(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(DATABASE, format!("/schedules/{id}"))
            .await
    }

    // Autoscaling and trusted sources

    /// Turn volume autoscaling on for an instance.
    pub async fn enable_autoscaling(&self, instance_id: &str, spec: &AutoscalingSpec) -> Result<()> {
        self.client
            .api_post_empty(DATABASE, format!("/instances/{instance_id}/autoscaling"), spec)
            .await
    }

    /// Turn volume autoscaling off.
    pub async fn disable_autoscaling(&self, instance_id: &str) -> Result<()> {
        self.client
            .api_delete(DATABASE, format!("/instances/{instance_id}/autoscaling"))
            .await
    }

    /// CIDRs allowed to reach a node.
    pub async fn get_trusted_sources(&self, node_id: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct GetResponse {
            trusted_sources: Vec<String>,
        }
        let response: GetResponse = self
            .client
            .api_get(DATABASE, format!("/nodes/{node_id}/trusted-sources"))
            .await?;
        Ok(response.trusted_sources)
    }

    /// Replace the trusted source list of a node.
    pub async fn set_trusted_sources(&self, node_id: &str, sources: &[String]) -> Result<()> {
        self.client
            .api_put_empty(
                DATABASE,
                format!("/nodes/{node_id}/trusted-sources"),
                &TrustedSourcesRequest {
                    trusted_sources: sources,
                },
            )
            .await
    }

    // Catalog

    /// Supported engines and versions.
    pub async fn engines(&self) -> Result<Vec<DbEngine>> {
        #[derive(Deserialize)]
        struct ListResponse {
            engines: Vec<DbEngine>,
        }
        let response: ListResponse = self.client.api_get(DATABASE, "/engines").await?;
        Ok(response.engines)
    }

    /// Flavors available for one engine version.
    pub async fn flavors(&self, engine_version_id: &str) -> Result<Vec<String>> {
        #[derive(Deserialize)]
        struct ListResponse {
            flavors: Vec<String>,
        }
        let response: ListResponse = self
            .client
            .api_get(DATABASE, format!("/flavors/{engine_version_id}"))
            .await?;
        Ok(response.flavors)
    }

    /// Poll an async database task.
    pub async fn get_task(&self, task_id: &str) -> Result<DbTask> {
        self.client
            .api_get(DATABASE, format!("/tasks/{task_id}/status"))
            .await
    }
}
