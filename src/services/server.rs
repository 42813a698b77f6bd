//! Cloud servers
//!
//! Server lifecycle, power actions, flavors, OS images, and async task
//! polling against the `cloud_server` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{TaskRef, CLOUD_SERVER};
use crate::client::Client;
use crate::error::Result;

/// Cloud server façade, obtained via [`Client::servers`].
pub struct ServerService<'a> {
    client: &'a Client,
}

impl Client {
    /// Cloud server operations.
    pub fn servers(&self) -> ServerService<'_> {
        ServerService { client: self }
    }
}

/// A cloud server.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub flavor_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub ip_addresses: Value,
    #[serde(default)]
    pub attached_volumes: Vec<AttachedVolume>,
    #[serde(default)]
    pub created_at: Option<String>,
    /// Arbitrary provider metadata; no schema is forced on it.
    #[serde(default)]
    pub metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachedVolume {
    pub id: String,
    #[serde(default)]
    pub attached_type: String,
}

/// Server flavor (CPU/RAM shape).
#[derive(Debug, Clone, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vcpus: u32,
    #[serde(default)]
    pub ram: u32,
    #[serde(default)]
    pub category: String,
}

/// Bootable OS image.
#[derive(Debug, Clone, Deserialize)]
pub struct OsImage {
    pub os: String,
    #[serde(default)]
    pub versions: Vec<OsImageVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsImageVersion {
    pub id: String,
    pub name: String,
}

/// Parameters for creating a server.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ServerCreateRequest {
    pub name: String,
    pub flavor: String,
    #[serde(rename = "type")]
    pub server_type: String,
    pub os: ServerOs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<bool>,
    pub root_disk: DiskSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_disks: Vec<DiskSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
}

/// Boot source: an OS image, a snapshot, or an existing volume.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ServerOs {
    #[serde(rename = "type")]
    pub source_type: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct DiskSpec {
    pub size: u32,
    #[serde(rename = "type")]
    pub volume_type: String,
}

/// Status of an asynchronous server task.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerTask {
    pub ready: bool,
    #[serde(default)]
    pub result: Value,
}

#[derive(Serialize)]
struct ActionRequest<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    flavor_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_id: Option<&'a str>,
}

impl<'a> ActionRequest<'a> {
    fn new(action: &'a str) -> Self {
        ActionRequest {
            action,
            flavor_name: None,
            image: None,
            attachment_id: None,
        }
    }
}

#[derive(Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    delete_volume: &'a [String],
}

impl<'a> ServerService<'a> {
    /// List servers. `filter` is the provider's opaque `where` expression
    /// and is forwarded uninterpreted.
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<Server>> {
        match filter {
            Some(filter) => {
                self.client
                    .api_get_query(CLOUD_SERVER, "/servers", &[("where", filter.to_string())])
                    .await
            }
            None => self.client.api_get(CLOUD_SERVER, "/servers").await,
        }
    }

    /// Fetch one server by id.
    pub async fn get(&self, id: &str) -> Result<Server> {
        self.client
            .api_get(CLOUD_SERVER, format!("/servers/{id}"))
            .await
    }

    /// Create a server. Creation is asynchronous; poll the returned task.
    pub async fn create(&self, request: &ServerCreateRequest) -> Result<TaskRef> {
        self.client
            .api_post(CLOUD_SERVER, "/servers", request)
            .await
    }

    /// Delete a server, keeping its data disks.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/servers/{id}"))
            .await
    }

    /// Delete a server together with the listed attached volumes.
    pub async fn delete_with_volumes(&self, id: &str, volume_ids: &[String]) -> Result<()> {
        self.client
            .api_delete_body(
                CLOUD_SERVER,
                format!("/servers/{id}"),
                &DeleteRequest {
                    delete_volume: volume_ids,
                },
            )
            .await
    }

    /// Rename a server.
    pub async fn rename(&self, id: &str, name: &str) -> Result<()> {
        self.client
            .api_put_empty(
                CLOUD_SERVER,
                format!("/servers/{id}"),
                &RenameRequest { name },
            )
            .await
    }

    /// Power a stopped server on.
    pub async fn start(&self, id: &str) -> Result<()> {
        self.action(id, ActionRequest::new("start")).await
    }

    /// Power a server off.
    pub async fn stop(&self, id: &str) -> Result<()> {
        self.action(id, ActionRequest::new("stop")).await
    }

    /// Request a graceful reboot.
    pub async fn soft_reboot(&self, id: &str) -> Result<()> {
        self.action(id, ActionRequest::new("soft_reboot")).await
    }

    /// Force a reboot.
    pub async fn hard_reboot(&self, id: &str) -> Result<()> {
        self.action(id, ActionRequest::new("hard_reboot")).await
    }

    /// Resize to another flavor. The server reboots as part of the resize.
    pub async fn resize(&self, id: &str, flavor_name: &str) -> Result<TaskRef> {
        let mut action = ActionRequest::new("resize");
        action.flavor_name = Some(flavor_name);
        self.client
            .api_post(CLOUD_SERVER, format!("/servers/{id}/action"), &action)
            .await
    }

    /// Rebuild the root disk from the given image.
    pub async fn rebuild(&self, id: &str, image_id: &str) -> Result<TaskRef> {
        let mut action = ActionRequest::new("rebuild");
        action.image = Some(image_id);
        self.client
            .api_post(CLOUD_SERVER, format!("/servers/{id}/action"), &action)
            .await
    }

    /// Attach a volume.
    pub async fn attach_volume(&self, id: &str, volume_id: &str) -> Result<()> {
        let mut action = ActionRequest::new("attach_volume");
        action.attachment_id = Some(volume_id);
        self.action(id, action).await
    }

    /// Detach a volume.
    pub async fn detach_volume(&self, id: &str, volume_id: &str) -> Result<()> {
        let mut action = ActionRequest::new("detach_volume");
        action.attachment_id = Some(volume_id);
        self.action(id, action).await
    }

    /// Available flavors.
    pub async fn flavors(&self) -> Result<Vec<Flavor>> {
        self.client.api_get(CLOUD_SERVER, "/flavors").await
    }

    /// Available OS images, grouped by distribution.
    pub async fn os_images(&self) -> Result<Vec<OsImage>> {
        #[derive(Deserialize)]
        struct OsImageResponse {
            os_images: Vec<OsImage>,
        }
        let response: OsImageResponse = self.client.api_get(CLOUD_SERVER, "/images").await?;
        Ok(response.os_images)
    }

    /// Poll an asynchronous server task.
    pub async fn get_task(&self, task_id: &str) -> Result<ServerTask> {
        self.client
            .api_get(CLOUD_SERVER, format!("/tasks/{task_id}"))
            .await
    }

    async fn action(&self, id: &str, action: ActionRequest<'_>) -> Result<()> {
        self.client
            .api_post_empty(CLOUD_SERVER, format!("/servers/{id}/action"), &action)
            .await
    }
}
