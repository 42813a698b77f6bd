//! Block storage
//!
//! Volumes and volume snapshots, both served by the `cloud_server` service.

use serde::{Deserialize, Serialize};

use super::{TaskRef, CLOUD_SERVER};
use crate::client::Client;
use crate::error::Result;

/// Volume façade, obtained via [`Client::volumes`].
pub struct VolumeService<'a> {
    client: &'a Client,
}

/// Snapshot façade, obtained via [`Client::snapshots`].
pub struct SnapshotService<'a> {
    client: &'a Client,
}

impl Client {
    /// Block storage volume operations.
    pub fn volumes(&self) -> VolumeService<'_> {
        VolumeService { client: self }
    }

    /// Volume snapshot operations.
    pub fn snapshots(&self) -> SnapshotService<'_> {
        SnapshotService { client: self }
    }
}

/// A block storage volume.
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: u32,
    #[serde(rename = "type", default)]
    pub volume_type: String,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub attached_server: Vec<VolumeAttachment>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolumeAttachment {
    pub server_id: String,
    #[serde(default)]
    pub device: String,
}

/// A point-in-time snapshot of a volume.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub size: u32,
    pub volume_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for creating a volume.
#[derive(Debug, Clone, Serialize, Default)]
pub struct VolumeCreateRequest {
    pub name: String,
    pub size: u32,
    #[serde(rename = "volume_type")]
    pub volume_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    /// Create pre-populated from a snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_id: Option<String>,
}

#[derive(Serialize)]
struct ExtendRequest {
    new_size: u32,
}

#[derive(Serialize)]
struct VolumeActionRequest<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    server_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    snapshot_id: Option<&'a str>,
}

#[derive(Serialize)]
struct SnapshotCreateRequest<'a> {
    name: &'a str,
    volume_id: &'a str,
    force: bool,
}

impl<'a> VolumeService<'a> {
    /// List all volumes in the project.
    pub async fn list(&self) -> Result<Vec<Volume>> {
        self.client.api_get(CLOUD_SERVER, "/volumes").await
    }

    /// Fetch one volume by id.
    pub async fn get(&self, id: &str) -> Result<Volume> {
        self.client
            .api_get(CLOUD_SERVER, format!("/volumes/{id}"))
            .await
    }

    /// Create a volume.
    pub async fn create(&self, request: &VolumeCreateRequest) -> Result<Volume> {
        self.client
            .api_post(CLOUD_SERVER, "/volumes", request)
            .await
    }

    /// Delete a volume. Fails with a conflict while the volume is attached.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/volumes/{id}"))
            .await
    }

    /// Grow a volume. Shrinking is not supported by the provider.
    pub async fn extend(&self, id: &str, new_size: u32) -> Result<TaskRef> {
        self.client
            .api_put(
                CLOUD_SERVER,
                format!("/volumes/{id}/extend"),
                &ExtendRequest { new_size },
            )
            .await
    }

    /// Attach the volume to a server.
    pub async fn attach(&self, id: &str, server_id: &str) -> Result<()> {
        self.action(
            id,
            VolumeActionRequest {
                action: "attach",
                server_id: Some(server_id),
                snapshot_id: None,
            },
        )
        .await
    }

    /// Detach the volume from its server.
    pub async fn detach(&self, id: &str, server_id: &str) -> Result<()> {
        self.action(
            id,
            VolumeActionRequest {
                action: "detach",
                server_id: Some(server_id),
                snapshot_id: None,
            },
        )
        .await
    }

    /// Roll the volume back to a snapshot of itself.
    pub async fn restore_from_snapshot(&self, id: &str, snapshot_id: &str) -> Result<TaskRef> {
        self.client
            .api_post(
                CLOUD_SERVER,
                format!("/volumes/{id}/action"),
                &VolumeActionRequest {
                    action: "restore_volume",
                    server_id: None,
                    snapshot_id: Some(snapshot_id),
                },
            )
            .await
    }

    async fn action(&self, id: &str, action: VolumeActionRequest<'_>) -> Result<()> {
        self.client
            .api_post_empty(CLOUD_SERVER, format!("/volumes/{id}/action"), &action)
            .await
    }
}

impl<'a> SnapshotService<'a> {
    /// List snapshots, optionally scoped to one volume.
    pub async fn list(&self, volume_id: Option<&str>) -> Result<Vec<Snapshot>> {
        match volume_id {
            Some(volume_id) => {
                self.client
                    .api_get_query(
                        CLOUD_SERVER,
                        "/snapshots",
                        &[("volume_id", volume_id.to_string())],
                    )
                    .await
            }
            None => self.client.api_get(CLOUD_SERVER, "/snapshots").await,
        }
    }

    /// Fetch one snapshot by id.
    pub async fn get(&self, id: &str) -> Result<Snapshot> {
        self.client
            .api_get(CLOUD_SERVER, format!("/snapshots/{id}"))
            .await
    }

    /// Snapshot a volume. `force` snapshots attached volumes too.
    pub async fn create(&self, name: &str, volume_id: &str, force: bool) -> Result<Snapshot> {
        self.client
            .api_post(
                CLOUD_SERVER,
                "/snapshots",
                &SnapshotCreateRequest {
                    name,
                    volume_id,
                    force,
                },
            )
            .await
    }

    /// Delete a snapshot.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/snapshots/{id}"))
            .await
    }
}
