//! Backup
//!
//! Machine-level backup: registered machines, backup directories, and
//! backup policies, served by the `backup` service.

use serde::{Deserialize, Serialize};

use super::BACKUP;
use crate::client::Client;
use crate::error::Result;

/// Backup façade, obtained via [`Client::backup`].
pub struct BackupService<'a> {
    client: &'a Client,
}

impl Client {
    /// Machine backup operations.
    pub fn backup(&self) -> BackupService<'_> {
        BackupService { client: self }
    }
}

/// A machine registered with the backup agent.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupMachine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default)]
    pub agent_version: String,
    #[serde(default)]
    pub status: String,
}

/// A directory backed up on a machine.
#[derive(Debug, Clone, Deserialize)]
pub struct BackupDirectory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub machine_id: String,
    #[serde(default)]
    pub activated: bool,
}

/// A backup policy (schedule plus retention).
#[derive(Debug, Clone, Deserialize)]
pub struct BackupPolicy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub schedule_pattern: String,
    #[serde(default)]
    pub retention_days: u32,
    #[serde(default)]
    pub retentions: u32,
}

/// Parameters for creating or updating a policy.
#[derive(Debug, Clone, Serialize, Default)]
pub struct BackupPolicyRequest {
    pub name: String,
    /// Crontab-style schedule understood by the provider.
    pub schedule_pattern: String,
    pub retention_days: u32,
}

#[derive(Serialize)]
struct ApplyPolicyRequest<'a> {
    directory_ids: &'a [String],
}

impl<'a> BackupService<'a> {
    /// List registered machines.
    pub async fn list_machines(&self) -> Result<Vec<BackupMachine>> {
        self.client.api_get(BACKUP, "/machines").await
    }

    /// Fetch one machine by id.
    pub async fn get_machine(&self, id: &str) -> Result<BackupMachine> {
        self.client.api_get(BACKUP, format!("/machines/{id}")).await
    }

    /// Unregister a machine.
    pub async fn delete_machine(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(BACKUP, format!("/machines/{id}"))
            .await
    }

    /// Backed-up directories of a machine.
    pub async fn list_directories(&self, machine_id: &str) -> Result<Vec<BackupDirectory>> {
        self.client
            .api_get(BACKUP, format!("/machines/{machine_id}/directories"))
            .await
    }

    /// Fetch one directory by id.
    pub async fn get_directory(&self, machine_id: &str, id: &str) -> Result<BackupDirectory> {
        self.client
            .api_get(BACKUP, format!("/machines/{machine_id}/directories/{id}"))
            .await
    }

    /// Stop backing a directory up.
    pub async fn delete_directory(&self, machine_id: &str, id: &str) -> Result<()> {
        self.client
            .api_delete(BACKUP, format!("/machines/{machine_id}/directories/{id}"))
            .await
    }

    /// List policies.
    pub async fn list_policies(&self) -> Result<Vec<BackupPolicy>> {
        self.client.api_get(BACKUP, "/policies").await
    }

    /// Create a policy.
    pub async fn create_policy(&self, request: &BackupPolicyRequest) -> Result<BackupPolicy> {
        self.client.api_post(BACKUP, "/policies", request).await
    }

    /// Update a policy.
    pub async fn update_policy(&self, id: &str, request: &BackupPolicyRequest) -> Result<BackupPolicy> {
        self.client
            .api_patch(BACKUP, format!("/policies/{id}"), request)
            .await
    }

    /// Delete a policy.
    pub async fn delete_policy(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(BACKUP, format!("/policies/{id}"))
            .await
    }

    /// Apply a policy to directories.
    pub async fn apply_policy(&self, policy_id: &str, directory_ids: &[String]) -> Result<()> {
        self.client
            .api_post_empty(
                BACKUP,
                format!("/policies/{policy_id}/action"),
                &ApplyPolicyRequest { directory_ids },
            )
            .await
    }
}
