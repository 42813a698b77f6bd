//! Autoscaling
//!
//! Autoscaling groups, launch configurations, webhooks, policies, nodes,
//! events, schedules, and quota status, served by the `auto_scaling`
//! service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Page, AUTO_SCALING};
use crate::client::Client;
use crate::error::Result;

/// Autoscaling façade, obtained via [`Client::autoscaling`].
pub struct AutoscalingService<'a> {
    client: &'a Client,
}

impl Client {
    /// Autoscaling operations.
    pub fn autoscaling(&self) -> AutoscalingService<'_> {
        AutoscalingService { client: self }
    }
}

/// An autoscaling group.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscalingGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub desired_capacity: u32,
    #[serde(default)]
    pub min_size: u32,
    #[serde(default)]
    pub max_size: u32,
    #[serde(default)]
    pub launch_configuration_id: String,
    #[serde(default)]
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for creating or updating a group.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AutoscalingGroupRequest {
    pub name: String,
    pub launch_configuration_id: String,
    pub desired_capacity: u32,
    pub min_size: u32,
    pub max_size: u32,
}

/// A launch configuration describing the servers a group boots.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchConfiguration {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flavor: String,
    #[serde(default)]
    pub os: Value,
    #[serde(default)]
    pub rootdisk: Value,
    #[serde(default)]
    pub availability_zone: String,
    #[serde(default)]
    pub ssh_key: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
}

/// A webhook endpoint that triggers a scaling policy.
#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    #[serde(default)]
    pub agent_type: String,
    #[serde(default)]
    pub url: String,
}

/// A scaling policy attached to a group.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalingPolicy {
    pub id: String,
    #[serde(default)]
    pub best_effort: bool,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub metric_type: String,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default)]
    pub scale_size: u32,
}

/// Parameters for creating or updating a policy.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ScalingPolicyRequest {
    /// `CLUSTER_SCALE_IN` or `CLUSTER_SCALE_OUT`.
    pub event: String,
    pub metric_type: String,
    pub threshold: f64,
    pub scale_size: u32,
    pub cooldown: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_effort: Option<bool>,
}

/// A node managed by a group.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscalingNode {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub physical_id: String,
    #[serde(default)]
    pub addresses: Value,
}

/// One scaling event in a group's history.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscalingEvent {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub status_reason: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A cron-style scaling schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscalingSchedule {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub valid_from: Option<String>,
    #[serde(default)]
    pub valid_to: Option<String>,
    #[serde(default)]
    pub inputs: Value,
}

/// Parameters for creating a schedule.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AutoscalingScheduleRequest {
    pub name: String,
    /// Sizing inputs keyed by cron expression; provider-defined shape.
    pub inputs: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
}

/// Account-level autoscaling status and quotas.
#[derive(Debug, Clone, Deserialize)]
pub struct AutoscalingQuotas {
    #[serde(default)]
    pub availability: Value,
    #[serde(default)]
    pub limits: Value,
    #[serde(default)]
    pub valid_flavors: Vec<String>,
}

impl<'a> AutoscalingService<'a> {
    // Groups

    /// List groups.
    pub async fn list_groups(&self) -> Result<Vec<AutoscalingGroup>> {
        #[derive(Deserialize)]
        struct ListResponse {
            clusters: Vec<AutoscalingGroup>,
        }
        let response: ListResponse = self.client.api_get(AUTO_SCALING, "/groups").await?;
        Ok(response.clusters)
    }

    /// Fetch one group by id.
    pub async fn get_group(&self, id: &str) -> Result<AutoscalingGroup> {
        self.client
            .api_get(AUTO_SCALING, format!("/groups/{id}"))
            .await
    }

    /// Create a group.
    pub async fn create_group(&self, request: &AutoscalingGroupRequest) -> Result<AutoscalingGroup> {
        self.client.api_post(AUTO_SCALING, "/groups", request).await
    }

    /// Update a group's bounds or launch configuration.
    pub async fn update_group(
        &self,
        id: &str,
        request: &AutoscalingGroupRequest,
    ) -> Result<AutoscalingGroup> {
        self.client
            .api_put(AUTO_SCALING, format!("/groups/{id}"), request)
            .await
    }

    /// Delete a group and its nodes.
    pub async fn delete_group(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(AUTO_SCALING, format!("/groups/{id}"))
            .await
    }

    // Launch configurations

    /// List launch configurations.
    pub async fn list_launch_configurations(&self) -> Result<Vec<LaunchConfiguration>> {
        #[derive(Deserialize)]
        struct ListResponse {
            profiles: Vec<LaunchConfiguration>,
        }
        let response: ListResponse = self
            .client
            .api_get(AUTO_SCALING, "/launch_configs")
            .await?;
        Ok(response.profiles)
    }

    /// Fetch one launch configuration.
    pub async fn get_launch_configuration(&self, id: &str) -> Result<LaunchConfiguration> {
        self.client
            .api_get(AUTO_SCALING, format!("/launch_configs/{id}"))
            .await
    }

    /// Delete a launch configuration.
    pub async fn delete_launch_configuration(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(AUTO_SCALING, format!("/launch_configs/{id}"))
            .await
    }

    // Webhooks and policies

    /// Webhook trigger URLs of a group.
    pub async fn list_webhooks(&self, group_id: &str) -> Result<Vec<Webhook>> {
        self.client
            .api_get(AUTO_SCALING, format!("/groups/{group_id}/webhooks"))
            .await
    }

    /// Scaling policies of a group.
    pub async fn list_policies(&self, group_id: &str) -> Result<Vec<ScalingPolicy>> {
        #[derive(Deserialize)]
        struct ListResponse {
            policies: Vec<ScalingPolicy>,
        }
        let response: ListResponse = self
            .client
            .api_get(AUTO_SCALING, format!("/groups/{group_id}/policies"))
            .await?;
        Ok(response.policies)
    }

    /// Add a policy to a group.
    pub async fn create_policy(
        &self,
        group_id: &str,
        request: &ScalingPolicyRequest,
    ) -> Result<ScalingPolicy> {
        self.client
            .api_post(AUTO_SCALING, format!("/groups/{group_id}/policies"), request)
            .await
    }

    /// Update a policy.
    pub async fn update_policy(
        &self,
        group_id: &str,
        policy_id: &str,
        request: &ScalingPolicyRequest,
    ) -> Result<ScalingPolicy> {
        self.client
            .api_put(
                AUTO_SCALING,
                format!("/groups/{group_id}/policies/{policy_id}"),
                request,
            )
            .await
    }

    /// Remove a policy from a group.
    pub async fn delete_policy(&self, group_id: &str, policy_id: &str) -> Result<()> {
        self.client
            .api_delete(
                AUTO_SCALING,
                format!("/groups/{group_id}/policies/{policy_id}"),
            )
            .await
    }

    // Nodes, events, schedules

    /// Nodes of a group.
    pub async fn list_nodes(&self, group_id: &str) -> Result<Vec<AutoscalingNode>> {
        #[derive(Deserialize)]
        struct ListResponse {
            nodes: Vec<AutoscalingNode>,
        }
        let response: ListResponse = self
            .client
            .api_get(AUTO_SCALING, format!("/groups/{group_id}/nodes"))
            .await?;
        Ok(response.nodes)
    }

    /// Scaling event history of a group, one page at a time.
    pub async fn list_events(
        &self,
        group_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Page<AutoscalingEvent>> {
        self.client
            .api_get_query(
                AUTO_SCALING,
                format!("/groups/{group_id}/events"),
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// Cron schedules of a group.
    pub async fn list_schedules(&self, group_id: &str) -> Result<Vec<AutoscalingSchedule>> {
        #[derive(Deserialize)]
        struct ListResponse {
            cron_triggers: Vec<AutoscalingSchedule>,
        }
        let response: ListResponse = self
            .client
            .api_get(AUTO_SCALING, format!("/groups/{group_id}/cron_triggers"))
            .await?;
        Ok(response.cron_triggers)
    }

    /// Add a schedule to a group.
    pub async fn create_schedule(
        &self,
        group_id: &str,
        request: &AutoscalingScheduleRequest,
    ) -> Result<AutoscalingSchedule> {
        self.client
            .api_post(
                AUTO_SCALING,
                format!("/groups/{group_id}/cron_triggers"),
                request,
            )
            .await
    }

    /// Remove a schedule.
    pub async fn delete_schedule(&self, group_id: &str, schedule_id: &str) -> Result<()> {
        self.client
            .api_delete(
                AUTO_SCALING,
                format!("/groups/{group_id}/cron_triggers/{schedule_id}"),
            )
            .await
    }

    /// Account-level quotas, availability, and usable flavors.
    pub async fn quotas(&self) -> Result<AutoscalingQuotas> {
        self.client.api_get(AUTO_SCALING, "/common/status").await
    }
}
