//! Firewalls
//!
//! Security groups and their rules, served by the `cloud_server` service.

use serde::{Deserialize, Serialize};

use super::CLOUD_SERVER;
use crate::client::Client;
use crate::error::Result;

/// Firewall façade, obtained via [`Client::firewalls`].
pub struct FirewallService<'a> {
    client: &'a Client,
}

impl Client {
    /// Firewall operations.
    pub fn firewalls(&self) -> FirewallService<'_> {
        FirewallService { client: self }
    }
}

/// A firewall (security group).
#[derive(Debug, Clone, Deserialize)]
pub struct Firewall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub inbound: Vec<FirewallRule>,
    #[serde(default)]
    pub outbound: Vec<FirewallRule>,
    #[serde(default)]
    pub servers: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One firewall rule.
#[derive(Debug, Clone, Deserialize)]
pub struct FirewallRule {
    pub id: String,
    #[serde(default)]
    pub direction: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub port_range: Option<String>,
    #[serde(default)]
    pub cidr: Option<String>,
}

/// Rule shape accepted on create/update.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FirewallRuleSpec {
    #[serde(rename = "type")]
    pub rule_type: String,
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
}

/// Parameters for creating or updating a firewall.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FirewallRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inbound: Vec<FirewallRuleSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outbound: Vec<FirewallRuleSpec>,
    /// Servers the firewall applies to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
}

#[derive(Serialize)]
struct ServersRequest<'a> {
    servers: &'a [String],
}

impl<'a> FirewallService<'a> {
    /// List firewalls.
    pub async fn list(&self) -> Result<Vec<Firewall>> {
        self.client.api_get(CLOUD_SERVER, "/firewalls").await
    }

    /// Fetch one firewall by id.
    pub async fn get(&self, id: &str) -> Result<Firewall> {
        self.client
            .api_get(CLOUD_SERVER, format!("/firewalls/{id}"))
            .await
    }

    /// Create a firewall with its initial rule set.
    pub async fn create(&self, request: &FirewallRequest) -> Result<Firewall> {
        self.client
            .api_post(CLOUD_SERVER, "/firewalls", request)
            .await
    }

    /// Replace a firewall's rules and targets.
    pub async fn update(&self, id: &str, request: &FirewallRequest) -> Result<Firewall> {
        self.client
            .api_put(CLOUD_SERVER, format!("/firewalls/{id}"), request)
            .await
    }

    /// Delete a firewall.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/firewalls/{id}"))
            .await
    }

    /// Remove a single rule.
    pub async fn delete_rule(&self, firewall_id: &str, rule_id: &str) -> Result<()> {
        self.client
            .api_delete(
                CLOUD_SERVER,
                format!("/firewalls/{firewall_id}/rules/{rule_id}"),
            )
            .await
    }

    /// Apply the firewall to additional servers.
    pub async fn attach_servers(&self, id: &str, server_ids: &[String]) -> Result<()> {
        self.client
            .api_post_empty(
                CLOUD_SERVER,
                format!("/firewalls/{id}/servers"),
                &ServersRequest {
                    servers: server_ids,
                },
            )
            .await
    }

    /// Remove the firewall from servers.
    pub async fn detach_servers(&self, id: &str, server_ids: &[String]) -> Result<()> {
        self.client
            .api_delete_body(
                CLOUD_SERVER,
                format!("/firewalls/{id}/servers"),
                &ServersRequest {
                    servers: server_ids,
                },
            )
            .await
    }
}
