//! Load balancing
//!
//! Load balancers with their listeners, pools, members, health monitors,
//! and L7 policies, served by the `load_balancer` service.

use serde::{Deserialize, Serialize};

use super::LOAD_BALANCER;
use crate::client::Client;
use crate::error::Result;

/// Load balancer façade, obtained via [`Client::load_balancers`].
pub struct LoadBalancerService<'a> {
    client: &'a Client,
}

/// Listener façade, obtained via [`Client::listeners`].
pub struct ListenerService<'a> {
    client: &'a Client,
}

/// Pool façade (including member management), obtained via [`Client::pools`].
pub struct PoolService<'a> {
    client: &'a Client,
}

/// Health monitor façade, obtained via [`Client::health_monitors`].
pub struct HealthMonitorService<'a> {
    client: &'a Client,
}

/// L7 policy façade, obtained via [`Client::l7_policies`].
pub struct L7PolicyService<'a> {
    client: &'a Client,
}

impl Client {
    /// Load balancer operations.
    pub fn load_balancers(&self) -> LoadBalancerService<'_> {
        LoadBalancerService { client: self }
    }

    /// Listener operations.
    pub fn listeners(&self) -> ListenerService<'_> {
        ListenerService { client: self }
    }

    /// Pool and member operations.
    pub fn pools(&self) -> PoolService<'_> {
        PoolService { client: self }
    }

    /// Health monitor operations.
    pub fn health_monitors(&self) -> HealthMonitorService<'_> {
        HealthMonitorService { client: self }
    }

    /// L7 policy operations.
    pub fn l7_policies(&self) -> L7PolicyService<'_> {
        L7PolicyService { client: self }
    }
}

/// A load balancer.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provisioning_status: String,
    #[serde(default)]
    pub operating_status: String,
    #[serde(default)]
    pub vip_address: String,
    #[serde(rename = "type", default)]
    pub lb_type: String,
    #[serde(default)]
    pub network_type: String,
    #[serde(default)]
    pub listeners: Vec<IdRef>,
    #[serde(default)]
    pub pools: Vec<IdRef>,
}

/// Reference to a child resource by id.
#[derive(Debug, Clone, Deserialize)]
pub struct IdRef {
    pub id: String,
}

/// Parameters for creating a load balancer.
#[derive(Debug, Clone, Serialize, Default)]
pub struct LoadBalancerCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `small`, `medium`, or `large`.
    #[serde(rename = "type")]
    pub lb_type: String,
    /// `internal` or `external`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_network_id: Option<String>,
}

/// A listener bound to a load balancer port.
#[derive(Debug, Clone, Deserialize)]
pub struct Listener {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub protocol_port: u16,
    #[serde(default)]
    pub default_pool_id: Option<String>,
    #[serde(default)]
    pub operating_status: String,
}

/// Parameters for creating or updating a listener.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ListenerRequest {
    pub name: String,
    /// `HTTP`, `HTTPS`, `TCP`, or `UDP`.
    pub protocol: String,
    pub protocol_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pool_id: Option<String>,
}

/// A backend pool.
#[derive(Debug, Clone, Deserialize)]
pub struct Pool {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub lb_algorithm: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub healthmonitor_id: Option<String>,
    #[serde(default)]
    pub operating_status: String,
}

/// Parameters for creating a pool.
#[derive(Debug, Clone, Serialize, Default)]
pub struct PoolCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub protocol: String,
    /// `ROUND_ROBIN`, `LEAST_CONNECTIONS`, or `SOURCE_IP`.
    pub lb_algorithm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listener_id: Option<String>,
}

/// A pool member (backend endpoint).
#[derive(Debug, Clone, Deserialize)]
pub struct Member {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub address: String,
    pub protocol_port: u16,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub operating_status: String,
}

/// Member shape accepted on create and bulk replace.
#[derive(Debug, Clone, Serialize, Default)]
pub struct MemberSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub address: String,
    pub protocol_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<bool>,
}

/// A health monitor probing one pool.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthMonitor {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub monitor_type: String,
    #[serde(default)]
    pub delay: u32,
    #[serde(default)]
    pub timeout: u32,
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default)]
    pub url_path: Option<String>,
}

/// Parameters for creating a health monitor on a pool.
#[derive(Debug, Clone, Serialize, Default)]
pub struct HealthMonitorRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `TCP`, `HTTP`, or `PING`.
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub delay: u32,
    pub timeout: u32,
    pub max_retries: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_path: Option<String>,
}

/// An L7 routing policy on a listener.
#[derive(Debug, Clone, Deserialize)]
pub struct L7Policy {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub redirect_pool_id: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
}

/// Parameters for creating or updating an L7 policy.
#[derive(Debug, Clone, Serialize, Default)]
pub struct L7PolicyRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `REDIRECT_TO_POOL`, `REDIRECT_TO_URL`, or `REJECT`.
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[derive(Serialize)]
struct BulkMembersRequest<'a> {
    members: &'a [MemberSpec],
}

impl<'a> LoadBalancerService<'a> {
    /// List load balancers.
    pub async fn list(&self) -> Result<Vec<LoadBalancer>> {
        #[derive(Deserialize)]
        struct ListResponse {
            loadbalancers: Vec<LoadBalancer>,
        }
        let response: ListResponse = self.client.api_get(LOAD_BALANCER, "/loadbalancers").await?;
        Ok(response.loadbalancers)
    }

    /// Fetch one load balancer by id.
    pub async fn get(&self, id: &str) -> Result<LoadBalancer> {
        self.client
            .api_get(LOAD_BALANCER, format!("/loadbalancers/{id}"))
            .await
    }

    /// Create a load balancer.
    pub async fn create(&self, request: &LoadBalancerCreateRequest) -> Result<LoadBalancer> {
        self.client
            .api_post(LOAD_BALANCER, "/loadbalancers", request)
            .await
    }

    /// Delete a load balancer. `cascade` deletes its children too.
    pub async fn delete(&self, id: &str, cascade: bool) -> Result<()> {
        #[derive(Serialize)]
        struct DeleteRequest {
            cascade: bool,
        }
        self.client
            .api_delete_body(
                LOAD_BALANCER,
                format!("/loadbalancers/{id}"),
                &DeleteRequest { cascade },
            )
            .await
    }

    /// Listeners of one load balancer.
    pub async fn listeners(&self, id: &str) -> Result<Vec<Listener>> {
        #[derive(Deserialize)]
        struct ListResponse {
            listeners: Vec<Listener>,
        }
        let response: ListResponse = self
            .client
            .api_get(LOAD_BALANCER, format!("/loadbalancers/{id}/listeners"))
            .await?;
        Ok(response.listeners)
    }

    /// Pools of one load balancer.
    pub async fn pools(&self, id: &str) -> Result<Vec<Pool>> {
        #[derive(Deserialize)]
        struct ListResponse {
            pools: Vec<Pool>,
        }
        let response: ListResponse = self
            .client
            .api_get(LOAD_BALANCER, format!("/loadbalancers/{id}/pools"))
            .await?;
        Ok(response.pools)
    }
}

impl<'a> ListenerService<'a> {
    /// Fetch one listener by id.
    pub async fn get(&self, id: &str) -> Result<Listener> {
        self.client
            .api_get(LOAD_BALANCER, format!("/listeners/{id}"))
            .await
    }

    /// Create a listener on a load balancer.
    pub async fn create(
        &self,
        load_balancer_id: &str,
        request: &ListenerRequest,
    ) -> Result<Listener> {
        self.client
            .api_post(
                LOAD_BALANCER,
                format!("/loadbalancers/{load_balancer_id}/listeners"),
                request,
            )
            .await
    }

    /// Update a listener.
    pub async fn update(&self, id: &str, request: &ListenerRequest) -> Result<Listener> {
        self.client
            .api_put(LOAD_BALANCER, format!("/listeners/{id}"), request)
            .await
    }

    /// Delete a listener.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(LOAD_BALANCER, format!("/listeners/{id}"))
            .await
    }
}

impl<'a> PoolService<'a> {
    /// Fetch one pool by id.
    pub async fn get(&self, id: &str) -> Result<Pool> {
        self.client
            .api_get(LOAD_BALANCER, format!("/pool/{id}"))
            .await
    }

    /// Create a pool on a load balancer.
    pub async fn create(&self, load_balancer_id: &str, request: &PoolCreateRequest) -> Result<Pool> {
        self.client
            .api_post(
                LOAD_BALANCER,
                format!("/loadbalancers/{load_balancer_id}/pools"),
                request,
            )
            .await
    }

    /// Delete a pool.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(LOAD_BALANCER, format!("/pool/{id}"))
            .await
    }

    /// Members of a pool.
    pub async fn members(&self, pool_id: &str) -> Result<Vec<Member>> {
        #[derive(Deserialize)]
        struct ListResponse {
            members: Vec<Member>,
        }
        let response: ListResponse = self
            .client
            .api_get(LOAD_BALANCER, format!("/pool/{pool_id}/member"))
            .await?;
        Ok(response.members)
    }

    /// Add one member to a pool.
    pub async fn add_member(&self, pool_id: &str, member: &MemberSpec) -> Result<Member> {
        self.client
            .api_post(LOAD_BALANCER, format!("/pool/{pool_id}/member"), member)
            .await
    }

    /// Replace the entire member set of a pool in one call.
    ///
    /// The provider applies the replacement asynchronously and answers 202
    /// with no body.
    pub async fn replace_members(&self, pool_id: &str, members: &[MemberSpec]) -> Result<()> {
        self.client
            .api_put_empty(
                LOAD_BALANCER,
                format!("/pool/{pool_id}/member"),
                &BulkMembersRequest { members },
            )
            .await
    }

    /// Remove one member from a pool.
    pub async fn delete_member(&self, pool_id: &str, member_id: &str) -> Result<()> {
        self.client
            .api_delete(LOAD_BALANCER, format!("/pool/{pool_id}/member/{member_id}"))
            .await
    }
}

impl<'a> HealthMonitorService<'a> {
    /// Fetch one health monitor by id.
    pub async fn get(&self, id: &str) -> Result<HealthMonitor> {
        self.client
            .api_get(LOAD_BALANCER, format!("/healthmonitors/{id}"))
            .await
    }

    /// Create a health monitor probing the given pool.
    pub async fn create(&self, pool_id: &str, request: &HealthMonitorRequest) -> Result<HealthMonitor> {
        self.client
            .api_post(
                LOAD_BALANCER,
                format!("/pool/{pool_id}/healthmonitor"),
                request,
            )
            .await
    }

    /// Delete a health monitor.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(LOAD_BALANCER, format!("/healthmonitors/{id}"))
            .await
    }
}

impl<'a> L7PolicyService<'a> {
    /// L7 policies of a listener.
    pub async fn list(&self, listener_id: &str) -> Result<Vec<L7Policy>> {
        #[derive(Deserialize)]
        struct ListResponse {
            l7policies: Vec<L7Policy>,
        }
        let response: ListResponse = self
            .client
            .api_get(LOAD_BALANCER, format!("/listeners/{listener_id}/l7policies"))
            .await?;
        Ok(response.l7policies)
    }

    /// Fetch one policy by id.
    pub async fn get(&self, id: &str) -> Result<L7Policy> {
        self.client
            .api_get(LOAD_BALANCER, format!("/l7policies/{id}"))
            .await
    }

    /// Create a policy on a listener.
    pub async fn create(&self, listener_id: &str, request: &L7PolicyRequest) -> Result<L7Policy> {
        self.client
            .api_post(
                LOAD_BALANCER,
                format!("/listeners/{listener_id}/l7policies"),
                request,
            )
            .await
    }

    /// Update a policy.
    pub async fn update(&self, id: &str, request: &L7PolicyRequest) -> Result<L7Policy> {
        self.client
            .api_put(LOAD_BALANCER, format!("/l7policies/{id}"), request)
            .await
    }

    /// Delete a policy.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(LOAD_BALANCER, format!("/l7policies/{id}"))
            .await
    }
}
