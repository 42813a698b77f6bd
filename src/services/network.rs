//! VPC networking
//!
//! VPC networks, network interfaces, public network interfaces, and
//! internet gateways, all served by the `cloud_server` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Page, CLOUD_SERVER};
use crate::client::Client;
use crate::error::Result;

/// VPC façade, obtained via [`Client::vpcs`].
pub struct VpcService<'a> {
    client: &'a Client,
}

/// Network interface façade, obtained via [`Client::network_interfaces`].
pub struct NetworkInterfaceService<'a> {
    client: &'a Client,
}

/// Internet gateway façade, obtained via [`Client::internet_gateways`].
pub struct InternetGatewayService<'a> {
    client: &'a Client,
}

impl Client {
    /// VPC network operations.
    pub fn vpcs(&self) -> VpcService<'_> {
        VpcService { client: self }
    }

    /// Network interface operations.
    pub fn network_interfaces(&self) -> NetworkInterfaceService<'_> {
        NetworkInterfaceService { client: self }
    }

    /// Internet gateway operations.
    pub fn internet_gateways(&self) -> InternetGatewayService<'_> {
        InternetGatewayService { client: self }
    }
}

/// A VPC network.
#[derive(Debug, Clone, Deserialize)]
pub struct Vpc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub subnets: Vec<Value>,
}

/// Parameters for creating or updating a VPC.
#[derive(Debug, Clone, Serialize, Default)]
pub struct VpcRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
}

/// A (private or public) network interface.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkInterface {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub network_id: String,
    #[serde(default)]
    pub attached_server: Option<String>,
    #[serde(default)]
    pub fixed_ips: Vec<FixedIp>,
    #[serde(default)]
    pub status: String,
    #[serde(rename = "type", default)]
    pub interface_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixedIp {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub subnet_id: String,
}

#[derive(Serialize)]
struct InterfaceCreateRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fixed_ip: Option<&'a str>,
}

#[derive(Serialize)]
struct InterfaceActionRequest<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    server_id: Option<&'a str>,
}

/// An internet gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct InternetGateway {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for creating or updating an internet gateway.
#[derive(Debug, Clone, Serialize, Default)]
pub struct InternetGatewayRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// VPC network the gateway fronts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl<'a> VpcService<'a> {
    /// List VPC networks.
    pub async fn list(&self) -> Result<Vec<Vpc>> {
        self.client.api_get(CLOUD_SERVER, "/vpc-networks").await
    }

    /// Fetch one VPC by id.
    pub async fn get(&self, id: &str) -> Result<Vpc> {
        self.client
            .api_get(CLOUD_SERVER, format!("/vpc-networks/{id}"))
            .await
    }

    /// Create a VPC.
    pub async fn create(&self, request: &VpcRequest) -> Result<Vpc> {
        self.client
            .api_post(CLOUD_SERVER, "/vpc-networks", request)
            .await
    }

    /// Update a VPC.
    pub async fn update(&self, id: &str, request: &VpcRequest) -> Result<Vpc> {
        self.client
            .api_put(CLOUD_SERVER, format!("/vpc-networks/{id}"), request)
            .await
    }

    /// Delete a VPC.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/vpc-networks/{id}"))
            .await
    }
}

impl<'a> NetworkInterfaceService<'a> {
    /// List network interfaces, optionally scoped to one VPC.
    pub async fn list(&self, vpc_id: Option<&str>) -> Result<Vec<NetworkInterface>> {
        match vpc_id {
            Some(vpc_id) => {
                self.client
                    .api_get_query(
                        CLOUD_SERVER,
                        "/network-interfaces",
                        &[("vpc_network_id", vpc_id.to_string())],
                    )
                    .await
            }
            None => {
                self.client
                    .api_get(CLOUD_SERVER, "/network-interfaces")
                    .await
            }
        }
    }

    /// Public network interfaces visible to the project.
    pub async fn list_public(&self) -> Result<Vec<NetworkInterface>> {
        self.client
            .api_get(CLOUD_SERVER, "/public-network-interfaces")
            .await
    }

    /// Fetch one interface by id.
    pub async fn get(&self, id: &str) -> Result<NetworkInterface> {
        self.client
            .api_get(CLOUD_SERVER, format!("/network-interfaces/{id}"))
            .await
    }

    /// Create an interface inside a VPC network.
    pub async fn create(
        &self,
        vpc_id: &str,
        name: Option<&str>,
        fixed_ip: Option<&str>,
    ) -> Result<NetworkInterface> {
        self.client
            .api_post(
                CLOUD_SERVER,
                format!("/vpc-networks/{vpc_id}/network-interfaces"),
                &InterfaceCreateRequest { name, fixed_ip },
            )
            .await
    }

    /// Rename an interface.
    pub async fn update(&self, id: &str, name: &str) -> Result<NetworkInterface> {
        #[derive(Serialize)]
        struct Rename<'a> {
            name: &'a str,
        }
        self.client
            .api_put(
                CLOUD_SERVER,
                format!("/network-interfaces/{id}"),
                &Rename { name },
            )
            .await
    }

    /// Delete an interface.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/network-interfaces/{id}"))
            .await
    }

    /// Attach the interface to a server.
    pub async fn attach_server(&self, id: &str, server_id: &str) -> Result<()> {
        self.client
            .api_post_empty(
                CLOUD_SERVER,
                format!("/network-interfaces/{id}/action"),
                &InterfaceActionRequest {
                    action: "add_server",
                    server_id: Some(server_id),
                },
            )
            .await
    }

    /// Detach the interface from its server.
    pub async fn detach_server(&self, id: &str, server_id: &str) -> Result<()> {
        self.client
            .api_post_empty(
                CLOUD_SERVER,
                format!("/network-interfaces/{id}/action"),
                &InterfaceActionRequest {
                    action: "remove_server",
                    server_id: Some(server_id),
                },
            )
            .await
    }
}

impl<'a> InternetGatewayService<'a> {
    /// List internet gateways, one page at a time.
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page<InternetGateway>> {
        self.client
            .api_get_query(
                CLOUD_SERVER,
                "/internet-gateways",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// Fetch one gateway by id.
    pub async fn get(&self, id: &str) -> Result<InternetGateway> {
        self.client
            .api_get(CLOUD_SERVER, format!("/internet-gateways/{id}"))
            .await
    }

    /// Create a gateway.
    pub async fn create(&self, request: &InternetGatewayRequest) -> Result<InternetGateway> {
        self.client
            .api_post(CLOUD_SERVER, "/internet-gateways", request)
            .await
    }

    /// Update a gateway.
    pub async fn update(&self, id: &str, request: &InternetGatewayRequest) -> Result<InternetGateway> {
        self.client
            .api_put(CLOUD_SERVER, format!("/internet-gateways/{id}"), request)
            .await
    }

    /// Delete a gateway.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/internet-gateways/{id}"))
            .await
    }
}
