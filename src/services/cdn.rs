//! CDN
//!
//! CDN domain management served by the `cdn` service.

use serde::{Deserialize, Serialize};

use super::{Page, CDN};
use crate::client::Client;
use crate::error::Result;

/// CDN façade, obtained via [`Client::cdn`].
pub struct CdnService<'a> {
    client: &'a Client,
}

impl Client {
    /// CDN domain operations.
    pub fn cdn(&self) -> CdnService<'_> {
        CdnService { client: self }
    }
}

/// A CDN domain.
#[derive(Debug, Clone, Deserialize)]
pub struct CdnDomain {
    pub id: String,
    pub domain: String,
    #[serde(default)]
    pub cname: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub origin: Option<Origin>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Origin the CDN pulls from.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Origin {
    pub name: String,
    pub upstream_addrs: String,
    #[serde(default)]
    pub upstream_host: Option<String>,
    #[serde(default)]
    pub upstream_proto: Option<String>,
}

/// Parameters for creating or updating a CDN domain.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CdnDomainRequest {
    pub domain: String,
    pub origin: Origin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_link: Option<u8>,
}

impl<'a> CdnService<'a> {
    /// List CDN domains, one page at a time.
    pub async fn list_domains(&self, page: u32, limit: u32) -> Result<Page<CdnDomain>> {
        self.client
            .api_get_query(
                CDN,
                "/domains",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// Fetch one domain by id.
    pub async fn get_domain(&self, id: &str) -> Result<CdnDomain> {
        #[derive(Deserialize)]
        struct GetResponse {
            domain: CdnDomain,
        }
        let response: GetResponse = self.client.api_get(CDN, format!("/domains/{id}")).await?;
        Ok(response.domain)
    }

    /// Register a domain with the CDN.
    pub async fn create_domain(&self, request: &CdnDomainRequest) -> Result<CdnDomain> {
        #[derive(Deserialize)]
        struct CreateResponse {
            domain: CdnDomain,
        }
        let response: CreateResponse = self.client.api_post(CDN, "/domains", request).await?;
        Ok(response.domain)
    }

    /// Update a domain's origin or options.
    pub async fn update_domain(&self, id: &str, request: &CdnDomainRequest) -> Result<CdnDomain> {
        #[derive(Deserialize)]
        struct UpdateResponse {
            domain: CdnDomain,
        }
        let response: UpdateResponse = self
            .client
            .api_put(CDN, format!("/domains/{id}"), request)
            .await?;
        Ok(response.domain)
    }

    /// Remove a domain from the CDN.
    pub async fn delete_domain(&self, id: &str) -> Result<()> {
        self.client.api_delete(CDN, format!("/domains/{id}")).await
    }
}
