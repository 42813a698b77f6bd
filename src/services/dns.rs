//! DNS
//!
//! Zones and records served by the `dns` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DNS;
use crate::client::Client;
use crate::error::Result;

/// DNS façade, obtained via [`Client::dns`].
pub struct DnsService<'a> {
    client: &'a Client,
}

impl Client {
    /// DNS zone and record operations.
    pub fn dns(&self) -> DnsService<'_> {
        DnsService { client: self }
    }
}

/// A DNS zone.
#[derive(Debug, Clone, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub nameserver: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A zone with its full record set, returned by [`DnsService::get_zone`].
#[derive(Debug, Clone, Deserialize)]
pub struct ZoneDetail {
    #[serde(flatten)]
    pub zone: Zone,
    #[serde(default)]
    pub record_set: Vec<Record>,
}

/// A DNS record.
#[derive(Debug, Clone, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub ttl: u32,
    /// Record data; shape varies per record type (strings for A/CNAME,
    /// objects for routing policies), so it stays opaque JSON.
    #[serde(default)]
    pub data: Value,
}

#[derive(Serialize)]
struct ZoneCreateRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// Parameters for creating or updating a record.
#[derive(Debug, Clone, Serialize, Default)]
pub struct RecordRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub data: Value,
}

impl<'a> DnsService<'a> {
    /// List zones.
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        #[derive(Deserialize)]
        struct ListResponse {
            zones: Vec<Zone>,
        }
        let response: ListResponse = self.client.api_get(DNS, "/zones").await?;
        Ok(response.zones)
    }

    /// Fetch one zone with its record set.
    pub async fn get_zone(&self, zone_id: &str) -> Result<ZoneDetail> {
        self.client.api_get(DNS, format!("/zones/{zone_id}")).await
    }

    /// Create a zone.
    pub async fn create_zone(&self, name: &str, description: Option<&str>) -> Result<Zone> {
        self.client
            .api_post(DNS, "/zones", &ZoneCreateRequest { name, description })
            .await
    }

    /// Delete a zone and all its records.
    pub async fn delete_zone(&self, zone_id: &str) -> Result<()> {
        self.client.api_delete(DNS, format!("/zones/{zone_id}")).await
    }

    /// Fetch one record by id.
    pub async fn get_record(&self, record_id: &str) -> Result<Record> {
        self.client
            .api_get(DNS, format!("/record/{record_id}"))
            .await
    }

    /// Create a record in a zone.
    pub async fn create_record(&self, zone_id: &str, request: &RecordRequest) -> Result<Record> {
        self.client
            .api_post(DNS, format!("/zones/{zone_id}/record"), request)
            .await
    }

    /// Replace a record's data.
    pub async fn update_record(&self, record_id: &str, request: &RecordRequest) -> Result<Record> {
        self.client
            .api_put(DNS, format!("/record/{record_id}"), request)
            .await
    }

    /// Delete a record.
    pub async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.client
            .api_delete(DNS, format!("/record/{record_id}"))
            .await
    }
}
