//! Alerting
//!
//! Alarms, receivers, alert histories, and monitoring agents, served by the
//! `cloudwatcher` service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Page, CLOUDWATCHER};
use crate::client::Client;
use crate::error::Result;

/// Alerting façade, obtained via [`Client::alerts`].
pub struct AlertService<'a> {
    client: &'a Client,
}

impl Client {
    /// Alerting operations.
    pub fn alerts(&self) -> AlertService<'_> {
        AlertService { client: self }
    }
}

/// An alarm watching a metric or availability condition.
#[derive(Debug, Clone, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub alert_interval: u32,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub receivers: Vec<String>,
    /// Condition payload; shape varies per resource type.
    #[serde(default)]
    pub comparison: Value,
}

/// Parameters for creating or updating an alarm.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AlarmRequest {
    pub name: String,
    pub enable: bool,
    pub alert_interval: u32,
    pub resource_type: String,
    pub receivers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// A notification receiver (email, webhook, Telegram, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct Receiver {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
    #[serde(default)]
    pub verified_email_address: bool,
}

/// Parameters for creating or updating a receiver.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ReceiverRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<String>,
}

/// One fired-alert record.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertHistory {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub measurement: Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// A monitoring agent installed on a server.
#[derive(Debug, Clone, Deserialize)]
pub struct Agent {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub runtime: String,
}

impl<'a> AlertService<'a> {
    // Alarms

    /// List alarms.
    pub async fn list_alarms(&self) -> Result<Vec<Alarm>> {
        #[derive(Deserialize)]
        struct ListResponse {
            alarms: Vec<Alarm>,
        }
        let response: ListResponse = self.client.api_get(CLOUDWATCHER, "/alarms").await?;
        Ok(response.alarms)
    }

    /// Fetch one alarm by id.
    pub async fn get_alarm(&self, id: &str) -> Result<Alarm> {
        self.client
            .api_get(CLOUDWATCHER, format!("/alarms/{id}"))
            .await
    }

    /// Create an alarm.
    pub async fn create_alarm(&self, request: &AlarmRequest) -> Result<Alarm> {
        self.client.api_post(CLOUDWATCHER, "/alarms", request).await
    }

    /// Update an alarm.
    pub async fn update_alarm(&self, id: &str, request: &AlarmRequest) -> Result<Alarm> {
        self.client
            .api_put(CLOUDWATCHER, format!("/alarms/{id}"), request)
            .await
    }

    /// Delete an alarm.
    pub async fn delete_alarm(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUDWATCHER, format!("/alarms/{id}"))
            .await
    }

    // Receivers

    /// List receivers.
    pub async fn list_receivers(&self) -> Result<Vec<Receiver>> {
        #[derive(Deserialize)]
        struct ListResponse {
            receivers: Vec<Receiver>,
        }
        let response: ListResponse = self.client.api_get(CLOUDWATCHER, "/receivers").await?;
        Ok(response.receivers)
    }

    /// Fetch one receiver by id.
    pub async fn get_receiver(&self, id: &str) -> Result<Receiver> {
        self.client
            .api_get(CLOUDWATCHER, format!("/receivers/{id}"))
            .await
    }

    /// Create a receiver.
    pub async fn create_receiver(&self, request: &ReceiverRequest) -> Result<Receiver> {
        self.client
            .api_post(CLOUDWATCHER, "/receivers", request)
            .await
    }

    /// Update a receiver.
    pub async fn update_receiver(&self, id: &str, request: &ReceiverRequest) -> Result<Receiver> {
        self.client
            .api_put(CLOUDWATCHER, format!("/receivers/{id}"), request)
            .await
    }

    /// Delete a receiver.
    pub async fn delete_receiver(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUDWATCHER, format!("/receivers/{id}"))
            .await
    }

    /// Re-send the verification message for an email receiver.
    pub async fn resend_verification(&self, receiver_id: &str) -> Result<()> {
        let request = self.client.new_request::<()>(
            reqwest::Method::GET,
            CLOUDWATCHER,
            format!("/receivers/{receiver_id}/verification"),
            None,
        )?;
        self.client.send_empty(&request).await
    }

    // Histories and agents

    /// Fired-alert history, one page at a time.
    pub async fn histories(&self, page: u32, limit: u32) -> Result<Page<AlertHistory>> {
        self.client
            .api_get_query(
                CLOUDWATCHER,
                "/histories",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// List monitoring agents.
    pub async fn list_agents(&self) -> Result<Vec<Agent>> {
        #[derive(Deserialize)]
        struct ListResponse {
            agents: Vec<Agent>,
        }
        let response: ListResponse = self.client.api_get(CLOUDWATCHER, "/agents").await?;
        Ok(response.agents)
    }

    /// Fetch one agent by id.
    pub async fn get_agent(&self, id: &str) -> Result<Agent> {
        self.client
            .api_get(CLOUDWATCHER, format!("/agents/{id}"))
            .await
    }

    /// Delete an agent registration.
    pub async fn delete_agent(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(CLOUDWATCHER, format!("/agents/{id}"))
            .await
    }
}
