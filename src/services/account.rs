//! Account
//!
//! Regions, users, and the raw service listing, served by the `account` and
//! `auth` services.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use super::{Page, ACCOUNT, AUTH};
use crate::catalog::ServiceEntry;
use crate::client::Client;
use crate::error::Result;

/// Account façade, obtained via [`Client::account`].
pub struct AccountService<'a> {
    client: &'a Client,
}

impl Client {
    /// Account-level operations.
    pub fn account(&self) -> AccountService<'_> {
        AccountService { client: self }
    }
}

/// A user of the account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub verified_email: bool,
    #[serde(default)]
    pub trial: Value,
}

/// A domain owned by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDomain {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl<'a> AccountService<'a> {
    /// Regions available to the account, keyed by region code.
    ///
    /// Region descriptors are provider-defined and stay opaque JSON.
    pub async fn regions(&self) -> Result<HashMap<String, Value>> {
        self.client.api_get(ACCOUNT, "/regions").await
    }

    /// The calling user's profile.
    pub async fn user(&self) -> Result<User> {
        self.client.api_get(ACCOUNT, "/users").await
    }

    /// Domains of the calling user, one page at a time.
    pub async fn user_domains(&self, page: u32, limit: u32) -> Result<Page<UserDomain>> {
        self.client
            .api_get_query(
                ACCOUNT,
                "/users/domains",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// The raw service listing, unfiltered by region.
    ///
    /// The client maintains its own region-filtered copy internally; this
    /// exposes the provider's full answer.
    pub async fn list_services(&self) -> Result<Vec<ServiceEntry>> {
        #[derive(Deserialize)]
        struct ListResponse {
            services: Vec<ServiceEntry>,
        }
        let response: ListResponse = self.client.api_get(AUTH, "/service").await?;
        Ok(response.services)
    }
}
