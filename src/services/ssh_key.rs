//! SSH keys
//!
//! Keypair management under the `cloud_server` service.

use serde::{Deserialize, Serialize};

use super::{Page, CLOUD_SERVER};
use crate::client::Client;
use crate::error::Result;

/// SSH key façade, obtained via [`Client::ssh_keys`].
pub struct SshKeyService<'a> {
    client: &'a Client,
}

impl Client {
    /// SSH keypair operations.
    pub fn ssh_keys(&self) -> SshKeyService<'_> {
        SshKeyService { client: self }
    }
}

/// A registered SSH public key.
#[derive(Debug, Clone, Deserialize)]
pub struct SshKey {
    pub name: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default)]
    pub fingerprint: String,
}

#[derive(Serialize)]
struct SshKeyCreateRequest<'a> {
    name: &'a str,
    public_key: &'a str,
}

impl<'a> SshKeyService<'a> {
    /// List registered keys, one page at a time.
    pub async fn list(&self, page: u32, limit: u32) -> Result<Page<SshKey>> {
        self.client
            .api_get_query(
                CLOUD_SERVER,
                "/keypairs",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await
    }

    /// Register a public key under a name.
    pub async fn create(&self, name: &str, public_key: &str) -> Result<SshKey> {
        self.client
            .api_post(
                CLOUD_SERVER,
                "/keypairs",
                &SshKeyCreateRequest { name, public_key },
            )
            .await
    }

    /// Remove a key by name.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .api_delete(CLOUD_SERVER, format!("/keypairs/{name}"))
            .await
    }
}
