//! Key management
//!
//! TLS certificates and secrets, served by the `kms` service.

use serde::{Deserialize, Serialize};

use super::KMS;
use crate::client::Client;
use crate::error::Result;

/// KMS façade, obtained via [`Client::kms`].
pub struct KmsService<'a> {
    client: &'a Client,
}

impl Client {
    /// Key management operations.
    pub fn kms(&self) -> KmsService<'_> {
        KmsService { client: self }
    }
}

/// A stored TLS certificate.
#[derive(Debug, Clone, Deserialize)]
pub struct Certificate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub container_id: String,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Parameters for importing a certificate.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CertificateImportRequest {
    pub name: String,
    /// PEM-encoded certificate chain.
    pub certificate: String,
    /// PEM-encoded private key.
    pub private_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
}

/// A stored secret.
#[derive(Debug, Clone, Deserialize)]
pub struct Secret {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub secret_type: String,
    #[serde(default)]
    pub expiration: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Serialize)]
struct SecretCreateRequest<'a> {
    name: &'a str,
    payload: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    expiration: Option<&'a str>,
}

impl<'a> KmsService<'a> {
    /// List certificates.
    pub async fn list_certificates(&self) -> Result<Vec<Certificate>> {
        #[derive(Deserialize)]
        struct ListResponse {
            certificates: Vec<Certificate>,
        }
        let response: ListResponse = self.client.api_get(KMS, "/certificates").await?;
        Ok(response.certificates)
    }

    /// Fetch one certificate by id.
    pub async fn get_certificate(&self, id: &str) -> Result<Certificate> {
        self.client
            .api_get(KMS, format!("/certificates/{id}"))
            .await
    }

    /// Import a certificate.
    pub async fn import_certificate(
        &self,
        request: &CertificateImportRequest,
    ) -> Result<Certificate> {
        self.client.api_post(KMS, "/certificates", request).await
    }

    /// Delete a certificate.
    pub async fn delete_certificate(&self, id: &str) -> Result<()> {
        self.client
            .api_delete(KMS, format!("/certificates/{id}"))
            .await
    }

    /// List secrets.
    pub async fn list_secrets(&self) -> Result<Vec<Secret>> {
        #[derive(Deserialize)]
        struct ListResponse {
            secrets: Vec<Secret>,
        }
        let response: ListResponse = self.client.api_get(KMS, "/secrets").await?;
        Ok(response.secrets)
    }

    /// Fetch one secret's metadata by id.
    pub async fn get_secret(&self, id: &str) -> Result<Secret> {
        self.client.api_get(KMS, format!("/secrets/{id}")).await
    }

    /// Store a secret.
    pub async fn create_secret(
        &self,
        name: &str,
        payload: &str,
        expiration: Option<&str>,
    ) -> Result<Secret> {
        self.client
            .api_post(
                KMS,
                "/secrets",
                &SecretCreateRequest {
                    name,
                    payload,
                    expiration,
                },
            )
            .await
    }

    /// Delete a secret.
    pub async fn delete_secret(&self, id: &str) -> Result<()> {
        self.client.api_delete(KMS, format!("/secrets/{id}")).await
    }
}
