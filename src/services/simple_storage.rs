//! Simple storage
//!
//! S3-compatible buckets and access keys, served by the `simple_storage`
//! service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::SIMPLE_STORAGE;
use crate::client::Client;
use crate::error::Result;

/// Simple storage façade, obtained via [`Client::simple_storage`].
pub struct SimpleStorageService<'a> {
    client: &'a Client,
}

impl Client {
    /// Object storage operations.
    pub fn simple_storage(&self) -> SimpleStorageService<'_> {
        SimpleStorageService { client: self }
    }
}

/// A bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub default_storage_class: String,
    #[serde(default)]
    pub num_objects: u64,
    #[serde(default)]
    pub size_kb: u64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Bucket detail with the sub-view requested via option flags.
#[derive(Debug, Clone, Deserialize)]
pub struct BucketDetail {
    #[serde(flatten)]
    pub bucket: Bucket,
    /// Populated when the matching option flag was requested; shapes are
    /// provider-defined.
    #[serde(default)]
    pub versioning: Value,
    #[serde(default)]
    pub cors: Value,
    #[serde(default)]
    pub acl: Value,
    #[serde(default)]
    pub website_config: Value,
}

/// Sub-views of [`SimpleStorageService::get_bucket`], passed as option
/// flags on the query string.
#[derive(Debug, Clone, Copy, Default)]
pub struct BucketOptions {
    pub versioning: bool,
    pub cors: bool,
    pub acl: bool,
    pub website_config: bool,
}

#[derive(Serialize)]
struct BucketCreateRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    acl: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default_storage_class: Option<&'a str>,
}

/// An access key pair for the S3-compatible endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessKey {
    pub access_key: String,
    /// Only present in the create response.
    #[serde(default)]
    pub secret_key: Option<String>,
}

#[derive(Serialize)]
struct AccessKeyCreateRequest<'a> {
    subuser_id: &'a str,
}

impl<'a> SimpleStorageService<'a> {
    /// List buckets.
    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        #[derive(Deserialize)]
        struct ListResponse {
            buckets: Vec<Bucket>,
        }
        let response: ListResponse = self.client.api_get(SIMPLE_STORAGE, "/").await?;
        Ok(response.buckets)
    }

    /// Fetch one bucket, selecting sub-views with option flags.
    pub async fn get_bucket(&self, name: &str, options: BucketOptions) -> Result<BucketDetail> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if options.versioning {
            query.push(("versioning", "true".to_string()));
        }
        if options.cors {
            query.push(("cors", "true".to_string()));
        }
        if options.acl {
            query.push(("acl", "true".to_string()));
        }
        if options.website_config {
            query.push(("website_config", "true".to_string()));
        }
        self.client
            .api_get_query(SIMPLE_STORAGE, format!("/{name}"), &query)
            .await
    }

    /// Create a bucket.
    pub async fn create_bucket(
        &self,
        name: &str,
        location: Option<&str>,
        acl: Option<&str>,
        storage_class: Option<&str>,
    ) -> Result<Bucket> {
        self.client
            .api_post(
                SIMPLE_STORAGE,
                "/",
                &BucketCreateRequest {
                    name,
                    location,
                    acl,
                    default_storage_class: storage_class,
                },
            )
            .await
    }

    /// Delete an empty bucket.
    pub async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.client
            .api_delete(SIMPLE_STORAGE, format!("/{name}"))
            .await
    }

    /// List access keys.
    pub async fn list_access_keys(&self) -> Result<Vec<AccessKey>> {
        #[derive(Deserialize)]
        struct ListResponse {
            access_keys: Vec<AccessKey>,
        }
        let response: ListResponse = self
            .client
            .api_get(SIMPLE_STORAGE, "/access-keys")
            .await?;
        Ok(response.access_keys)
    }

    /// Create an access key pair. The secret is only returned here; store
    /// it.
    pub async fn create_access_key(&self, subuser_id: &str) -> Result<AccessKey> {
        self.client
            .api_post(
                SIMPLE_STORAGE,
                "/access-keys",
                &AccessKeyCreateRequest { subuser_id },
            )
            .await
    }

    /// Revoke an access key.
    pub async fn delete_access_key(&self, access_key: &str) -> Result<()> {
        self.client
            .api_delete(SIMPLE_STORAGE, format!("/access-keys/{access_key}"))
            .await
    }
}
