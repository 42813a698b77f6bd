//! Container registry
//!
//! Image repositories and tags, served by the `container_registry` service.

use serde::{Deserialize, Serialize};

use super::CONTAINER_REGISTRY;
use crate::client::Client;
use crate::error::Result;

/// Container registry façade, obtained via [`Client::container_registry`].
pub struct ContainerRegistryService<'a> {
    client: &'a Client,
}

impl Client {
    /// Container registry operations.
    pub fn container_registry(&self) -> ContainerRegistryService<'_> {
        ContainerRegistryService { client: self }
    }
}

/// An image repository.
#[derive(Debug, Clone, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub pulls: u64,
    #[serde(default)]
    pub last_push: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// One tag of a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryTag {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub scan_status: String,
    #[serde(default)]
    pub vulnerabilities: u32,
}

/// Tag detail with its repository context.
#[derive(Debug, Clone, Deserialize)]
pub struct TagDetail {
    pub repository: Repository,
    pub tag: RepositoryTag,
}

#[derive(Serialize)]
struct RepositoryCreateRequest<'a> {
    name: &'a str,
    public: bool,
}

#[derive(Serialize)]
struct UserEditRequest<'a> {
    new_password: &'a str,
}

impl<'a> ContainerRegistryService<'a> {
    /// List repositories.
    pub async fn list(&self) -> Result<Vec<Repository>> {
        #[derive(Deserialize)]
        struct ListResponse {
            repositories: Vec<Repository>,
        }
        let response: ListResponse = self
            .client
            .api_get(CONTAINER_REGISTRY, "/_catalog")
            .await?;
        Ok(response.repositories)
    }

    /// Create a repository.
    pub async fn create(&self, name: &str, public: bool) -> Result<()> {
        self.client
            .api_post_empty(
                CONTAINER_REGISTRY,
                "/_catalog",
                &RepositoryCreateRequest { name, public },
            )
            .await
    }

    /// Delete a repository and all its tags.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.client
            .api_delete(CONTAINER_REGISTRY, format!("/_catalog/{name}"))
            .await
    }

    /// Tags of a repository.
    pub async fn list_tags(&self, repository: &str) -> Result<Vec<RepositoryTag>> {
        #[derive(Deserialize)]
        struct ListResponse {
            tags: Vec<RepositoryTag>,
        }
        let response: ListResponse = self
            .client
            .api_get(CONTAINER_REGISTRY, format!("/_catalog/{repository}/tag"))
            .await?;
        Ok(response.tags)
    }

    /// Fetch one tag with its vulnerability scan results.
    pub async fn get_tag(&self, repository: &str, tag: &str) -> Result<TagDetail> {
        self.client
            .api_get(
                CONTAINER_REGISTRY,
                format!("/_catalog/{repository}/tag/{tag}"),
            )
            .await
    }

    /// Delete one tag.
    pub async fn delete_tag(&self, repository: &str, tag: &str) -> Result<()> {
        self.client
            .api_delete(
                CONTAINER_REGISTRY,
                format!("/_catalog/{repository}/tag/{tag}"),
            )
            .await
    }

    /// Reset the registry user's password.
    pub async fn edit_user(&self, new_password: &str) -> Result<()> {
        self.client
            .api_put_empty(
                CONTAINER_REGISTRY,
                "/users",
                &UserEditRequest { new_password },
            )
            .await
    }
}
