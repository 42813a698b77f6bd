//! IAM
//!
//! Project listing under the `iam` service.

use serde::Deserialize;

use super::IAM;
use crate::client::Client;
use crate::error::Result;

/// IAM façade, obtained via [`Client::iam`].
pub struct IamService<'a> {
    client: &'a Client,
}

impl Client {
    /// IAM operations.
    pub fn iam(&self) -> IamService<'_> {
        IamService { client: self }
    }
}

/// A project (tenant) the caller can act in.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub uuid: String,
    #[serde(default)]
    pub alias_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub origin_name: String,
}

impl<'a> IamService<'a> {
    /// List projects visible to the caller.
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        #[derive(Deserialize)]
        struct ListResponse {
            projects: Vec<Project>,
        }
        let response: ListResponse = self.client.api_get(IAM, "/projects").await?;
        Ok(response.projects)
    }

    /// Fetch one project by uuid.
    pub async fn get_project(&self, uuid: &str) -> Result<Project> {
        self.client.api_get(IAM, format!("/projects/{uuid}")).await
    }
}
