//! Rust SDK for the BizFly Cloud REST API
//!
//! This crate provides typed access to the provider's multi-service API:
//! compute, block storage, networking, load balancing, DNS, CDN, Kubernetes
//! engine, managed databases, Kafka, alerting, autoscaling, backup, object
//! storage, container registry, IAM, and key management.
//!
//! # Module Structure
//!
//! - [`client`] - Client construction and shared state
//! - [`auth`] - Credentials and the token manager
//! - [`catalog`] - Per-region service endpoint catalog
//! - [`error`] - The error taxonomy
//! - [`services`] - One typed façade per provider service
//!
//! # Example
//!
//! ```ignore
//! use bizfly::{Client, Credential};
//!
//! async fn example() -> bizfly::Result<()> {
//!     let client = Client::builder()
//!         .region("HN")
//!         .project_id("my-project")
//!         .build()?;
//!
//!     client
//!         .token()
//!         .init(Credential::AppCredential {
//!             id: "credential-id".to_string(),
//!             secret: "credential-secret".to_string(),
//!         })
//!         .await?;
//!
//!     for server in client.servers().list(None).await? {
//!         println!("{} {}", server.id, server.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! A `Client` is cheap to clone and safe to share across tasks; the token
//! and endpoint catalog are refreshed behind the scenes when the provider
//! reports an expired token.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
mod http;
pub mod services;

pub use auth::{Credential, TokenService};
pub use catalog::ServiceEntry;
pub use client::{Client, ClientBuilder, DEFAULT_API_URL, DEFAULT_REGION};
pub use error::{Error, Result};
pub use services::Page;
