//! Resource façades
//!
//! One thin typed wrapper per provider service. Every façade borrows the
//! [`Client`](crate::client::Client), builds a path, and delegates to the
//! request engine; façades hold no state of their own and never swallow
//! errors.
//!
//! Service names are the string keys used to look endpoints up in the
//! service catalog. They stay plain strings so the catalog remains open to
//! provider-side additions.

use serde::Deserialize;

pub mod account;
pub mod alert;
pub mod autoscaling;
pub mod backup;
pub mod cdn;
pub mod container_registry;
pub mod database;
pub mod dns;
pub mod firewall;
pub mod iam;
pub mod kafka;
pub mod kms;
pub mod kubernetes;
pub mod load_balancer;
pub mod network;
pub mod server;
pub mod simple_storage;
pub mod ssh_key;
pub mod volume;

pub(crate) const CLOUD_SERVER: &str = "cloud_server";
pub(crate) const LOAD_BALANCER: &str = "load_balancer";
pub(crate) const DNS: &str = "dns";
pub(crate) const KUBERNETES: &str = "kubernetes";
pub(crate) const CLOUDWATCHER: &str = "cloudwatcher";
pub(crate) const AUTO_SCALING: &str = "auto_scaling";
pub(crate) const CDN: &str = "cdn";
pub(crate) const KAFKA: &str = "kafka";
pub(crate) const AUTH: &str = "auth";
pub(crate) const IAM: &str = "iam";
pub(crate) const KMS: &str = "kms";
pub(crate) const CONTAINER_REGISTRY: &str = "container_registry";
pub(crate) const SIMPLE_STORAGE: &str = "simple_storage";
pub(crate) const DATABASE: &str = "database";
pub(crate) const BACKUP: &str = "backup";
pub(crate) const ACCOUNT: &str = "account";

/// Pagination envelope used by the provider's paginated listings.
///
/// The engine does not interpret pagination; façades forward `page`/`limit`
/// as ordinary query parameters and callers walk pages themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total: u64,
    /// Query string of the following page, when one exists.
    #[serde(default)]
    pub next: Option<String>,
}

/// Response shape of operations the provider runs asynchronously.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskRef {
    pub task_id: String,
}
