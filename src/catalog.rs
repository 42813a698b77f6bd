//! Service catalog
//!
//! The provider publishes a catalog of per-region service endpoints. After
//! authentication the catalog is fetched, filtered down to the configured
//! region, and indexed by canonical service name. Every request resolves its
//! absolute URL through this mapping.

use std::collections::HashMap;

use serde::Deserialize;

use crate::auth::Credential;
use crate::error::{Error, Result};

/// Path of the catalog endpoint, relative to the API gateway.
pub(crate) const SERVICE_CATALOG_PATH: &str = "/api/auth/service";

/// One row of the provider's service catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceEntry {
    /// Canonical service name, the key used for endpoint lookup
    /// (e.g. `cloud_server`, `load_balancer`).
    pub canonical_name: String,
    /// Short service code shown in the provider's dashboard.
    #[serde(default)]
    pub code: String,
    /// Region this endpoint serves.
    pub region: String,
    /// Absolute base URL for the service in this region.
    pub service_url: String,
    /// Disabled rows are dropped during indexing.
    #[serde(default)]
    pub enabled: bool,
}

/// Mapping from canonical service name to its endpoint row.
pub(crate) type ServiceCatalog = HashMap<String, ServiceEntry>;

#[derive(Debug, Deserialize)]
struct CatalogResponse {
    services: Vec<ServiceEntry>,
}

/// Fetch the service catalog from the API gateway.
///
/// An application credential, when available, is attached as Basic auth per
/// the provider's contract. The returned map is not yet published; the
/// caller stores it atomically together with the token.
pub(crate) async fn fetch_catalog(
    http: &reqwest::Client,
    api_url: &str,
    region: &str,
    credential: Option<&Credential>,
) -> Result<ServiceCatalog> {
    let url = join_url(api_url, SERVICE_CATALOG_PATH);
    tracing::debug!("GET {}", url);

    let mut request = http.get(&url);
    if let Some(Credential::AppCredential { id, secret }) = credential {
        request = request.basic_auth(id, Some(secret));
    }

    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(Error::from_response(status.as_u16(), None, body));
    }

    let decoded: CatalogResponse = serde_json::from_str(&body)?;
    Ok(build_catalog(decoded.services, region))
}

/// Index catalog rows by canonical name.
///
/// Only enabled rows in the configured region are kept. Duplicate canonical
/// names are last-write-wins; the provider guarantees canonical-name+region
/// uniqueness, so this only matters for malformed catalogs.
pub(crate) fn build_catalog(entries: Vec<ServiceEntry>, region: &str) -> ServiceCatalog {
    let mut catalog = ServiceCatalog::new();
    for entry in entries {
        if entry.enabled && entry.region == region {
            catalog.insert(entry.canonical_name.clone(), entry);
        }
    }
    catalog
}

/// Resolve a service name plus a relative path into an absolute URL.
pub(crate) fn resolve(catalog: &ServiceCatalog, service: &str, path: &str) -> Result<String> {
    let entry = catalog.get(service).ok_or_else(|| {
        Error::Configuration(format!(
            "service '{}' is not in the catalog; was the client authenticated?",
            service
        ))
    })?;
    Ok(join_url(&entry.service_url, path))
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, region: &str, url: &str, enabled: bool) -> ServiceEntry {
        ServiceEntry {
            canonical_name: name.to_string(),
            code: name.to_string(),
            region: region.to_string(),
            service_url: url.to_string(),
            enabled,
        }
    }

    #[test]
    fn test_build_catalog_filters_region_and_enabled() {
        let catalog = build_catalog(
            vec![
                entry("cloud_server", "HN", "https://hn.api.example/iaas", true),
                entry("cloud_server", "HCM", "https://hcm.api.example/iaas", true),
                entry("dns", "HN", "https://hn.api.example/dns", false),
            ],
            "HN",
        );

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog["cloud_server"].service_url,
            "https://hn.api.example/iaas"
        );
    }

    #[test]
    fn test_build_catalog_last_write_wins() {
        let catalog = build_catalog(
            vec![
                entry("dns", "HN", "https://old.example/dns", true),
                entry("dns", "HN", "https://new.example/dns", true),
            ],
            "HN",
        );

        assert_eq!(catalog["dns"].service_url, "https://new.example/dns");
    }

    #[test]
    fn test_resolve_unknown_service() {
        let catalog = ServiceCatalog::new();
        let err = resolve(&catalog, "kafka", "/clusters").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_join_url_normalizes_separator() {
        assert_eq!(join_url("https://a/b", "c"), "https://a/b/c");
        assert_eq!(join_url("https://a/b/", "c"), "https://a/b/c");
        assert_eq!(join_url("https://a/b", "/c"), "https://a/b/c");
        assert_eq!(join_url("https://a/b/", "/c"), "https://a/b/c");
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Resolution is plain concatenation with one separator: for a
        /// clean base and path the result is exactly `base + path`.
        #[test]
        fn resolve_is_concatenation(
            name in "[a-z_]{3,15}",
            base in "https://[a-z]{3,10}\\.example(/[a-z]{1,8}){0,2}",
            path in "(/[a-z-]{1,10}){1,3}"
        ) {
            let mut catalog = ServiceCatalog::new();
            catalog.insert(name.clone(), ServiceEntry {
                canonical_name: name.clone(),
                code: String::new(),
                region: "HN".to_string(),
                service_url: base.clone(),
                enabled: true,
            });

            let resolved = resolve(&catalog, &name, &path).unwrap();
            prop_assert_eq!(resolved, format!("{}{}", base, path));
        }

        /// The seam between base and path never doubles the slash, however
        /// many trailing/leading slashes the inputs carry.
        #[test]
        fn join_never_doubles_separator(
            base in "https://[a-z]{3,10}\\.example(/[a-z]{1,8}){0,2}/{0,2}",
            path in "/{0,2}([a-z]{1,8}/){0,2}[a-z]{1,8}"
        ) {
            let joined = join_url(&base, &path);
            let after_scheme = &joined["https://".len()..];
            prop_assert!(!after_scheme.contains("//"), "double slash in {}", joined);
        }

        /// Resolution is deterministic: two resolves agree.
        #[test]
        fn resolve_is_deterministic(
            name in "[a-z_]{3,15}",
            path in "(/[a-z]{1,8}){1,3}"
        ) {
            let mut catalog = ServiceCatalog::new();
            catalog.insert(name.clone(), ServiceEntry {
                canonical_name: name.clone(),
                code: String::new(),
                region: "HN".to_string(),
                service_url: "https://svc.example/api".to_string(),
                enabled: true,
            });

            prop_assert_eq!(
                resolve(&catalog, &name, &path).unwrap(),
                resolve(&catalog, &name, &path).unwrap()
            );
        }

        /// Indexing keeps the last row for a duplicated canonical name.
        #[test]
        fn indexing_is_last_write_wins(urls in prop::collection::vec("https://[a-z]{3,10}\\.example", 1..6)) {
            let entries: Vec<ServiceEntry> = urls
                .iter()
                .map(|url| ServiceEntry {
                    canonical_name: "dns".to_string(),
                    code: String::new(),
                    region: "HN".to_string(),
                    service_url: url.clone(),
                    enabled: true,
                })
                .collect();

            let catalog = build_catalog(entries, "HN");
            prop_assert_eq!(&catalog["dns"].service_url, urls.last().unwrap());
        }
    }
}
