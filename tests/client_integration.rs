//! Integration tests for the client core using wiremock
//!
//! These tests drive the real request engine against mocked endpoints:
//! authentication, catalog resolution, header attachment, the single
//! refresh-retry on 401, refresh coalescing, error mapping, pagination,
//! and cancellation.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{
    basic_auth, bearer_token, body_json, header, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizfly::{Client, Credential, Error};

const TOKEN_PATH: &str = "/api/auth/token";
const SERVICE_PATH: &str = "/api/auth/service";

fn app_credential() -> Credential {
    Credential::AppCredential {
        id: "cred-id".to_string(),
        secret: "cred-secret".to_string(),
    }
}

/// Catalog body pointing every service at the mock server.
fn catalog_body(uri: &str) -> serde_json::Value {
    let service = |name: &str, code: &str, suffix: &str| {
        json!({
            "canonical_name": name,
            "code": code,
            "region": "HN",
            "service_url": format!("{uri}{suffix}"),
            "enabled": true
        })
    };
    json!({
        "services": [
            service("cloud_server", "CS", "/iaas-cloud/api"),
            service("load_balancer", "LB", "/api/loadbalancers"),
            service("account", "AC", "/api/account"),
            service("dns", "DNS", "/api/dns"),
            // A row for another region that must be filtered out.
            {
                "canonical_name": "cloud_server",
                "code": "CS",
                "region": "HCM",
                "service_url": format!("{uri}/hcm-iaas"),
                "enabled": true
            },
            // A disabled row that must be filtered out.
            {
                "canonical_name": "kafka",
                "code": "KAFKA",
                "region": "HN",
                "service_url": format!("{uri}/kafka"),
                "enabled": false
            }
        ]
    })
}

/// Mount token + catalog mocks and return an authenticated client.
async fn authed_client(server: &MockServer, token: &str) -> Client {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": token,
            "expires_at": "2030-01-01T00:00:00Z"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .mount(server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .project_id("project-1")
        .build()
        .expect("client should build");

    client
        .token()
        .init(app_credential())
        .await
        .expect("init should succeed");
    client
}

/// Init authenticates, stores the token, and populates the catalog.
#[tokio::test]
async fn test_init_mints_token_and_fetches_catalog() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    assert_eq!(client.token().current().await.as_deref(), Some("tok-1"));
    assert!(client.token().expires_at().await.is_some());
}

/// The catalog endpoint receives Basic auth built from the application
/// credential.
#[tokio::test]
async fn test_catalog_fetch_uses_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-1"})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .and(basic_auth("cred-id", "cred-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    client.token().init(app_credential()).await.unwrap();
}

/// A rejected credential surfaces as an authentication error.
#[tokio::test]
async fn test_init_with_bad_credential_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "invalid credential"})),
        )
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    let err = client.token().init(app_credential()).await.unwrap_err();

    match err {
        Error::Authentication {
            status, message, ..
        } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid credential");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A request before init fails as a configuration error without touching
/// the network.
#[tokio::test]
async fn test_request_before_init_fails_without_io() {
    let server = MockServer::start().await;
    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();

    let err = client.servers().list(None).await.unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// Every resource request carries the bearer token, the project id, and
/// the JSON content type when a body is present.
#[tokio::test]
async fn test_request_headers_attached() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("PUT"))
        .and(path("/iaas-cloud/api/servers/abc"))
        .and(bearer_token("tok-1"))
        .and(header("X-Project-Id", "project-1"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"name": "renamed"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .servers()
        .rename("abc", "renamed")
        .await
        .expect("rename should succeed");
}

/// S1: after init, listing regions against the account service returns
/// every region.
#[tokio::test]
async fn test_list_regions() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/api/account/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "HN": {"active": true},
            "HCM": {"active": true}
        })))
        .mount(&server)
        .await;

    let regions = client.account().regions().await.unwrap();
    assert_eq!(regions.len(), 2);
    assert!(regions.contains_key("HN"));
    assert!(regions.contains_key("HCM"));
}

/// S2: a 401 triggers exactly one refresh, the retry succeeds, and the
/// caller sees no error.
#[tokio::test]
async fn test_single_refresh_on_401_then_success() {
    let server = MockServer::start().await;

    // First mint answers tok-1, the refresh answers tok-2.
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-1"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/volumes"))
        .and(bearer_token("tok-1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/volumes"))
        .and(bearer_token("tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    client.token().init(app_credential()).await.unwrap();

    let volumes = client.volumes().list().await.expect("retry should succeed");
    assert!(volumes.is_empty());
    assert_eq!(client.token().current().await.as_deref(), Some("tok-2"));
}

/// A second 401 after the refresh surfaces as an authentication error and
/// no further refresh is attempted.
#[tokio::test]
async fn test_second_401_surfaces_authentication_error() {
    let server = MockServer::start().await;

    // Init plus exactly one refresh: two mints in total.
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-1"})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/volumes"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    client.token().init(app_credential()).await.unwrap();

    let err = client.volumes().list().await.unwrap_err();
    assert!(matches!(err, Error::Authentication { status: 401, .. }));
}

/// With many concurrent callers observing 401 at once, the refresh runs
/// exactly once and every caller proceeds with the new token.
#[tokio::test]
async fn test_refresh_coalescing_under_concurrency() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-1"})),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;
    // The refresh mint; more than one call here means coalescing broke.
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-2"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers"))
        .and(bearer_token("tok-1"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "token expired"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers"))
        .and(bearer_token("tok-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    client.token().init(app_credential()).await.unwrap();

    let servers = client.servers();
    let (a, b, c, d, e) = tokio::join!(
        servers.list(None),
        servers.list(None),
        servers.list(None),
        servers.list(None),
        servers.list(None),
    );
    for result in [a, b, c, d, e] {
        assert!(result.expect("caller should succeed").is_empty());
    }
    assert_eq!(client.token().current().await.as_deref(), Some("tok-2"));
}

/// S3: a 409 maps to a conflict error with the server message and raw body
/// preserved.
#[tokio::test]
async fn test_conflict_on_delete() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("DELETE"))
        .and(path("/iaas-cloud/api/volumes/abc"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "volume in use"})),
        )
        .mount(&server)
        .await;

    let err = client.volumes().delete("abc").await.unwrap_err();
    match err {
        Error::Conflict { message, body } => {
            assert_eq!(message, "volume in use");
            assert!(body.contains("volume in use"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Validation and permission failures keep their kinds and messages.
#[tokio::test]
async fn test_error_kind_mapping() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers/forbidden"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers/limited"))
        .respond_with(
            ResponseTemplate::new(429)
                .append_header("Retry-After", "15")
                .set_body_json(json!({"message": "slow down"})),
        )
        .mount(&server)
        .await;

    assert!(client.servers().get("missing").await.unwrap_err().is_not_found());
    assert!(matches!(
        client.servers().get("forbidden").await.unwrap_err(),
        Error::Permission { .. }
    ));
    match client.servers().get("limited").await.unwrap_err() {
        Error::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(15)),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// S4: two pages concatenate to the full result set.
#[tokio::test]
async fn test_pagination_two_pages() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    let page_items = |offset: usize| -> Vec<serde_json::Value> {
        (0..50)
            .map(|i| json!({"domain": format!("domain-{}.example", offset + i), "active": true}))
            .collect()
    };

    Mock::given(method("GET"))
        .and(path("/api/account/users/domains"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": page_items(0),
            "total": 100,
            "next": "?page=2&limit=50"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/account/users/domains"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": page_items(50),
            "total": 100
        })))
        .mount(&server)
        .await;

    let first = client.account().user_domains(1, 50).await.unwrap();
    assert_eq!(first.total, 100);
    assert!(first.next.is_some());

    let second = client.account().user_domains(2, 50).await.unwrap();
    assert!(second.next.is_none());

    let mut all = first.results;
    all.extend(second.results);
    assert_eq!(all.len(), 100);
}

/// S5: a deadline shorter than the server's response time yields a
/// transport error and no retry.
#[tokio::test]
async fn test_cancellation_yields_transport_error() {
    let server = MockServer::start().await;

    let transport = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({"token": "tok-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .http_client(transport)
        .build()
        .unwrap();
    client.token().init(app_credential()).await.unwrap();

    match client.servers().list(None).await.unwrap_err() {
        Error::Transport(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// S6: bulk member replacement is a PUT answered with 202 and no body.
#[tokio::test]
async fn test_bulk_member_replace() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("PUT"))
        .and(path("/api/loadbalancers/pool/pool-1/member"))
        .and(body_json(json!({
            "members": [
                {"address": "10.0.0.1", "protocol_port": 80},
                {"address": "10.0.0.2", "protocol_port": 80}
            ]
        })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let members = vec![
        bizfly::services::load_balancer::MemberSpec {
            address: "10.0.0.1".to_string(),
            protocol_port: 80,
            ..Default::default()
        },
        bizfly::services::load_balancer::MemberSpec {
            address: "10.0.0.2".to_string(),
            protocol_port: 80,
            ..Default::default()
        },
    ];
    client
        .pools()
        .replace_members("pool-1", &members)
        .await
        .expect("bulk replace should succeed");
}

/// An injected keystone token is usable without a stored credential and
/// populates the catalog.
#[tokio::test]
async fn test_set_token_populates_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SERVICE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(catalog_body(&server.uri())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers"))
        .and(bearer_token("federated-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::builder()
        .api_url(server.uri())
        .region("HN")
        .build()
        .unwrap();
    client.set_token("federated-token").await.unwrap();

    assert!(client.servers().list(None).await.unwrap().is_empty());
}

/// A request body round-trips through JSON unchanged.
#[tokio::test]
async fn test_create_body_round_trip() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("POST"))
        .and(path("/api/dns/zones"))
        .and(body_json(json!({"name": "example.com"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "zone-1",
            "name": "example.com",
            "active": true,
            "ttl": 3600,
            "nameserver": ["ns1.example", "ns2.example"]
        })))
        .mount(&server)
        .await;

    let zone = client.dns().create_zone("example.com", None).await.unwrap();
    assert_eq!(zone.id, "zone-1");
    assert_eq!(zone.name, "example.com");
    assert_eq!(zone.nameserver.len(), 2);
}

/// A success body that is not the expected shape maps to a decode error.
#[tokio::test]
async fn test_shape_mismatch_is_decode_error() {
    let server = MockServer::start().await;
    let client = authed_client(&server, "tok-1").await;

    Mock::given(method("GET"))
        .and(path("/iaas-cloud/api/servers/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    assert!(matches!(
        client.servers().get("abc").await.unwrap_err(),
        Error::Decode(_)
    ));
}
