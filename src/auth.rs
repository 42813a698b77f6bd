//! Authentication
//!
//! Tokens are minted from stored credentials against the provider's token
//! endpoint and carried as `Authorization: Bearer` on every request. The
//! manager never refreshes proactively; the request engine drives refresh
//! when it observes a 401 (see [`crate::http`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::client::Client;
use crate::error::{Error, Result};

/// Path of the token endpoint, relative to the API gateway.
pub(crate) const TOKEN_PATH: &str = "/api/auth/token";

/// Credential material used to mint bearer tokens.
///
/// The variant tag is preserved inside the client so a refresh can re-mint
/// without caller involvement. Application credentials are preferred for
/// long-lived programs.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Dashboard username and password.
    Password { username: String, password: String },
    /// Application credential id and secret issued by the provider.
    AppCredential { id: String, secret: String },
}

impl Credential {
    fn auth_method(&self) -> &'static str {
        match self {
            Credential::Password { .. } => "password",
            Credential::AppCredential { .. } => "application_credential",
        }
    }
}

/// A minted bearer token with its server-reported expiry.
#[derive(Debug, Clone)]
pub(crate) struct Token {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    auth_method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    credential_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    credential_secret: Option<&'a str>,
}

impl<'a> TokenRequest<'a> {
    fn from_credential(credential: &'a Credential) -> Self {
        match credential {
            Credential::Password { username, password } => TokenRequest {
                auth_method: credential.auth_method(),
                username: Some(username),
                password: Some(password),
                credential_id: None,
                credential_secret: None,
            },
            Credential::AppCredential { id, secret } => TokenRequest {
                auth_method: credential.auth_method(),
                username: None,
                password: None,
                credential_id: Some(id),
                credential_secret: Some(secret),
            },
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

/// Mint a new token from the given credential.
///
/// 401 and 403 both mean the credential was rejected and map to
/// [`Error::Authentication`]; other failures keep their usual kinds.
pub(crate) async fn mint_token(
    http: &reqwest::Client,
    api_url: &str,
    credential: &Credential,
) -> Result<Token> {
    let url = catalog::join_url(api_url, TOKEN_PATH);
    tracing::debug!("POST {} (auth_method={})", url, credential.auth_method());

    let response = http
        .post(&url)
        .json(&TokenRequest::from_credential(credential))
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if status.as_u16() == 401 || status.as_u16() == 403 {
        let message = match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(v) => v
                .get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .unwrap_or("credential rejected")
                .to_string(),
            Err(_) => "credential rejected".to_string(),
        };
        return Err(Error::Authentication {
            status: status.as_u16(),
            message,
            body,
        });
    }
    if !status.is_success() {
        return Err(Error::from_response(status.as_u16(), None, body));
    }

    let decoded: TokenResponse = serde_json::from_str(&body)?;
    Ok(Token {
        value: decoded.token,
        expires_at: decoded.expires_at,
    })
}

/// Token manager façade.
///
/// Obtained via [`Client::token`]. `init` authenticates and populates the
/// service catalog; `refresh` re-mints with the stored credential; `current`
/// reads the cached token without network I/O.
pub struct TokenService<'a> {
    client: &'a Client,
}

impl<'a> TokenService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Store the credential, authenticate, and fetch the service catalog.
    ///
    /// Returns the minted token string. Until this (or
    /// [`Client::set_token`]) succeeds, every resource call fails with
    /// [`Error::Configuration`] before any network I/O.
    pub async fn init(&self, credential: Credential) -> Result<String> {
        self.client.authenticate_with(credential).await
    }

    /// Re-authenticate with the stored credential and re-fetch the catalog.
    ///
    /// Idempotent; concurrent refreshes are coalesced into one.
    pub async fn refresh(&self) -> Result<String> {
        self.client.refresh_auth(None).await
    }

    /// The cached token string, if the client has authenticated.
    pub async fn current(&self) -> Option<String> {
        self.client.current_token().await
    }

    /// Server-reported expiry of the cached token.
    pub async fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.client.token_expiry().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_payload_shape() {
        let credential = Credential::Password {
            username: "user@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let payload =
            serde_json::to_value(TokenRequest::from_credential(&credential)).unwrap();

        assert_eq!(payload["auth_method"], "password");
        assert_eq!(payload["username"], "user@example.com");
        assert_eq!(payload["password"], "hunter2");
        assert!(payload.get("credential_id").is_none());
        assert!(payload.get("credential_secret").is_none());
    }

    #[test]
    fn test_app_credential_payload_shape() {
        let credential = Credential::AppCredential {
            id: "cred-id".to_string(),
            secret: "cred-secret".to_string(),
        };
        let payload =
            serde_json::to_value(TokenRequest::from_credential(&credential)).unwrap();

        assert_eq!(payload["auth_method"], "application_credential");
        assert_eq!(payload["credential_id"], "cred-id");
        assert_eq!(payload["credential_secret"], "cred-secret");
        assert!(payload.get("username").is_none());
    }

    #[test]
    fn test_token_response_parses_rfc3339_expiry() {
        let decoded: TokenResponse = serde_json::from_str(
            r#"{"token":"tok-abc","expires_at":"2026-01-15T10:30:00Z"}"#,
        )
        .unwrap();
        assert_eq!(decoded.token, "tok-abc");
        assert!(decoded.expires_at.is_some());
    }

    #[test]
    fn test_token_response_expiry_optional() {
        let decoded: TokenResponse = serde_json::from_str(r#"{"token":"tok-abc"}"#).unwrap();
        assert!(decoded.expires_at.is_none());
    }
}
