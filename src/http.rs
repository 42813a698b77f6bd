//! Request engine
//!
//! The one code path every resource call goes through: resolve the endpoint
//! through the service catalog, attach auth and project headers, dispatch,
//! and classify failures. A 401 on a non-token path triggers exactly one
//! coalesced token refresh followed by one retry; everything else surfaces
//! unchanged.

use reqwest::header::{CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::TOKEN_PATH;
use crate::client::Client;
use crate::error::{Error, Result};

/// A captured request: everything needed to dispatch it, with the JSON body
/// serialized exactly once so the single retry can reuse the same bytes.
pub(crate) struct ApiRequest {
    pub method: Method,
    pub service: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Append a query parameter.
    pub(crate) fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl Client {
    /// Capture a request descriptor. Serializes the body; no I/O.
    pub(crate) fn new_request<B>(
        &self,
        method: Method,
        service: &'static str,
        path: impl Into<String>,
        body: Option<&B>,
    ) -> Result<ApiRequest>
    where
        B: Serialize + ?Sized,
    {
        let body = body.map(serde_json::to_vec).transpose()?;
        Ok(ApiRequest {
            method,
            service,
            path: path.into(),
            query: Vec::new(),
            body,
        })
    }

    /// Dispatch a descriptor and return the successful response.
    ///
    /// The first 401 on a non-token path runs the coalesced refresh and
    /// retries once with a fresh body reader built from the retained bytes;
    /// a second 401 maps to [`Error::Authentication`]. Non-2xx statuses are
    /// classified with the body consumed into the error record. Network
    /// failures (including cancellation) are [`Error::Transport`] and never
    /// retried here.
    pub(crate) async fn send(&self, request: &ApiRequest) -> Result<reqwest::Response> {
        let (url, token) = self.snapshot(request.service, &request.path).await?;
        let response = self.dispatch(request, &url, token.as_deref()).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !request.path.ends_with(TOKEN_PATH) {
            tracing::debug!("401 on {} {}, refreshing token once", request.method, url);
            drop(response);

            let fresh = self.refresh_auth(token.as_deref()).await?;
            // The catalog may have moved together with the token.
            let (url, _) = self.snapshot(request.service, &request.path).await?;
            let retry = self.dispatch(request, &url, Some(&fresh)).await?;
            return check_status(retry).await;
        }

        check_status(response).await
    }

    /// Dispatch and decode the JSON body into `T`, releasing the body on
    /// every exit path.
    pub(crate) async fn send_decode<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Dispatch, discard any body (202/204-style responses), and report
    /// success.
    pub(crate) async fn send_empty(&self, request: &ApiRequest) -> Result<()> {
        let response = self.send(request).await?;
        // Drain so the connection returns to the pool.
        let _ = response.bytes().await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        url: &str,
        token: Option<&str>,
    ) -> Result<reqwest::Response> {
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .header(USER_AGENT, &self.inner.user_agent);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(project_id) = &self.inner.project_id {
            builder = builder.header("X-Project-Id", project_id);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }

        Ok(builder.send().await?)
    }

    // Thin verb helpers used by the façades.

    pub(crate) async fn api_get<T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: impl Into<String>,
    ) -> Result<T> {
        let request = self.new_request::<()>(Method::GET, service, path, None)?;
        self.send_decode(&request).await
    }

    pub(crate) async fn api_get_query<T: DeserializeOwned>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut request = self.new_request::<()>(Method::GET, service, path, None)?;
        for (key, value) in query {
            request = request.query(*key, value.clone());
        }
        self.send_decode(&request).await
    }

    pub(crate) async fn api_post<B, T>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(Method::POST, service, path, Some(body))?;
        self.send_decode(&request).await
    }

    pub(crate) async fn api_post_empty<B>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.new_request(Method::POST, service, path, Some(body))?;
        self.send_empty(&request).await
    }

    pub(crate) async fn api_put<B, T>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(Method::PUT, service, path, Some(body))?;
        self.send_decode(&request).await
    }

    pub(crate) async fn api_put_empty<B>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.new_request(Method::PUT, service, path, Some(body))?;
        self.send_empty(&request).await
    }

    pub(crate) async fn api_patch<B, T>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.new_request(Method::PATCH, service, path, Some(body))?;
        self.send_decode(&request).await
    }

    pub(crate) async fn api_delete(
        &self,
        service: &'static str,
        path: impl Into<String>,
    ) -> Result<()> {
        let request = self.new_request::<()>(Method::DELETE, service, path, None)?;
        self.send_empty(&request).await
    }

    /// DELETE with a JSON body; the provider uses this for bulk deletes.
    pub(crate) async fn api_delete_body<B>(
        &self,
        service: &'static str,
        path: impl Into<String>,
        body: &B,
    ) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let request = self.new_request(Method::DELETE, service, path, Some(body))?;
        self.send_empty(&request).await
    }
}

/// Classify a response: 2xx passes through, everything else becomes an error
/// with the body consumed into it.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    tracing::warn!("API error: {} - {}", status, truncate_for_log(&body));
    Err(Error::from_response(status.as_u16(), retry_after, body))
}

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

fn truncate_for_log(body: &str) -> String {
    if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_request_serializes_body_once() {
        let client = Client::builder()
            .api_url("https://example.invalid")
            .build()
            .unwrap();
        let body = serde_json::json!({"name": "vm-1"});
        let request = client
            .new_request(Method::POST, "cloud_server", "/servers", Some(&body))
            .unwrap();

        assert_eq!(request.body.as_deref(), Some(br#"{"name":"vm-1"}"# as &[u8]));
        assert_eq!(request.path, "/servers");
    }

    #[test]
    fn test_query_appends_in_order() {
        let client = Client::builder()
            .api_url("https://example.invalid")
            .build()
            .unwrap();
        let request = client
            .new_request::<()>(Method::GET, "cdn", "/domains", None)
            .unwrap()
            .query("page", "1")
            .query("limit", "50");

        assert_eq!(
            request.query,
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "50".to_string())
            ]
        );
    }

    #[test]
    fn test_truncate_for_log() {
        let long = "x".repeat(500);
        let truncated = truncate_for_log(&long);
        assert!(truncated.contains("truncated"));
        assert!(truncated.len() < long.len());
    }
}
