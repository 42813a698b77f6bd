//! Error types for the BizFly Cloud API client
//!
//! Every fallible operation in this crate returns [`Error`]. HTTP failures
//! are classified by status code into a stable kind; the server-supplied
//! message and the raw response body are preserved for diagnostics.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the client.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing required option, unknown service name, or malformed URL.
    /// Always a caller bug; never retriable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// 401/403 from the token endpoint, or a 401 that survived one
    /// automatic token refresh.
    #[error("authentication failed (HTTP {status}): {message}")]
    Authentication {
        status: u16,
        message: String,
        body: String,
    },

    /// 403 on a resource endpoint with a valid token.
    #[error("permission denied: {message}")]
    Permission { message: String, body: String },

    /// 404.
    #[error("not found: {message}")]
    NotFound { message: String, body: String },

    /// 409, e.g. deleting a volume while it is attached.
    #[error("conflict: {message}")]
    Conflict { message: String, body: String },

    /// 429. `retry_after` carries the server's `Retry-After` header in
    /// seconds when present.
    #[error("rate limited: {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
        body: String,
    },

    /// 5xx.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        status: u16,
        message: String,
        body: String,
    },

    /// 400 with a server-provided validation message.
    #[error("invalid request: {message}")]
    Validation { message: String, body: String },

    /// Network-layer failure: DNS, connect, TLS, timeout, cancellation.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body was not valid JSON or did not match the target shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    /// Map a non-2xx HTTP response to its error kind.
    ///
    /// The body is consumed into the error record; the server message is
    /// extracted best-effort from `{"message": ...}` or `{"error": ...}`
    /// shapes.
    pub(crate) fn from_response(status: u16, retry_after: Option<u64>, body: String) -> Self {
        let message = extract_message(&body);
        match status {
            400 => Error::Validation { message, body },
            401 => Error::Authentication {
                status,
                message,
                body,
            },
            403 => Error::Permission { message, body },
            404 => Error::NotFound { message, body },
            409 => Error::Conflict { message, body },
            429 => Error::RateLimit {
                message,
                retry_after,
                body,
            },
            s if s >= 500 => Error::Server {
                status: s,
                message,
                body,
            },
            // Unexpected client-side statuses (e.g. 405, 410) carry no
            // dedicated kind; classify them with the validation family.
            _ => Error::Validation { message, body },
        }
    }

    /// HTTP status attached to this error, when one exists.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Authentication { status, .. } | Error::Server { status, .. } => Some(*status),
            Error::Validation { .. } => Some(400),
            Error::Permission { .. } => Some(403),
            Error::NotFound { .. } => Some(404),
            Error::Conflict { .. } => Some(409),
            Error::RateLimit { .. } => Some(429),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Raw response body preserved for diagnostics, when one exists.
    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Authentication { body, .. }
            | Error::Permission { body, .. }
            | Error::NotFound { body, .. }
            | Error::Conflict { body, .. }
            | Error::RateLimit { body, .. }
            | Error::Server { body, .. }
            | Error::Validation { body, .. } => Some(body),
            _ => None,
        }
    }

    /// True for `NotFound`, useful for exists-style checks.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

/// Pull a human-readable message out of an error body.
///
/// The provider answers with either `{"message": "..."}` or
/// `{"error": "..."}`; anything else falls back to a truncated copy of the
/// body itself.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = value.get("message").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value.get("error").and_then(|v| v.as_str()) {
            return msg.to_string();
        }
        if let Some(msg) = value
            .get("error")
            .and_then(|v| v.get("message"))
            .and_then(|v| v.as_str())
        {
            return msg.to_string();
        }
    }

    const MAX_FALLBACK_LENGTH: usize = 200;
    if body.len() > MAX_FALLBACK_LENGTH {
        let mut end = MAX_FALLBACK_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            Error::from_response(400, None, String::new()),
            Error::Validation { .. }
        ));
        assert!(matches!(
            Error::from_response(401, None, String::new()),
            Error::Authentication { status: 401, .. }
        ));
        assert!(matches!(
            Error::from_response(403, None, String::new()),
            Error::Permission { .. }
        ));
        assert!(matches!(
            Error::from_response(404, None, String::new()),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            Error::from_response(409, None, String::new()),
            Error::Conflict { .. }
        ));
        assert!(matches!(
            Error::from_response(429, Some(30), String::new()),
            Error::RateLimit {
                retry_after: Some(30),
                ..
            }
        ));
        assert!(matches!(
            Error::from_response(503, None, String::new()),
            Error::Server { status: 503, .. }
        ));
    }

    #[test]
    fn test_message_from_message_field() {
        let err = Error::from_response(409, None, r#"{"message":"volume in use"}"#.to_string());
        match err {
            Error::Conflict { message, body } => {
                assert_eq!(message, "volume in use");
                assert_eq!(body, r#"{"message":"volume in use"}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_message_from_error_field() {
        let err = Error::from_response(404, None, r#"{"error":"no such zone"}"#.to_string());
        match err {
            Error::NotFound { message, .. } => assert_eq!(message, "no such zone"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_json_body_falls_back_to_raw() {
        let err = Error::from_response(500, None, "<html>bad gateway</html>".to_string());
        match err {
            Error::Server { message, .. } => assert_eq!(message, "<html>bad gateway</html>"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_accessor() {
        assert_eq!(
            Error::from_response(429, None, String::new()).status(),
            Some(429)
        );
        assert_eq!(
            Error::Configuration("missing region".to_string()).status(),
            None
        );
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Mapping is total: every status and body yields a classified
        /// error without panicking.
        #[test]
        fn mapping_is_total(status in 100u16..600, body in ".{0,300}") {
            let _ = Error::from_response(status, None, body);
        }

        /// The taxonomy's canonical statuses survive the round trip
        /// through mapping and the accessor.
        #[test]
        fn canonical_statuses_preserved(
            status in prop_oneof![
                Just(400u16), Just(401), Just(403), Just(404),
                Just(409), Just(429), 500u16..600
            ]
        ) {
            let err = Error::from_response(status, None, String::new());
            prop_assert_eq!(err.status(), Some(status));
        }

        /// The server message is extracted from either accepted shape.
        #[test]
        fn message_extracted_from_both_shapes(msg in "[a-zA-Z ]{1,40}") {
            let from_message = Error::from_response(
                409, None, format!(r#"{{"message":"{msg}"}}"#));
            let from_error = Error::from_response(
                409, None, format!(r#"{{"error":"{msg}"}}"#));

            for err in [from_message, from_error] {
                match err {
                    Error::Conflict { message, .. } => prop_assert_eq!(&message, &msg),
                    other => prop_assert!(false, "unexpected error: {:?}", other),
                }
            }
        }
    }
}
