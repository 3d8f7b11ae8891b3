//! Postal-code lookup clients.
//!
//! # Contract
//!
//! [`fetch`] performs exactly one HTTP GET against one [`Endpoint`] and always
//! returns exactly one [`Envelope`]. Failures never escape as `Err`: they are
//! folded into an error payload so the caller sees a uniform shape.
//!
//! | Stage | Failure | Envelope |
//! |-------|---------|----------|
//! | Client setup | [`FetchError::ClientBuild`] | `{error: ...}` |
//! | Send | [`FetchError::Timeout`] / [`FetchError::Transport`] | `{error: ...}` |
//! | Body | [`FetchError::Read`] | `{error: ...}` |
//! | JSON | [`FetchError::Decode`] / [`FetchError::EmptyObject`] | `{error: ...}` |
//! | - | none | decoded fields, in response order |
//!
//! The HTTP status is not interpreted. Both services answer unknown codes with a
//! JSON body, and that body is what the user sees.
//!
//! Each call builds its own `reqwest::Client` with the request timeout attached, so
//! two concurrent lookups never share connection state.

mod error;

pub use error::FetchError;

use std::time::Duration;

use serde_json::{Map, Value};

use ceprace_types::{Endpoint, Envelope, Payload};

pub const USER_AGENT: &str = concat!("ceprace/", env!("CARGO_PKG_VERSION"));

/// Look up `code` at `endpoint`, giving up after `timeout`.
pub async fn fetch(endpoint: &Endpoint, code: &str, timeout: Duration) -> Envelope {
    let source = endpoint.source();
    tracing::debug!(%source, code, timeout_ms = timeout.as_millis() as u64, "Fetching");

    match try_fetch(endpoint, code, timeout).await {
        Ok(payload) => {
            tracing::debug!(%source, fields = payload.fields().len(), "Fetch succeeded");
            Envelope::new(source, payload)
        }
        Err(err) => {
            tracing::warn!(%source, timed_out = err.is_timeout(), error = %err, "Fetch failed");
            Envelope::new(source, Payload::error(err.to_string()))
        }
    }
}

async fn try_fetch(
    endpoint: &Endpoint,
    code: &str,
    timeout: Duration,
) -> Result<Payload, FetchError> {
    let client = build_client(timeout)?;
    let url = endpoint.url_for(code);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| FetchError::from_send(e, &url, timeout))?;

    tracing::debug!(status = response.status().as_u16(), %url, "Response received");

    let body = response.bytes().await.map_err(FetchError::Read)?;
    decode_payload(&body)
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(FetchError::ClientBuild)
}

/// Decode a response body as a non-empty JSON object.
pub fn decode_payload(body: &[u8]) -> Result<Payload, FetchError> {
    let fields: Map<String, Value> = serde_json::from_slice(body).map_err(FetchError::Decode)?;
    Payload::data(fields).map_err(|_| FetchError::EmptyObject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    use ceprace_types::Source;
    use wiremock::matchers::any;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn decode_payload_keeps_fields_verbatim() {
        let payload = decode_payload(br#"{"cep":"01001000","ibge":3550308,"gia":null}"#).unwrap();
        let fields = payload.fields();
        assert_eq!(fields["cep"], Value::String("01001000".into()));
        assert_eq!(fields["ibge"], Value::from(3_550_308));
        assert_eq!(fields["gia"], Value::Null);
    }

    #[test]
    fn decode_payload_rejects_non_object() {
        let err = decode_payload(b"[1, 2, 3]").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn decode_payload_rejects_garbage() {
        let err = decode_payload(b"<html>busy</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().starts_with("invalid JSON response"));
    }

    #[test]
    fn decode_payload_rejects_empty_object() {
        let err = decode_payload(b"{}").unwrap_err();
        assert!(matches!(err, FetchError::EmptyObject));
    }

    #[tokio::test]
    async fn timeout_keeps_underlying_error() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"cep":"01001000"}"#)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;
        let endpoint = Endpoint::new(Source::BrasilApi, format!("{}/", server.uri()), "");

        let err = try_fetch(&endpoint, "01001000", Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("timed out after 100ms"));
        assert!(err.source().is_some(), "timeout lost its reqwest error");
    }

    #[test]
    fn client_builds_with_timeout() {
        assert!(build_client(Duration::from_millis(1)).is_ok());
    }
}
