//! Upstream employee API client.
//!
//! # Responsibilities
//! - Build URLs from the base URL and endpoint templates, percent-encoding
//!   each substituted value as a single path segment
//! - Apply a uniform deadline to every call
//! - Classify status codes (3xx, 429, 4xx, 5xx) into [`UpstreamError`]
//! - Decode the body into a raw envelope
//!
//! Exactly one round trip per call; retrying is the caller's concern.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::directory::CreateEmployeeRequest;
use crate::resilience::timeouts::with_deadline;
use crate::upstream::{
    ApiPath, HttpTransport, ResponseEnvelope, Transport, TransportRequest, TransportResponse,
    UpstreamError,
};

/// Client for the four employee API endpoints.
#[derive(Clone)]
pub struct UpstreamClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client over an arbitrary transport.
    pub fn new(base_url: &str, timeout: Duration, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Create a client backed by the `reqwest` transport.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            Arc::new(transport),
        ))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_employees(&self) -> Result<ResponseEnvelope<Value>, UpstreamError> {
        self.call(Method::GET, ApiPath::Employees, &[], None).await
    }

    pub async fn employee(&self, id: &str) -> Result<ResponseEnvelope<Value>, UpstreamError> {
        self.call(Method::GET, ApiPath::Employee, &[("id", id)], None)
            .await
    }

    pub async fn create_employee(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<ResponseEnvelope<Value>, UpstreamError> {
        let body = encode(request)?;
        self.call(Method::POST, ApiPath::Create, &[], Some(body)).await
    }

    pub async fn delete_employee(&self, id: &str) -> Result<ResponseEnvelope<Value>, UpstreamError> {
        self.call(Method::DELETE, ApiPath::Delete, &[("id", id)], None)
            .await
    }

    /// Issue one call and decode the envelope.
    pub async fn call(
        &self,
        method: Method,
        path: ApiPath,
        params: &[(&str, &str)],
        body: Option<Vec<u8>>,
    ) -> Result<ResponseEnvelope<Value>, UpstreamError> {
        let url = self.url_for(path, params)?;

        tracing::debug!(
            operation = path.operation(),
            method = %method,
            url = %url,
            "Calling upstream"
        );

        let request = TransportRequest { method, url, body };
        let response = with_deadline(self.timeout, self.transport.send(request)).await?;

        decode(path, response)
    }

    fn url_for(&self, path: ApiPath, params: &[(&str, &str)]) -> Result<Url, UpstreamError> {
        let segments = path.segments(params);
        if let Some(dots) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(UpstreamError::InvalidUrl(format!("{dots:?} is not a usable path segment")));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidUrl(format!("{} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>, UpstreamError> {
    serde_json::to_vec(body).map_err(|e| UpstreamError::Decode(format!("could not encode request: {e}")))
}

fn decode(path: ApiPath, response: TransportResponse) -> Result<ResponseEnvelope<Value>, UpstreamError> {
    let status = response.status;
    match status {
        200..=299 => serde_json::from_slice(&response.body).map_err(|e| {
            tracing::warn!(operation = path.operation(), error = %e, "Undecodable upstream body");
            UpstreamError::Decode(e.to_string())
        }),
        300..=399 => Err(UpstreamError::Redirect {
            status,
            location: response.location,
        }),
        429 => Err(UpstreamError::RateLimited),
        500..=599 => Err(UpstreamError::ServerError {
            status,
            body: response.body_text(),
        }),
        _ => Err(UpstreamError::ClientError {
            status,
            body: response.body_text(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns one canned response and remembers the request.
    struct CannedTransport {
        response: Result<TransportResponse, UpstreamError>,
        delay: Option<Duration>,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl CannedTransport {
        fn new(response: Result<TransportResponse, UpstreamError>) -> Arc<Self> {
            Arc::new(Self {
                response,
                delay: None,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, UpstreamError> {
            self.seen.lock().unwrap().push(request);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }

    fn client(transport: Arc<CannedTransport>) -> UpstreamClient {
        UpstreamClient::new("http://upstream.test/api/v1/", Duration::from_millis(200), transport)
    }

    #[tokio::test]
    async fn test_builds_url_from_base_and_template() {
        let transport = CannedTransport::new(Ok(TransportResponse::new(
            200,
            r#"{"status":"success","data":"12"}"#,
        )));
        let client = client(transport.clone());

        client.delete_employee("12").await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::DELETE);
        assert_eq!(seen[0].url.as_str(), "http://upstream.test/api/v1/delete/12");
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn test_id_is_encoded_as_one_segment() {
        let transport = CannedTransport::new(Ok(TransportResponse::new(
            200,
            r#"{"status":"success","data":"12"}"#,
        )));
        let client = client(transport.clone());

        client.employee("a/../b").await.unwrap();
        client.delete_employee("../employee/12").await.unwrap();
        client.employee("x y?z#w").await.unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].url.path(), "/api/v1/employee/a%2F..%2Fb");
        assert_eq!(seen[1].url.path(), "/api/v1/delete/..%2Femployee%2F12");
        assert_eq!(seen[2].url.as_str(), "http://upstream.test/api/v1/employee/x%20y%3Fz%23w");
    }

    #[tokio::test]
    async fn test_dot_segment_id_is_refused() {
        let transport = CannedTransport::new(Ok(TransportResponse::new(200, r#"{"status":"success"}"#)));
        let client = client(transport.clone());

        let err = client.delete_employee("..").await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidUrl(_)));
        assert!(transport.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_base_without_path() {
        let transport = CannedTransport::new(Ok(TransportResponse::new(200, r#"{"status":"success"}"#)));
        let client = UpstreamClient::new("http://upstream.test", Duration::from_millis(200), transport.clone());

        client.list_employees().await.unwrap();
        assert_eq!(transport.seen.lock().unwrap()[0].url.as_str(), "http://upstream.test/employees");
    }

    #[tokio::test]
    async fn test_create_sends_string_typed_body() {
        let transport = CannedTransport::new(Ok(TransportResponse::new(200, r#"{"status":"success"}"#)));
        let client = client(transport.clone());
        let request = CreateEmployeeRequest {
            name: "Test Employee 1".into(),
            salary: "543989".into(),
            age: "52".into(),
            profile_image: String::new(),
        };

        client.create_employee(&request).await.unwrap();

        let seen = transport.seen.lock().unwrap();
        let body: Value = serde_json::from_slice(seen[0].body.as_ref().unwrap()).unwrap();
        assert_eq!(body["salary"], "543989");
        assert_eq!(body["age"], "52");
        assert_eq!(seen[0].url.path(), "/api/v1/create");
    }

    #[tokio::test]
    async fn test_status_classification() {
        let cases = [
            (302, "redirect"),
            (429, "rate_limited"),
            (404, "client_error"),
            (500, "server_error"),
            (503, "server_error"),
        ];
        for (status, kind) in cases {
            let client = client(CannedTransport::new(Ok(TransportResponse::new(status, "oops"))));
            let err = client.list_employees().await.unwrap_err();
            assert_eq!(err.kind(), kind, "status {status}");
        }
    }

    #[tokio::test]
    async fn test_redirect_keeps_location() {
        let mut response = TransportResponse::new(301, "");
        response.location = Some("https://moved.test/".into());
        let client = client(CannedTransport::new(Ok(response)));

        let err = client.list_employees().await.unwrap_err();
        assert_eq!(
            err,
            UpstreamError::Redirect {
                status: 301,
                location: Some("https://moved.test/".into())
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let client = client(CannedTransport::new(Ok(TransportResponse::new(200, "<html>"))));
        let err = client.list_employees().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_slow_transport_hits_deadline() {
        let transport = Arc::new(CannedTransport {
            response: Ok(TransportResponse::new(200, r#"{"status":"success"}"#)),
            delay: Some(Duration::from_secs(5)),
            seen: Mutex::new(Vec::new()),
        });
        let client = client(transport);

        let err = client.list_employees().await.unwrap_err();
        assert_eq!(err, UpstreamError::Timeout(Duration::from_millis(200)));
    }
}
