//! Outbound HTTP primitive.
//!
//! The API clients only ever need "send this request, give me status, body
//! and headers". `HttpTransport` is that seam; `ReqwestTransport` is the
//! production implementation and tests swap in an in-memory one.

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use crate::error::TransportError;

/// Maximum redirects followed per request
const MAX_REDIRECTS: usize = 15;

/// A fully-built outbound request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: Url,
    pub method: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response: status, body text and headers.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
}

/// Performs a single HTTP exchange.
pub trait HttpTransport: Send + Sync {
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport.
///
/// The local client serves a self-signed certificate on loopback, so
/// certificate validation is disabled.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .map_err(TransportError::Build)?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = Method::from_str(&request.method)
            .map_err(|_| TransportError::InvalidMethod(request.method.clone()))?;

        debug!("{} {}", method, request.url);

        let mut builder = self.client.request(method, request.url);
        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(TransportError::Request)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(key, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (key.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(TransportError::Request)?;

        Ok(HttpResponse {
            status,
            body,
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), "Basic abc".to_string());
        let request = HttpRequest {
            url: Url::parse("https://127.0.0.1:1/help").unwrap(),
            method: "GET".to_string(),
            headers,
            body: None,
        };
        assert_eq!(request.header("authorization"), Some("Basic abc"));
        assert_eq!(request.header("x-missing"), None);
    }

    #[tokio::test]
    async fn test_reqwest_transport_rejects_bad_method() {
        let transport = ReqwestTransport::new(Duration::from_secs(1)).unwrap();
        let request = HttpRequest {
            url: Url::parse("http://127.0.0.1:9/").unwrap(),
            method: "NOT A METHOD".to_string(),
            headers: HashMap::new(),
            body: None,
        };
        let err = transport.send(request).await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidMethod(m) if m == "NOT A METHOD"));
    }
}
