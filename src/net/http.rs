//! HTTP polling of device endpoints.
//!
//! The appliances speak plain HTTP on fixed ports, usually guarded by a
//! static basic-auth token. Every fetch has a short timeout and collapses
//! any failure to `None`; callers treat a missing body as "endpoint did
//! not answer".

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Method};
use std::time::Duration;
use tracing::debug;

/// Default authorization token accepted by the VPC-series web interfaces.
const DEFAULT_AUTH: &str = "Basic cm9vdDp2aXBlcg==";

/// Shared HTTP client for probe and collection requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// GET with the default device authorization header.
    pub async fn get(&self, address: &str, port: u16, uri: &str) -> Option<String> {
        self.request(Method::GET, address, port, uri, &[(AUTHORIZATION.as_str(), DEFAULT_AUTH)])
            .await
    }

    /// GET with caller-supplied headers (device-specific credentials or
    /// session cookies).
    pub async fn get_with_headers(
        &self,
        address: &str,
        port: u16,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> Option<String> {
        self.request(Method::GET, address, port, uri, headers).await
    }

    /// POST with an empty body; some devices hand out session tokens
    /// this way.
    pub async fn post(&self, address: &str, port: u16, uri: &str) -> Option<String> {
        self.request(Method::POST, address, port, uri, &[]).await
    }

    async fn request(
        &self,
        method: Method,
        address: &str,
        port: u16,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> Option<String> {
        let url = format!("http://{}:{}{}", address, port, uri);
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
            let value = HeaderValue::from_str(value).ok()?;
            header_map.insert(name, value);
        }

        let result = self
            .client
            .request(method.clone(), &url)
            .headers(header_map)
            .send()
            .await;

        match result {
            Ok(response) => match response.text().await {
                Ok(body) => Some(body),
                Err(err) => {
                    debug!(%url, %err, "could not read response body");
                    None
                }
            },
            Err(err) => {
                debug!(%url, %method, %err, "http request failed");
                None
            }
        }
    }
}
