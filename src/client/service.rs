//! Endpoint-bound client

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{PageResult, Transport};
use async_trait::async_trait;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Status codes accepted for a page fetch
const PAGE_OK_CODES: &[u16] = &[200, 203];

/// Client for one service endpoint
///
/// Cheap to clone; the underlying [`HttpClient`] (connection pool, rate
/// limiter, token cache) is shared.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: Arc<HttpClient>,
    endpoint: Url,
}

impl ServiceClient {
    /// Bind `http` to `endpoint`
    ///
    /// The endpoint is normalized to end in `/` so paths join beneath it.
    pub fn new(http: Arc<HttpClient>, endpoint: &str) -> Result<Self> {
        let trimmed = endpoint.trim();
        if trimmed.is_empty() {
            return Err(Error::config("service endpoint is empty"));
        }

        let mut endpoint = Url::parse(trimmed)?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::config(format!("service endpoint {trimmed} is not a base URL")));
        }
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }

        Ok(Self { http, endpoint })
    }

    /// Service endpoint, always ending in `/`
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Shared HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// URL of `parts` joined beneath the endpoint
    ///
    /// Each part is one path segment and is percent-encoded, so an id
    /// containing `/`, `?` or `#` cannot address a different resource.
    /// Empty parts are skipped.
    ///
    /// ```rust,ignore
    /// client.service_url(&["instances", "i1", "databases"])
    /// // => https://db.example.com/v1.0/1234/instances/i1/databases
    /// ```
    pub fn service_url(&self, parts: &[&str]) -> String {
        let mut url = self.endpoint.clone();
        // `new` only accepts endpoints that can be a base
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(parts.iter().filter(|part| !part.is_empty()));
        }
        url.to_string()
    }

    // ========================================================================
    // Single-resource requests
    // ========================================================================

    /// GET `url` and decode the body
    pub async fn get<T: DeserializeOwned>(&self, url: &str, ok_codes: &[u16]) -> Result<T> {
        let response = self
            .http
            .get_with_config(url, RequestConfig::new().ok_codes(ok_codes))
            .await?;
        decode_body(response).await
    }

    /// POST `body` to `url` and decode the response
    pub async fn post<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
        ok_codes: &[u16],
    ) -> Result<T> {
        let response = self
            .http
            .post_with_config(url, RequestConfig::new().json(body).ok_codes(ok_codes))
            .await?;
        decode_body(response).await
    }

    /// POST `body` to `url`, ignoring any response body
    pub async fn post_no_content(&self, url: &str, body: Value, ok_codes: &[u16]) -> Result<()> {
        self.http
            .post_with_config(url, RequestConfig::new().json(body).ok_codes(ok_codes))
            .await?;
        Ok(())
    }

    /// PUT `body` to `url` and decode the response
    pub async fn put<T: DeserializeOwned>(
        &self,
        url: &str,
        body: Value,
        ok_codes: &[u16],
    ) -> Result<T> {
        let response = self
            .http
            .put_with_config(url, RequestConfig::new().json(body).ok_codes(ok_codes))
            .await?;
        decode_body(response).await
    }

    /// DELETE `url`
    pub async fn delete(&self, url: &str, ok_codes: &[u16]) -> Result<()> {
        self.http
            .delete_with_config(url, RequestConfig::new().ok_codes(ok_codes))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Transport for ServiceClient {
    async fn get_page(&self, url: &str) -> Result<PageResult> {
        let response = self
            .http
            .request(Method::GET, url, RequestConfig::new().ok_codes(PAGE_OK_CODES))
            .await?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();
        let raw = response.text().await?;

        debug!(url = %final_url, status, bytes = raw.len(), "Fetched page");
        PageResult::from_body(final_url, status, &raw)
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let url = response.url().clone();
    let raw = response.text().await?;
    serde_json::from_str(&raw).map_err(|e| Error::decode(format!("response from {url}: {e}")))
}
