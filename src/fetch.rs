//! HTTP fetching through the response cache
//!
//! Every request is a plain GET with two fixed headers. Successful responses
//! are stored on disk for the configured number of seconds and replayed from
//! there until they expire. Anything other than a 200 is reported as an empty
//! page rather than an error.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::data::more_postings_available;

/// Value of the `Accept` header
pub const ACCEPT: &str = "*/*";

/// Value of the `User-Agent` header
pub const USER_AGENT: &str = "Fundgrube/1.0 (https://github.com/haltepunkt/Fundgrube)";

/// Headers sent with every request, in order
pub const REQUEST_HEADERS: [(&str, &str); 2] = [("Accept", ACCEPT), ("User-Agent", USER_AGENT)];

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A 200 response carried something other than JSON
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and body of a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Anything that can perform a GET request
///
/// The client uses [`ReqwestTransport`]; tests plug in canned responses.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError>;
}

/// Transport backed by a shared `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured client, e.g. one with a proxy or timeout
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<HttpResponse, FetchError> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// One page of raw API output
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Parsed response body, `{}` when the request failed
    pub body: Value,
    /// Server-side `morePostingsAvailable`, `false` when absent
    pub more_available: bool,
    /// URL that was requested
    pub url: String,
}

impl FetchedPage {
    fn empty(url: &str) -> Self {
        Self {
            body: Value::Object(Default::default()),
            more_available: false,
            url: url.to_string(),
        }
    }

    fn from_body(body: Value, url: &str) -> Self {
        Self {
            more_available: more_postings_available(&body),
            body,
            url: url.to_string(),
        }
    }
}

/// What is stored per cache entry
#[derive(Debug, Serialize, Deserialize)]
struct CachedResponse {
    url: String,
    body: Value,
}

/// GETs pages through a time-expiring disk cache
#[derive(Debug, Clone)]
pub struct CachedFetcher {
    transport: Arc<dyn Transport>,
    cache: Option<CacheManager>,
    expire_after_secs: u64,
}

impl CachedFetcher {
    /// Creates a fetcher; `cache = None` sends every request to the network
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Option<CacheManager>,
        expire_after_secs: u64,
    ) -> Self {
        Self {
            transport,
            cache,
            expire_after_secs,
        }
    }

    pub fn expire_after_secs(&self) -> u64 {
        self.expire_after_secs
    }

    /// Cache key covering method, URL and headers
    fn cache_key(url: &str) -> String {
        let mut parts = vec!["GET", url];
        for (name, value) in REQUEST_HEADERS {
            parts.push(name);
            parts.push(value);
        }
        CacheManager::key_for(&parts)
    }

    /// Fetches `url`, serving it from the cache while the entry is fresh
    ///
    /// # Returns
    /// * `Ok(FetchedPage)` - parsed body and continuation flag; an empty page
    ///   if the server answered with anything but 200 or could not be reached
    /// * `Err(FetchError::Decode)` - if a 200 body is not valid JSON
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let cache_key = Self::cache_key(url);

        if let Some(ref cache) = self.cache {
            if let Some(cached) = cache.read_fresh::<CachedResponse>(&cache_key) {
                debug!("cache hit for {}", cached.url);
                return Ok(FetchedPage::from_body(cached.body, url));
            }
        }

        debug!("GET {}", url);
        let response = match self.transport.get(url, &REQUEST_HEADERS).await {
            Ok(response) => response,
            Err(e) => {
                warn!("request to {} failed: {}", url, e);
                return Ok(FetchedPage::empty(url));
            }
        };

        if response.status != 200 {
            warn!("{} answered with status {}", url, response.status);
            return Ok(FetchedPage::empty(url));
        }

        let body: Value = serde_json::from_str(&response.body)?;

        if let Some(ref cache) = self.cache {
            let entry = CachedResponse {
                url: url.to_string(),
                body,
            };
            if let Err(e) = cache.write(&cache_key, &entry, self.expire_after_secs) {
                warn!("could not cache response for {}: {}", url, e);
            }
            return Ok(FetchedPage::from_body(entry.body, url));
        }

        Ok(FetchedPage::from_body(body, url))
    }
}
