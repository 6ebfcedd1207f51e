//! Fundgrube API client
//!
//! Ties together query building, cached fetching and response mapping. One
//! client talks to one retailer. Pagination is left to the caller: request a
//! page, and if `more_available` is set, ask again with the next offset.

use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::config::ClientConfig;
use crate::data::{map_facets, map_postings, Brand, Category, Facet, MappingError, Outlet, Posting};
use crate::fetch::{CachedFetcher, FetchError, FetchedPage, ReqwestTransport, Transport};
use crate::query::PostingsQuery;
use crate::retailer::Retailer;

/// Errors that can occur when querying Fundgrube
#[derive(Debug, Error)]
pub enum FundgrubeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The response did not have the expected shape
    #[error("Unexpected response shape: {0}")]
    Mapping(#[from] MappingError),
}

/// A page of postings
#[derive(Debug, Clone, PartialEq)]
pub struct PostingsPage {
    /// Postings in server order
    pub postings: Vec<Posting>,
    /// Whether a higher offset would return more postings
    pub more_available: bool,
    /// URL the page was requested from
    pub url: String,
}

/// Client for one retailer's Fundgrube
#[derive(Debug, Clone)]
pub struct Fundgrube {
    retailer: Retailer,
    base_url: String,
    thumbnail_size: u32,
    fetcher: CachedFetcher,
}

impl Default for Fundgrube {
    fn default() -> Self {
        Self::new(Retailer::default(), crate::config::DEFAULT_CACHE_EXPIRE_AFTER)
    }
}

impl Fundgrube {
    /// Creates a client with the platform cache directory
    ///
    /// # Arguments
    /// * `retailer` - Shop to query
    /// * `cache_expire_after` - Seconds a cached response stays fresh
    pub fn new(retailer: Retailer, cache_expire_after: u64) -> Self {
        Self::with_config(ClientConfig::new(retailer, cache_expire_after))
    }

    /// Creates a client from a full configuration
    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_transport(config, Arc::new(ReqwestTransport::new()))
    }

    /// Creates a client that sends its requests through `transport`
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let cache = if config.use_cache {
            match config.cache_dir {
                Some(dir) => Some(CacheManager::with_dir(dir)),
                None => CacheManager::new(),
            }
        } else {
            None
        };

        if let Some(ref cache) = cache {
            debug!("caching responses in {}", cache.dir().display());
        }

        Self {
            retailer: config.retailer,
            base_url: config.retailer.api_base_url(),
            thumbnail_size: config.thumbnail_size,
            fetcher: CachedFetcher::new(transport, cache, config.cache_expire_after),
        }
    }

    pub fn retailer(&self) -> Retailer {
        self.retailer
    }

    /// Fetches one page of postings matching `query`
    ///
    /// # Returns
    /// * `Ok(PostingsPage)` - postings, continuation flag and request URL; an
    ///   empty page with `more_available = false` if the server did not answer
    ///   with 200
    /// * `Err(FundgrubeError)` - if the body is not JSON or a posting lacks a
    ///   required field
    pub async fn postings(&self, query: &PostingsQuery) -> Result<PostingsPage, FundgrubeError> {
        let page = self.fetch(query).await?;
        let postings = map_postings(self.retailer, &page.body, self.thumbnail_size)?;

        Ok(PostingsPage {
            postings,
            more_available: page.more_available,
            url: page.url,
        })
    }

    /// Categories with their posting counts
    pub async fn categories(&self) -> Result<Vec<Category>, FundgrubeError> {
        self.facets().await
    }

    /// Brands with their posting counts
    pub async fn brands(&self) -> Result<Vec<Brand>, FundgrubeError> {
        self.facets().await
    }

    /// Outlets with their posting counts
    pub async fn outlets(&self) -> Result<Vec<Outlet>, FundgrubeError> {
        self.facets().await
    }

    /// First outlet whose name is exactly `name`
    pub async fn outlet(&self, name: &str) -> Result<Option<Outlet>, FundgrubeError> {
        let outlets = self.outlets().await?;
        Ok(outlets.into_iter().find(|outlet| outlet.name == name))
    }

    /// Facet lists ride along with every postings response; the smallest
    /// default query is enough to get them
    async fn facets<T: Facet>(&self) -> Result<Vec<T>, FundgrubeError> {
        let page = self.fetch(&PostingsQuery::new()).await?;
        Ok(map_facets(&page.body)?)
    }

    async fn fetch(&self, query: &PostingsQuery) -> Result<FetchedPage, FetchError> {
        self.fetcher.fetch(&query.to_url(&self.base_url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpResponse;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every request with the same JSON body and remembers the URLs
    #[derive(Debug)]
    struct StaticTransport {
        body: String,
        urls: Mutex<Vec<String>>,
    }

    impl StaticTransport {
        fn new(body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                body: body.to_string(),
                urls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for StaticTransport {
        async fn get(
            &self,
            url: &str,
            _headers: &[(&str, &str)],
        ) -> Result<HttpResponse, FetchError> {
            self.urls.lock().unwrap().push(url.to_string());
            Ok(HttpResponse {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    fn uncached(retailer: Retailer) -> ClientConfig {
        ClientConfig::new(retailer, 10).without_cache()
    }

    fn facet_body() -> serde_json::Value {
        json!({
            "postings": [],
            "categories": [{ "id": "CAT_DE_MM_115", "name": "TV & Audio", "count": 5 }],
            "brands": [{ "id": 11, "name": "APPLE", "count": 3 }],
            "outlets": [
                { "id": 1, "name": "Bonn", "count": 4 },
                { "id": 2, "name": "Berlin", "count": 1 },
                { "id": 3, "name": "Bonn", "count": 9 }
            ]
        })
    }

    #[test]
    fn test_default_client() {
        let client = Fundgrube::default();
        assert_eq!(client.retailer(), Retailer::MediaMarkt);
        assert_eq!(client.fetcher.expire_after_secs(), 10);
    }

    #[tokio::test]
    async fn test_facets_use_default_query() {
        let transport = StaticTransport::new(facet_body());
        let client = Fundgrube::with_transport(uncached(Retailer::Saturn), transport.clone());

        let categories = client.categories().await.unwrap();
        let brands = client.brands().await.unwrap();

        assert_eq!(categories.len(), 1);
        assert_eq!(brands[0].name, "APPLE");
        let urls = transport.urls.lock().unwrap();
        assert!(urls
            .iter()
            .all(|url| url == "https://www.saturn.de/de/data/fundgrube/api/postings?limit=1&offset=0"));
    }

    #[tokio::test]
    async fn test_outlet_returns_first_exact_match() {
        let client = Fundgrube::with_transport(uncached(Retailer::MediaMarkt), StaticTransport::new(facet_body()));

        let outlet = client.outlet("Bonn").await.unwrap().expect("Bonn should exist");

        assert_eq!(outlet.id, 1);
        assert_eq!(outlet.count, 4);
    }

    #[tokio::test]
    async fn test_outlet_requires_exact_name() {
        let client = Fundgrube::with_transport(uncached(Retailer::MediaMarkt), StaticTransport::new(facet_body()));

        assert!(client.outlet("bonn").await.unwrap().is_none());
        assert!(client.outlet("Bon").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_outlet_on_empty_list_is_none() {
        let client = Fundgrube::with_transport(uncached(Retailer::MediaMarkt), StaticTransport::new(json!({})));

        assert!(client.outlet("Bonn").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_postings_uses_query_url() {
        let transport = StaticTransport::new(json!({ "postings": [] }));
        let client = Fundgrube::with_transport(uncached(Retailer::MediaMarkt), transport.clone());

        let page = client
            .postings(&PostingsQuery::new().limit(500).offset(99).search("iPhone SE"))
            .await
            .unwrap();

        assert!(page.postings.is_empty());
        assert!(!page.more_available);
        assert_eq!(
            page.url,
            "https://www.mediamarkt.de/de/data/fundgrube/api/postings?limit=99&offset=99&text=iPhone+SE"
        );
        assert_eq!(transport.urls.lock().unwrap()[0], page.url);
    }

    #[tokio::test]
    async fn test_malformed_posting_is_an_error() {
        let client = Fundgrube::with_transport(
            uncached(Retailer::MediaMarkt),
            StaticTransport::new(json!({ "postings": [{ "posting_id": "x" }] })),
        );

        let result = client.postings(&PostingsQuery::new()).await;

        assert!(matches!(result, Err(FundgrubeError::Mapping(_))));
    }
}
