//! Client configuration

use std::path::PathBuf;

use crate::data::DEFAULT_THUMBNAIL_SIZE;
use crate::retailer::Retailer;

/// Seconds a cached response stays fresh unless configured otherwise
pub const DEFAULT_CACHE_EXPIRE_AFTER: u64 = 10;

/// Settings fixed at client construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Shop to query
    pub retailer: Retailer,
    /// Lifetime of cached responses in seconds
    pub cache_expire_after: u64,
    /// Cache location; `None` uses the platform cache directory
    pub cache_dir: Option<PathBuf>,
    /// Whether responses are cached at all
    pub use_cache: bool,
    /// Edge length of thumbnail URLs on mapped postings
    pub thumbnail_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            retailer: Retailer::default(),
            cache_expire_after: DEFAULT_CACHE_EXPIRE_AFTER,
            cache_dir: None,
            use_cache: true,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl ClientConfig {
    pub fn new(retailer: Retailer, cache_expire_after: u64) -> Self {
        Self {
            retailer,
            cache_expire_after,
            ..Self::default()
        }
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.use_cache = false;
        self
    }

    pub fn with_thumbnail_size(mut self, size: u32) -> Self {
        self.thumbnail_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.retailer, Retailer::MediaMarkt);
        assert_eq!(config.cache_expire_after, 10);
        assert!(config.cache_dir.is_none());
        assert!(config.use_cache);
        assert_eq!(config.thumbnail_size, 200);
    }

    #[test]
    fn test_client_config_builders() {
        let config = ClientConfig::new(Retailer::Saturn, 60)
            .with_cache_dir("/tmp/fundgrube-test")
            .with_thumbnail_size(64)
            .without_cache();
        assert_eq!(config.retailer, Retailer::Saturn);
        assert_eq!(config.cache_expire_after, 60);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/fundgrube-test")));
        assert_eq!(config.thumbnail_size, 64);
        assert!(!config.use_cache);
    }
}
