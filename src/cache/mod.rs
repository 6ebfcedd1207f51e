//! Cache module for storing API responses to disk
//!
//! This module provides a cache manager that persists API responses to the filesystem
//! with a configurable TTL (time-to-live) in seconds. Entries past their TTL are
//! reported as expired and the fetcher treats them as a miss.

mod manager;

pub use manager::{CacheManager, CachedData};
