//! Command-line interface parsing for the Fundgrube client
//!
//! Global flags select the retailer and cache behaviour; each subcommand maps
//! to one client operation, plus the cross-retailer discount report.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;

use crate::config::{ClientConfig, DEFAULT_CACHE_EXPIRE_AFTER};
use crate::query::{PostingsQuery, DEFAULT_LIMIT, MAX_LIMIT};
use crate::report::Pacing;
use crate::retailer::Retailer;

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified retailer name is not recognized
    #[error("Invalid retailer: '{0}'. Valid retailers: mediamarkt, saturn")]
    InvalidRetailer(String),

    /// `--outlet` named an outlet the API does not list
    #[error("No outlet named '{0}'")]
    OutletNotFound(String),
}

/// Browse the MediaMarkt and SATURN Fundgrube clearance listings
#[derive(Parser, Debug)]
#[command(name = "fundgrube")]
#[command(about = "MediaMarkt and SATURN Fundgrube clearance listings")]
#[command(version)]
pub struct Cli {
    /// Retailer to query (mediamarkt or saturn)
    #[arg(long, global = true, default_value = "mediamarkt", value_parser = parse_retailer_arg)]
    pub retailer: Retailer,

    /// Seconds a cached response stays fresh
    #[arg(long, global = true, value_name = "SECONDS", default_value_t = DEFAULT_CACHE_EXPIRE_AFTER)]
    pub cache_ttl: u64,

    /// Directory for cached responses (defaults to the platform cache dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Always go to the network
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List categories with posting counts
    Categories,
    /// List brands with posting counts
    Brands {
        /// Only show the first N brands
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// List outlets with posting counts
    Outlets {
        /// Only show the first N outlets
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// Look up a single outlet by its exact name
    Outlet {
        name: String,
    },
    /// Fetch one page of postings
    Postings(PostingsArgs),
    /// Collect postings from both retailers and summarize discounts
    Discounts(DiscountsArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct PostingsArgs {
    /// Page size (at most 99)
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,

    #[arg(long, default_value_t = 0)]
    pub offset: u32,

    /// Filter by outlet id (repeatable)
    #[arg(long = "outlet-id", value_name = "ID")]
    pub outlet_ids: Vec<i64>,

    /// Filter by outlet name, resolved through the outlet list
    #[arg(long, value_name = "NAME")]
    pub outlet: Option<String>,

    /// Filter by category id, e.g. CAT_DE_MM_115 (repeatable)
    #[arg(long = "category", value_name = "ID")]
    pub category_ids: Vec<String>,

    /// Filter by brand name (repeatable)
    #[arg(long = "brand", value_name = "NAME")]
    pub brands: Vec<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DiscountsArgs {
    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Only list postings discounted at least this much (percent)
    #[arg(long, default_value_t = 50.0)]
    pub min_discount: f64,

    /// Page size per request
    #[arg(long, default_value_t = MAX_LIMIT)]
    pub limit: u32,

    /// Pause after this many rounds of requests
    #[arg(long, value_name = "ROUNDS", default_value_t = 4)]
    pub pause_every: u32,

    /// Length of each pause
    #[arg(long, value_name = "SECONDS", default_value_t = 2)]
    pub pause_secs: u64,
}

/// Parses a retailer string argument into a Retailer.
///
/// # Returns
/// * `Ok(Retailer)` if the string names a supported retailer
/// * `Err(CliError::InvalidRetailer)` otherwise
pub fn parse_retailer_arg(s: &str) -> Result<Retailer, CliError> {
    s.parse().map_err(CliError::InvalidRetailer)
}

impl Cli {
    /// Client configuration for the retailer given on the command line
    pub fn client_config(&self) -> ClientConfig {
        self.client_config_for(self.retailer)
    }

    /// Client configuration for an explicit retailer, same cache settings
    pub fn client_config_for(&self, retailer: Retailer) -> ClientConfig {
        let mut config = ClientConfig::new(retailer, self.cache_ttl);
        if let Some(dir) = &self.cache_dir {
            config = config.with_cache_dir(dir.clone());
        }
        if self.no_cache {
            config = config.without_cache();
        }
        config
    }
}

impl PostingsArgs {
    /// Query for these arguments; `outlet_ids` are used in addition to the
    /// ones given on the command line
    pub fn to_query(&self, outlet_ids: &[i64]) -> PostingsQuery {
        let mut query = PostingsQuery::new()
            .limit(self.limit)
            .offset(self.offset)
            .outlet_ids(self.outlet_ids.iter().chain(outlet_ids).copied())
            .category_ids(self.category_ids.iter().cloned())
            .brands(self.brands.iter().cloned());
        if let Some(search) = &self.search {
            query = query.search(search.clone());
        }
        query
    }
}

impl DiscountsArgs {
    pub fn to_query(&self) -> PostingsQuery {
        let query = PostingsQuery::new().limit(self.limit);
        match &self.search {
            Some(search) => query.search(search.clone()),
            None => query,
        }
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            every: self.pause_every,
            pause: Duration::from_secs(self.pause_secs),
        }
    }
}
