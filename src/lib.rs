//! Fundgrube client library
//!
//! Typed access to the MediaMarkt and SATURN "Fundgrube" clearance listings:
//! paginated postings queries, category/brand/outlet facets and a disk cache
//! with a per-client expiry.
//!
//! ```no_run
//! use fundgrube::{Fundgrube, PostingsQuery, Retailer};
//!
//! # async fn run() -> Result<(), fundgrube::FundgrubeError> {
//! let client = Fundgrube::new(Retailer::Saturn, 60);
//! let mut query = PostingsQuery::new().limit(99).search("iPhone");
//! loop {
//!     let page = client.postings(&query).await?;
//!     for posting in &page.postings {
//!         println!("{} {}", posting.brand, posting.name);
//!     }
//!     if !page.more_available {
//!         break;
//!     }
//!     query = query.next_page();
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod data;
pub mod fetch;
pub mod query;
pub mod report;
pub mod retailer;

pub use client::{Fundgrube, FundgrubeError, PostingsPage};
pub use config::ClientConfig;
pub use data::{Brand, Category, Facet, MappingError, Outlet, Posting};
pub use fetch::{FetchError, HttpResponse, Transport};
pub use query::PostingsQuery;
pub use retailer::Retailer;
