//! Record types returned by the Fundgrube API
//!
//! Every response envelope carries a page of postings plus three facet lists
//! (categories, brands and outlets). This module holds the typed shapes; the
//! conversion from raw JSON lives in [`mapper`].

pub mod mapper;

pub use mapper::{
    coerce_price, map_facets, map_posting, map_postings, more_postings_available, FacetId,
    MappingError,
};

use serde::{Deserialize, Serialize};

use crate::retailer::Retailer;

/// Edge length in pixels used for thumbnail URLs
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

/// One discounted product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Shop the posting was fetched from
    pub retailer: Retailer,
    /// Posting identifier (`posting_id`)
    pub id: String,
    /// Product identifier in the shop catalogue (`pim_id`)
    pub product_id: String,
    /// Top-level catalogue category (`top_level_catalog_id`)
    pub category_id: String,
    pub name: String,
    /// Free-text description written by the outlet
    pub text: String,
    pub image_urls: Vec<String>,
    pub brand_id: i64,
    pub brand: String,
    pub outlet_id: i64,
    pub outlet: String,
    /// Current price in EUR, `None` if the API sent something non-numeric
    pub price: Option<f64>,
    /// Regular price in EUR, `None` if the API sent something non-numeric
    pub price_old: Option<f64>,
    /// Discount in percent
    pub discount: f64,
    pub shipping_cost: f64,
    pub shipping_type: String,
    /// First image scaled to the thumbnail size, `None` without images
    pub thumbnail_url: Option<String>,
    /// Public product page on the retailer's shop
    pub product_url: String,
}

impl Posting {
    /// Thumbnail URL for a size other than the one chosen at mapping time
    pub fn thumbnail_url_sized(&self, size: u32) -> Option<String> {
        thumbnail_url(&self.image_urls, size)
    }
}

/// Builds `{first image}?x={size}&y={size}`
pub fn thumbnail_url(image_urls: &[String], size: u32) -> Option<String> {
    image_urls
        .first()
        .map(|url| format!("{}?x={}&y={}", url, size, size))
}

/// Common shape of the facet lists bundled with every postings response
///
/// Categories, brands and outlets all carry an id, a name and the number of
/// postings they match, but they are kept as separate types so one cannot be
/// passed where another is expected.
pub trait Facet: Sized {
    /// Identifier type as used by the matching postings filter
    type Id: FacetId;

    /// Key of the list inside the response envelope
    const ENVELOPE_KEY: &'static str;

    fn from_parts(id: Self::Id, name: String, count: u64) -> Self;

    fn name(&self) -> &str;

    fn count(&self) -> u64;
}

/// A product category, e.g. `CAT_DE_MM_115`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub count: u64,
}

/// A manufacturer brand
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub count: u64,
}

/// A physical store that submitted postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outlet {
    pub id: i64,
    pub name: String,
    pub count: u64,
}

impl Facet for Category {
    type Id = String;
    const ENVELOPE_KEY: &'static str = "categories";

    fn from_parts(id: String, name: String, count: u64) -> Self {
        Self { id, name, count }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Facet for Brand {
    type Id = i64;
    const ENVELOPE_KEY: &'static str = "brands";

    fn from_parts(id: i64, name: String, count: u64) -> Self {
        Self { id, name, count }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Facet for Outlet {
    type Id = i64;
    const ENVELOPE_KEY: &'static str = "outlets";

    fn from_parts(id: i64, name: String, count: u64) -> Self {
        Self { id, name, count }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_posting(image_urls: Vec<String>) -> Posting {
        Posting {
            retailer: Retailer::Saturn,
            id: "p-1".to_string(),
            product_id: "2712345".to_string(),
            category_id: "CAT_DE_SAT_786".to_string(),
            name: "Kopfhörer".to_string(),
            text: "Verpackung beschädigt".to_string(),
            thumbnail_url: thumbnail_url(&image_urls, DEFAULT_THUMBNAIL_SIZE),
            image_urls,
            brand_id: 7,
            brand: "SONY".to_string(),
            outlet_id: 418,
            outlet: "Bonn".to_string(),
            price: Some(79.0),
            price_old: Some(129.0),
            discount: 39.0,
            shipping_cost: 0.0,
            shipping_type: "pickup".to_string(),
            product_url: Retailer::Saturn.product_url("2712345"),
        }
    }

    #[test]
    fn test_thumbnail_url_uses_first_image() {
        let urls = vec![
            "https://assets.example/a.jpg".to_string(),
            "https://assets.example/b.jpg".to_string(),
        ];
        assert_eq!(
            thumbnail_url(&urls, 200).as_deref(),
            Some("https://assets.example/a.jpg?x=200&y=200")
        );
    }

    #[test]
    fn test_thumbnail_url_without_images_is_none() {
        assert!(thumbnail_url(&[], 200).is_none());
    }

    #[test]
    fn test_thumbnail_url_sized_recomputes() {
        let posting = sample_posting(vec!["https://assets.example/a.jpg".to_string()]);
        assert_eq!(
            posting.thumbnail_url.as_deref(),
            Some("https://assets.example/a.jpg?x=200&y=200")
        );
        assert_eq!(
            posting.thumbnail_url_sized(64).as_deref(),
            Some("https://assets.example/a.jpg?x=64&y=64")
        );
    }

    #[test]
    fn test_posting_product_url() {
        let posting = sample_posting(Vec::new());
        assert_eq!(
            posting.product_url,
            "https://www.saturn.de/de/product/_-2712345.html"
        );
    }

    #[test]
    fn test_facet_types_share_shape() {
        let category = Category::from_parts("CAT_DE_MM_115".to_string(), "TV".to_string(), 12);
        let brand = Brand::from_parts(3, "APPLE".to_string(), 40);
        let outlet = Outlet::from_parts(418, "Bonn".to_string(), 9);

        assert_eq!(category.name(), "TV");
        assert_eq!(brand.count(), 40);
        assert_eq!(outlet.id, 418);
        assert_eq!(Category::ENVELOPE_KEY, "categories");
        assert_eq!(Brand::ENVELOPE_KEY, "brands");
        assert_eq!(Outlet::ENVELOPE_KEY, "outlets");
    }

    #[test]
    fn test_posting_serialization_roundtrip() {
        let posting = sample_posting(vec!["https://assets.example/a.jpg".to_string()]);
        let json = serde_json::to_string(&posting).expect("Failed to serialize Posting");
        let back: Posting = serde_json::from_str(&json).expect("Failed to deserialize Posting");
        assert_eq!(back, posting);
    }
}
