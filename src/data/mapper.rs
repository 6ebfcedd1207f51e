//! Conversion of raw API JSON into typed records
//!
//! Required fields are extracted one by one and a missing or mistyped field
//! fails the whole mapping. The two price fields are the exception: the API
//! sometimes sends placeholders there, so they fall back to `None`.

use serde_json::Value;
use thiserror::Error;

use super::{thumbnail_url, Facet, Posting};
use crate::retailer::Retailer;

/// Envelope key of the posting list
const POSTINGS_KEY: &str = "postings";

/// Envelope key of the continuation flag
const MORE_AVAILABLE_KEY: &str = "morePostingsAvailable";

/// Errors raised while mapping a response item
#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    /// A required field is absent
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A required field is present but has the wrong type
    #[error("Invalid value for field {field}: expected {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// Identifier types that facet records can be built from
pub trait FacetId: Sized {
    /// Human-readable type name for error messages
    const EXPECTED: &'static str;

    fn from_json(value: &Value) -> Option<Self>;
}

impl FacetId for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FacetId for String {
    const EXPECTED: &'static str = "string or number";

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Reads the continuation flag, `false` when absent or not a boolean
pub fn more_postings_available(body: &Value) -> bool {
    body.get(MORE_AVAILABLE_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Maps every item of the envelope's posting list
pub fn map_postings(
    retailer: Retailer,
    body: &Value,
    thumbnail_size: u32,
) -> Result<Vec<Posting>, MappingError> {
    list_at(body, POSTINGS_KEY)?
        .iter()
        .map(|item| map_posting(retailer, item, thumbnail_size))
        .collect()
}

/// Maps a single posting item
pub fn map_posting(
    retailer: Retailer,
    item: &Value,
    thumbnail_size: u32,
) -> Result<Posting, MappingError> {
    let product_id = required_id(item, "pim_id")?;
    let image_urls = required_string_list(item, "original_url")?;

    Ok(Posting {
        retailer,
        id: required_id(item, "posting_id")?,
        category_id: required_id(item, "top_level_catalog_id")?,
        name: required_str(item, "name")?,
        text: required_str(item, "posting_text")?,
        brand_id: required_int(item, "brand.id")?,
        brand: required_str(item, "brand.name")?,
        outlet_id: required_int(item, "outlet.id")?,
        outlet: required_str(item, "outlet.name")?,
        price: coerce_price(item.get("price")),
        price_old: coerce_price(item.get("price_old")),
        discount: required_number(item, "discount_in_percent")?,
        shipping_cost: required_number(item, "shipping_cost")?,
        shipping_type: required_str(item, "shipping_type")?,
        thumbnail_url: thumbnail_url(&image_urls, thumbnail_size),
        product_url: retailer.product_url(&product_id),
        product_id,
        image_urls,
    })
}

/// Maps the facet list that belongs to `T`
///
/// Only `id`, `name` and `count` are read; any other key on the item is
/// ignored.
pub fn map_facets<T: Facet>(body: &Value) -> Result<Vec<T>, MappingError> {
    list_at(body, T::ENVELOPE_KEY)?
        .iter()
        .map(|item| -> Result<T, MappingError> {
            let id = field(item, "id")?;
            let id = T::Id::from_json(id).ok_or_else(|| invalid("id", T::Id::EXPECTED))?;
            let name = required_str(item, "name")?;
            let count = field(item, "count")?
                .as_u64()
                .ok_or_else(|| invalid("count", "non-negative integer"))?;
            Ok(T::from_parts(id, name, count))
        })
        .collect()
}

/// Lenient float conversion for price fields
///
/// Accepts JSON numbers and numeric strings; anything else is `None`.
pub fn coerce_price(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Envelope list at `key`; absent or null counts as empty
fn list_at<'a>(body: &'a Value, key: &str) -> Result<&'a [Value], MappingError> {
    match body.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(invalid(key, "array")),
    }
}

/// Looks up a dotted path such as `brand.id`
fn field<'a>(item: &'a Value, path: &str) -> Result<&'a Value, MappingError> {
    path.split('.')
        .try_fold(item, |value, key| value.get(key))
        .ok_or_else(|| MappingError::MissingField(path.to_string()))
}

fn invalid(path: &str, expected: &'static str) -> MappingError {
    MappingError::InvalidField {
        field: path.to_string(),
        expected,
    }
}

fn required_str(item: &Value, path: &str) -> Result<String, MappingError> {
    field(item, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(path, "string"))
}

fn required_id(item: &Value, path: &str) -> Result<String, MappingError> {
    String::from_json(field(item, path)?).ok_or_else(|| invalid(path, String::EXPECTED))
}

fn required_int(item: &Value, path: &str) -> Result<i64, MappingError> {
    i64::from_json(field(item, path)?).ok_or_else(|| invalid(path, i64::EXPECTED))
}

fn required_number(item: &Value, path: &str) -> Result<f64, MappingError> {
    coerce_price(Some(field(item, path)?)).ok_or_else(|| invalid(path, "number"))
}

fn required_string_list(item: &Value, path: &str) -> Result<Vec<String>, MappingError> {
    field(item, path)?
        .as_array()
        .ok_or_else(|| invalid(path, "array of strings"))?
        .iter()
        .map(|url| {
            url.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid(path, "array of strings"))
        })
        .collect()
}
