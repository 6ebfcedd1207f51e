//! Postings query construction
//!
//! The Fundgrube endpoint takes its filters as query parameters in a fixed
//! order. The order matters: the URL doubles as the response cache key.

/// Largest page size the API accepts
pub const MAX_LIMIT: u32 = 99;

/// Page size used when the caller does not set one
pub const DEFAULT_LIMIT: u32 = 1;

/// Encoded list separator (`,`)
const LIST_SEPARATOR: &str = "%2C";

/// Filters and pagination for one postings request
///
/// ```
/// use fundgrube::PostingsQuery;
///
/// let query = PostingsQuery::new()
///     .limit(4)
///     .brands(["APPLE", "CASIO"])
///     .search("iPhone SE");
/// assert_eq!(
///     query.to_url("https://www.mediamarkt.de/de/data/fundgrube/api/"),
///     "https://www.mediamarkt.de/de/data/fundgrube/api/postings?limit=4&offset=0&brands=APPLE%2CCASIO&text=iPhone+SE"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingsQuery {
    limit: u32,
    offset: u32,
    outlet_ids: Vec<i64>,
    category_ids: Vec<String>,
    brands: Vec<String>,
    search: Option<String>,
}

impl Default for PostingsQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl PostingsQuery {
    /// First page, one posting, no filters
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            outlet_ids: Vec::new(),
            category_ids: Vec::new(),
            brands: Vec::new(),
            search: None,
        }
    }

    /// Page size; values above [`MAX_LIMIT`] are clamped
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit.min(MAX_LIMIT);
        self
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn outlet_ids(mut self, outlet_ids: impl IntoIterator<Item = i64>) -> Self {
        self.outlet_ids = outlet_ids.into_iter().collect();
        self
    }

    pub fn category_ids<S: Into<String>>(mut self, category_ids: impl IntoIterator<Item = S>) -> Self {
        self.category_ids = category_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn brands<S: Into<String>>(mut self, brands: impl IntoIterator<Item = S>) -> Self {
        self.brands = brands.into_iter().map(Into::into).collect();
        self
    }

    /// Free-text search
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Effective page size after clamping
    pub fn page_size(&self) -> u32 {
        self.limit
    }

    pub fn page_offset(&self) -> u32 {
        self.offset
    }

    /// Same filters, next page
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.offset = self.offset.saturating_add(self.limit);
        next
    }

    /// Builds the request URL below `base_url`
    ///
    /// Parameters always appear as `limit, offset, outletIds, brands,
    /// categorieIds, text`. Empty filters are left out. Spaces in brands and
    /// search text become `+`; no other escaping is applied.
    pub fn to_url(&self, base_url: &str) -> String {
        let mut url = format!(
            "{}postings?limit={}&offset={}",
            base_url, self.limit, self.offset
        );

        if !self.outlet_ids.is_empty() {
            let ids: Vec<String> = self.outlet_ids.iter().map(i64::to_string).collect();
            url.push_str("&outletIds=");
            url.push_str(&ids.join(LIST_SEPARATOR));
        }

        if !self.brands.is_empty() {
            url.push_str("&brands=");
            url.push_str(&plus_spaces(&self.brands.join(LIST_SEPARATOR)));
        }

        // "categorieIds" is the name the API expects
        if !self.category_ids.is_empty() {
            url.push_str("&categorieIds=");
            url.push_str(&self.category_ids.join(LIST_SEPARATOR));
        }

        if let Some(search) = &self.search {
            url.push_str("&text=");
            url.push_str(&plus_spaces(search));
        }

        url
    }
}

fn plus_spaces(value: &str) -> String {
    value.replace(' ', "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.mediamarkt.de/de/data/fundgrube/api/";

    #[test]
    fn test_default_query() {
        assert_eq!(
            PostingsQuery::new().to_url(BASE),
            "https://www.mediamarkt.de/de/data/fundgrube/api/postings?limit=1&offset=0"
        );
    }

    #[test]
    fn test_limit_is_clamped_to_99() {
        for limit in [100, 150, 1000, u32::MAX] {
            let query = PostingsQuery::new().limit(limit);
            assert_eq!(query.page_size(), MAX_LIMIT);
            assert!(query.to_url(BASE).contains("limit=99&"));
        }
    }

    #[test]
    fn test_limit_has_no_lower_clamp() {
        let query = PostingsQuery::new().limit(0);
        assert_eq!(query.page_size(), 0);
        assert!(query.to_url(BASE).contains("?limit=0&offset=0"));
    }

    #[test]
    fn test_parameter_order_is_fixed() {
        let url = PostingsQuery::new()
            .search("x y")
            .brands(["A B"])
            .outlet_ids([1, 2])
            .limit(10)
            .offset(20)
            .to_url(BASE);

        assert_eq!(
            url,
            format!("{}postings?limit=10&offset=20&outletIds=1%2C2&brands=A+B&text=x+y", BASE)
        );
    }

    #[test]
    fn test_all_filters() {
        let url = PostingsQuery::new()
            .limit(4)
            .outlet_ids([418])
            .brands(["APPLE", "BANG & OLUFSEN"])
            .category_ids(["CAT_DE_MM_115", "CAT_DE_MM_8000"])
            .search("iPhone SE")
            .to_url(BASE);

        assert_eq!(
            url,
            format!(
                "{}postings?limit=4&offset=0&outletIds=418&brands=APPLE%2CBANG+&+OLUFSEN&categorieIds=CAT_DE_MM_115%2CCAT_DE_MM_8000&text=iPhone+SE",
                BASE
            )
        );
    }

    #[test]
    fn test_empty_filters_are_omitted() {
        let url = PostingsQuery::new()
            .outlet_ids(Vec::new())
            .brands(Vec::<String>::new())
            .category_ids(Vec::<String>::new())
            .to_url(BASE);

        assert!(!url.contains("outletIds"));
        assert!(!url.contains("brands"));
        assert!(!url.contains("categorieIds"));
        assert!(!url.contains("text"));
    }

    #[test]
    fn test_empty_search_is_still_sent() {
        let url = PostingsQuery::new().search("").to_url(BASE);
        assert!(url.ends_with("&text="));
    }

    #[test]
    fn test_next_page_advances_by_limit() {
        let query = PostingsQuery::new().limit(99).search("APPLE");
        let next = query.next_page();

        assert_eq!(next.page_offset(), 99);
        assert_eq!(next.next_page().page_offset(), 198);
        assert!(next.to_url(BASE).ends_with("&text=APPLE"));
    }
}
