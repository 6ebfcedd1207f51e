//! Retailer selection
//!
//! Fundgrube is run by both MediaMarkt and SATURN. The two shops expose the
//! same API under different hostnames, so a retailer is nothing more than a
//! slug and a display name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which shop the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Retailer {
    #[default]
    MediaMarkt,
    Saturn,
}

/// (variant, URL slug, display name)
const RETAILERS: [(Retailer, &str, &str); 2] = [
    (Retailer::MediaMarkt, "mediamarkt", "MediaMarkt"),
    (Retailer::Saturn, "saturn", "SATURN"),
];

impl Retailer {
    /// All supported retailers, in a stable order
    pub fn all() -> [Retailer; 2] {
        [Retailer::MediaMarkt, Retailer::Saturn]
    }

    fn entry(self) -> (Retailer, &'static str, &'static str) {
        match self {
            Retailer::MediaMarkt => RETAILERS[0],
            Retailer::Saturn => RETAILERS[1],
        }
    }

    /// Lowercase hostname segment, e.g. `mediamarkt`
    pub fn slug(self) -> &'static str {
        self.entry().1
    }

    /// Name as the shop writes it, e.g. `SATURN`
    pub fn display_name(self) -> &'static str {
        self.entry().2
    }

    /// Base URL of the Fundgrube API, ending in a slash
    pub fn api_base_url(self) -> String {
        format!("https://www.{}.de/de/data/fundgrube/api/", self.slug())
    }

    /// Public product page for a product id
    pub fn product_url(self, product_id: &str) -> String {
        format!("https://www.{}.de/de/product/_-{}.html", self.slug(), product_id)
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Retailer {
    type Err = String;

    /// Accepts the slug or the display name, ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        RETAILERS
            .iter()
            .find(|(_, slug, name)| *slug == needle || name.to_lowercase() == needle)
            .map(|(retailer, _, _)| *retailer)
            .ok_or_else(|| s.to_string())
    }
}
