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

const CATALOG: &[CatalogEntry] = &[CatalogEntry {
    needle: "boat airdopes 311 pro",
    title: "boAt Airdopes 311 Pro True Wireless Earbuds",
    url: "https://www.flipkart.com/boat-airdopes-311-pro/p/itm123456",
    price: "999",
}];

/// Static-catalog connector for Flipkart India; same seam as the Walmart
/// connector.
pub struct FlipkartConnector;

#[async_trait]
impl SiteConnector for FlipkartConnector {
    fn site(&self) -> Site {
        Site::Flipkart
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>> {
        info!(%query, "serving Flipkart results from the static catalog");
        let lowered = query.to_lowercase();
        Ok(CATALOG
            .iter()
            .find(|entry| lowered.contains(entry.needle))
            .map(|entry| Listing {
                title: entry.title.to_string(),
                url: entry.url.to_string(),
                price: entry.price.to_string(),
                currency: Currency::Inr,
            })
            .into_iter()
            .collect())
    }
}
