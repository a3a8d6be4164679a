use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use super::{SiteConnector, extract};
use crate::fetch::FetchClient;
use crate::models::{Currency, Listing, Site};
use crate::utils::error::Result;

const BASE_URL: &str = "https://www.amazon.in";
// Amazon India markup drifts more than the US storefront, so the block
// chain carries progressively looser selectors.
const RESULT_CHAIN: &[&str] = &[
    r#".s-result-item[data-component-type="s-search-result"]"#,
    ".s-result-item",
    "[data-asin]",
    ".sg-col-inner .s-result-item",
];
const TITLE_CHAIN: &[&str] = &["h2 span", ".a-size-medium"];
const LINK_CHAIN: &[&str] = &["h2 a", r#".a-link-normal[href*="/dp/"]"#];
const PRICE_CHAIN: &[&str] = &[".a-price-whole", ".a-price .a-offscreen"];
const MAX_RESULTS: usize = 10;

/// Live scraping connector for Amazon India search results.
pub struct AmazonInConnector {
    fetcher: FetchClient,
    base_url: String,
    price_pattern: Regex,
}

impl AmazonInConnector {
    pub fn new(fetcher: FetchClient) -> Self {
        Self::with_base_url(fetcher, BASE_URL)
    }

    pub fn with_base_url(fetcher: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            price_pattern: Regex::new(r"₹[\d,]+(?:\.\d{2})?").unwrap(),
        }
    }

    fn extract_listings(&self, body: &str) -> Vec<Listing> {
        let document = Html::parse_document(body);
        let blocks = extract::result_blocks(&document, RESULT_CHAIN);
        if blocks.is_empty() {
            warn!("no products found with any selector on Amazon India");
            return Vec::new();
        }
        info!(count = blocks.len(), "found product blocks on Amazon India");

        let mut listings = Vec::new();
        for block in blocks.into_iter().take(MAX_RESULTS) {
            let Some(listing) = self.extract_block(&block) else {
                debug!("skipping block missing title, url, or price");
                continue;
            };
            debug!(title = %listing.title, url = %listing.url, price = %listing.price, "extracted listing");
            listings.push(listing);
        }
        info!(count = listings.len(), "extracted listings from Amazon India");
        listings
    }

    fn extract_block(&self, block: &ElementRef) -> Option<Listing> {
        let title = extract::first_text(block, TITLE_CHAIN)?;
        let href = extract::first_href(block, LINK_CHAIN)?;
        let url = extract::resolve_listing_url(&self.base_url, &href)?;
        let price = extract::price_from_selectors(block, PRICE_CHAIN)
            .or_else(|| extract::price_from_block_text(block, &self.price_pattern))?;
        Some(Listing {
            title,
            url,
            price,
            currency: Currency::Inr,
        })
    }
}

#[async_trait]
impl SiteConnector for AmazonInConnector {
    fn site(&self) -> Site {
        Site::AmazonIn
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>> {
        let url = format!("{}/s?k={}", self.base_url, urlencoding::encode(query));
        let body = self.fetcher.fetch_html(&url).await?;
        Ok(self.extract_listings(&body))
    }
}
