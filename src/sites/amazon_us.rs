use async_trait::async_trait;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::{debug, info};

use super::{SiteConnector, extract};
use crate::fetch::FetchClient;
use crate::models::{Currency, Listing, Site};
use crate::utils::error::Result;

const BASE_URL: &str = "https://www.amazon.com";
const RESULT_CHAIN: &[&str] = &[r#".s-result-item[data-component-type="s-search-result"]"#];
const TITLE_CHAIN: &[&str] = &["h2 span", ".a-size-medium", ".a-size-base-plus"];
const LINK_CHAIN: &[&str] = &["h2 a", r#"a[href*="/dp/"]"#];
const PRICE_CHAIN: &[&str] = &[".a-price-whole", ".a-price .a-offscreen"];
const MAX_RESULTS: usize = 20;

/// Live scraping connector for Amazon US search results.
pub struct AmazonUsConnector {
    fetcher: FetchClient,
    base_url: String,
    price_pattern: Regex,
}

impl AmazonUsConnector {
    pub fn new(fetcher: FetchClient) -> Self {
        Self::with_base_url(fetcher, BASE_URL)
    }

    /// Points the connector at an alternate base URL, used by transport
    /// tests to target a local mock server.
    pub fn with_base_url(fetcher: FetchClient, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            price_pattern: Regex::new(r"\$[\d,]+(?:\.\d{2})?").unwrap(),
        }
    }

    fn extract_listings(&self, body: &str) -> Vec<Listing> {
        let document = Html::parse_document(body);
        let blocks = extract::result_blocks(&document, RESULT_CHAIN);
        info!(count = blocks.len(), "found product blocks on Amazon US");

        let mut listings = Vec::new();
        for block in blocks.into_iter().take(MAX_RESULTS) {
            let Some(listing) = self.extract_block(&block) else {
                debug!("skipping block missing title, url, or price");
                continue;
            };
            debug!(title = %listing.title, url = %listing.url, price = %listing.price, "extracted listing");
            listings.push(listing);
        }
        info!(count = listings.len(), "extracted listings from Amazon US");
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
            currency: Currency::Usd,
        })
    }
}

#[async_trait]
impl SiteConnector for AmazonUsConnector {
    fn site(&self) -> Site {
        Site::AmazonUs
    }

    async fn search(&self, query: &str) -> Result<Vec<Listing>> {
        let url = format!("{}/s?k={}", self.base_url, urlencoding::encode(query));
        let body = self.fetcher.fetch_html(&url).await?;
        Ok(self.extract_listings(&body))
    }
}
