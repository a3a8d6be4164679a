//! Selector fallback-chain helpers shared by the live scraping connectors.
//!
//! Every helper is best-effort at the granularity of a single candidate: a
//! selector that fails to parse or match moves on to the next entry in the
//! chain, and a block that cannot produce a value yields `None`. One
//! malformed block never aborts a batch.

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::Url;

use crate::price;

/// Returns the result blocks matched by the first selector in the chain that
/// yields at least one element. An exhausted chain is an empty result, not
/// an error.
pub fn result_blocks<'a>(document: &'a Html, chain: &[&str]) -> Vec<ElementRef<'a>> {
    for css in chain {
        let Ok(selector) = Selector::parse(css) else {
            warn!(selector = css, "invalid result-block selector, skipping");
            continue;
        };
        let blocks: Vec<ElementRef<'a>> = document.select(&selector).collect();
        if !blocks.is_empty() {
            debug!(selector = css, count = blocks.len(), "result selector matched");
            return blocks;
        }
    }
    Vec::new()
}

/// First non-empty text content produced by any selector in the chain.
pub fn first_text(block: &ElementRef, chain: &[&str]) -> Option<String> {
    for css in chain {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = block.select(&selector).next() {
            let text = element_text(&element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty `href` attribute produced by any selector in the chain.
pub fn first_href(block: &ElementRef, chain: &[&str]) -> Option<String> {
    for css in chain {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        let href = block
            .select(&selector)
            .find_map(|element| element.value().attr("href"))
            .filter(|href| !href.is_empty());
        if let Some(href) = href {
            return Some(href.to_string());
        }
    }
    None
}

/// Resolves an extracted href against the site's base URL. Candidates whose
/// resolved form lacks a host (mailto:, javascript:, fragments of garbage)
/// are discarded.
pub fn resolve_listing_url(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    let resolved = base.join(href).ok()?;
    if !resolved.has_host() {
        return None;
    }
    Some(resolved.to_string())
}

/// Cleaned price text from the first selector in the chain that yields one.
/// Elements with no text fall back to their `content` attribute, which some
/// sites use for machine-readable prices.
pub fn price_from_selectors(block: &ElementRef, chain: &[&str]) -> Option<String> {
    for css in chain {
        let Ok(selector) = Selector::parse(css) else {
            continue;
        };
        if let Some(element) = block.select(&selector).next() {
            let mut text = element_text(&element);
            if text.is_empty() {
                text = element.value().attr("content").unwrap_or("").to_string();
            }
            if let Some(cleaned) = price::clean(&text) {
                return Some(cleaned);
            }
        }
    }
    None
}

/// Last-resort price extraction: scan the block's full text for a
/// currency-symbol-prefixed numeric pattern.
pub fn price_from_block_text(block: &ElementRef, pattern: &Regex) -> Option<String> {
    let text = block.text().collect::<Vec<_>>().join(" ");
    pattern.find(&text).and_then(|m| price::clean(m.as_str()))
}

fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <html><body>
            <div class="item">
                <h2><a href="/dp/B0TEST123"><span>Apple iPhone 16 Pro 128GB</span></a></h2>
                <span class="a-price"><span class="a-offscreen">$999.00</span></span>
            </div>
            <div class="item">
                <h2><a href="javascript:void(0)"><span>Broken listing</span></a></h2>
            </div>
        </body></html>
    "#;

    fn parse_blocks(html: &str, chain: &[&str]) -> usize {
        let document = Html::parse_document(html);
        result_blocks(&document, chain).len()
    }

    #[test]
    fn test_result_blocks_uses_first_matching_selector() {
        assert_eq!(parse_blocks(SAMPLE, &[".missing", ".item"]), 2);
        assert_eq!(parse_blocks(SAMPLE, &[".item", "div"]), 2);
    }

    #[test]
    fn test_result_blocks_exhausted_chain_is_empty() {
        assert_eq!(parse_blocks(SAMPLE, &[".nope", "#nothing"]), 0);
    }

    #[test]
    fn test_first_text_fallback_order() {
        let document = Html::parse_document(SAMPLE);
        let item = Selector::parse(".item").unwrap();
        let block = document.select(&item).next().unwrap();

        let title = first_text(&block, &[".missing", "h2 span"]);
        assert_eq!(title.as_deref(), Some("Apple iPhone 16 Pro 128GB"));
        assert_eq!(first_text(&block, &[".missing"]), None);
    }

    #[test]
    fn test_first_href_extraction() {
        let document = Html::parse_document(SAMPLE);
        let item = Selector::parse(".item").unwrap();
        let block = document.select(&item).next().unwrap();

        let href = first_href(&block, &["h2 a"]);
        assert_eq!(href.as_deref(), Some("/dp/B0TEST123"));
    }

    #[test]
    fn test_resolve_listing_url() {
        assert_eq!(
            resolve_listing_url("https://www.amazon.com", "/dp/B0TEST123").as_deref(),
            Some("https://www.amazon.com/dp/B0TEST123")
        );
        // Already-absolute hrefs pass through.
        assert_eq!(
            resolve_listing_url("https://www.amazon.com", "https://www.amazon.in/dp/X").as_deref(),
            Some("https://www.amazon.in/dp/X")
        );
        // No host after resolution: discarded.
        assert_eq!(resolve_listing_url("https://www.amazon.com", "javascript:void(0)"), None);
        assert_eq!(resolve_listing_url("not a base", "/dp/B0TEST123"), None);
    }

    #[test]
    fn test_price_from_selectors() {
        let document = Html::parse_document(SAMPLE);
        let item = Selector::parse(".item").unwrap();
        let block = document.select(&item).next().unwrap();

        let price = price_from_selectors(&block, &[".a-price-whole", ".a-price .a-offscreen"]);
        assert_eq!(price.as_deref(), Some("999.00"));
    }

    #[test]
    fn test_price_from_content_attribute() {
        let html = r#"<div class="p"><meta class="price" content="$1,299.99"></div>"#;
        let document = Html::parse_document(html);
        let selector = Selector::parse(".p").unwrap();
        let block = document.select(&selector).next().unwrap();

        let price = price_from_selectors(&block, &[".price"]);
        assert_eq!(price.as_deref(), Some("1299.99"));
    }

    #[test]
    fn test_price_from_block_text_regex_fallback() {
        let document = Html::parse_document(SAMPLE);
        let item = Selector::parse(".item").unwrap();
        let block = document.select(&item).next().unwrap();
        let pattern = Regex::new(r"\$[\d,]+(?:\.\d{2})?").unwrap();

        assert_eq!(price_from_block_text(&block, &pattern).as_deref(), Some("999.00"));
    }
}
