use serde::{Deserialize, Serialize};

use crate::models::{Currency, MatchedListing};

/// External response schema for one site's best result. Pure projection of
/// a matched listing, no business logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub link: String,
    pub price: String,
    pub currency: Currency,
    #[serde(rename = "productName")]
    pub product_name: String,
    pub source: String,
}

impl From<MatchedListing> for PriceQuote {
    fn from(matched: MatchedListing) -> Self {
        Self {
            link: matched.listing.url,
            price: matched.listing.price,
            currency: matched.listing.currency,
            product_name: matched.listing.title,
            source: matched.source.label().to_string(),
        }
    }
}

/// Shapes aggregator output into the external response schema.
pub fn present(results: Vec<MatchedListing>) -> Vec<PriceQuote> {
    results.into_iter().map(PriceQuote::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Listing, Site};

    fn matched() -> MatchedListing {
        MatchedListing {
            listing: Listing {
                title: "Apple iPhone 16 Pro 128GB".to_string(),
                url: "https://www.walmart.com/ip/Apple-iPhone-16-Pro-128GB/123456789".to_string(),
                price: "999".to_string(),
                currency: Currency::Usd,
            },
            source: Site::Walmart,
        }
    }

    #[test]
    fn test_projection_fields() {
        let quote = PriceQuote::from(matched());
        assert_eq!(quote.link, "https://www.walmart.com/ip/Apple-iPhone-16-Pro-128GB/123456789");
        assert_eq!(quote.price, "999");
        assert_eq!(quote.currency, Currency::Usd);
        assert_eq!(quote.product_name, "Apple iPhone 16 Pro 128GB");
        assert_eq!(quote.source, "Walmart");
    }

    #[test]
    fn test_wire_format_uses_product_name_key() {
        let json = serde_json::to_value(PriceQuote::from(matched())).unwrap();
        assert_eq!(json["productName"], "Apple iPhone 16 Pro 128GB");
        assert_eq!(json["currency"], "USD");
        assert!(json.get("product_name").is_none());
    }

    #[test]
    fn test_present_preserves_order() {
        let mut second = matched();
        second.source = Site::AmazonUs;
        let quotes = present(vec![matched(), second]);
        assert_eq!(quotes[0].source, "Walmart");
        assert_eq!(quotes[1].source, "Amazon");
    }
}
