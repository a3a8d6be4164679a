use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of supported sites. Adding a site means adding a variant here
/// plus a connector registration in `SiteRegistry::standard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    AmazonUs,
    AmazonIn,
    Flipkart,
    Walmart,
}

impl Site {
    /// External identifier used in responses and log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Site::AmazonUs => "Amazon",
            Site::AmazonIn => "AmazonIN",
            Site::Flipkart => "Flipkart",
            Site::Walmart => "Walmart",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "INR")]
    Inr,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Inr => "INR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product offer extracted from a single site. The price is kept as the
/// cleaned text the site reported; ranking happens at selection time.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub title: String,
    pub url: String,
    pub price: String,
    pub currency: Currency,
}

/// A listing confirmed relevant to the query, tagged with its source site.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedListing {
    pub listing: Listing,
    pub source: Site,
}
