use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::fetch::FetchClient;
use crate::models::{Listing, Site};
use crate::utils::error::{AppError, Result};

pub mod extract;

pub mod amazon_in;
pub mod amazon_us;
pub mod flipkart;
pub mod walmart;

pub use amazon_in::AmazonInConnector;
pub use amazon_us::AmazonUsConnector;
pub use flipkart::FlipkartConnector;
pub use walmart::WalmartConnector;

/// Per-site component turning a query into raw listings. Implementations
/// must be self-contained: no shared mutable state crosses site boundaries,
/// so connector invocations are safe to run concurrently.
#[async_trait]
pub trait SiteConnector: Send + Sync {
    /// Which site this connector serves.
    fn site(&self) -> Site;

    /// Returns every candidate listing the site produced for the query.
    /// An empty result is normal; an error means the site was unreachable
    /// or unusable and is treated upstream as zero results.
    async fn search(&self, query: &str) -> Result<Vec<Listing>>;
}

/// Static country -> sites and site -> connector configuration. Built once
/// at startup and read-only afterwards; construction fails fast when a
/// country references a site with no registered connector, so per-request
/// lookups cannot hit a registry/connector mismatch.
pub struct SiteRegistry {
    countries: HashMap<String, Vec<Site>>,
    connectors: HashMap<Site, Arc<dyn SiteConnector>>,
}

impl SiteRegistry {
    pub fn new(
        countries: HashMap<String, Vec<Site>>,
        connectors: HashMap<Site, Arc<dyn SiteConnector>>,
    ) -> Result<Self> {
        for (country, sites) in &countries {
            for site in sites {
                if !connectors.contains_key(site) {
                    return Err(AppError::Validation(format!(
                        "country {country} references site {site} with no registered connector"
                    )));
                }
            }
        }
        Ok(Self { countries, connectors })
    }

    /// The standard deployment: Amazon + Walmart for the US, Amazon India +
    /// Flipkart for India.
    pub fn standard(fetcher: FetchClient) -> Result<Self> {
        let mut connectors: HashMap<Site, Arc<dyn SiteConnector>> = HashMap::new();
        connectors.insert(Site::AmazonUs, Arc::new(AmazonUsConnector::new(fetcher.clone())));
        connectors.insert(Site::AmazonIn, Arc::new(AmazonInConnector::new(fetcher)));
        connectors.insert(Site::Walmart, Arc::new(WalmartConnector));
        connectors.insert(Site::Flipkart, Arc::new(FlipkartConnector));

        let mut countries = HashMap::new();
        countries.insert("US".to_string(), vec![Site::AmazonUs, Site::Walmart]);
        countries.insert("IN".to_string(), vec![Site::AmazonIn, Site::Flipkart]);

        Self::new(countries, connectors)
    }

    /// Ordered site list for a country; `None` for unregistered countries
    /// (a soft failure, not an error).
    pub fn sites_for(&self, country: &str) -> Option<&[Site]> {
        self.countries.get(country).map(Vec::as_slice)
    }

    /// Resolves a site's connector. A miss after construction-time
    /// validation indicates a programming error and is raised, not
    /// swallowed.
    pub fn connector(&self, site: Site) -> Result<Arc<dyn SiteConnector>> {
        self.connectors
            .get(&site)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("no connector registered for site {site}")))
    }
}
