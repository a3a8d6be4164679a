use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::FetcherConfig;
use crate::matcher;
use crate::models::{Listing, MatchedListing, Site};
use crate::price;
use crate::sites::{SiteConnector, SiteRegistry};
use crate::utils::error::Result;

/// Orchestrates the per-country aggregation run: one task per site, matched
/// listings filtered per site, and the cheapest match per site collected in
/// registry order.
pub struct Aggregator {
    registry: Arc<SiteRegistry>,
    site_budget: Duration,
}

impl Aggregator {
    pub fn new(registry: Arc<SiteRegistry>, fetcher: &FetcherConfig) -> Self {
        Self {
            registry,
            site_budget: fetcher.site_budget(),
        }
    }

    /// Returns the cheapest matched listing per site, one entry per site
    /// that produced at least one match, ordered by the registry's site
    /// list for the country.
    ///
    /// Blank queries and unregistered countries yield an empty result, not
    /// an error. The only error path is a registry/connector mismatch,
    /// which indicates a configuration bug and is raised rather than
    /// silently degraded.
    pub async fn aggregate(&self, country: &str, query: &str) -> Result<Vec<MatchedListing>> {
        if query.trim().is_empty() {
            warn!("empty query provided");
            return Ok(Vec::new());
        }
        let Some(sites) = self.registry.sites_for(country) else {
            warn!(%country, "no sites configured for country");
            return Ok(Vec::new());
        };

        // Resolve every connector before spawning anything so a registry
        // mismatch fails the whole request up front.
        let mut tasks: Vec<(Site, JoinHandle<Option<MatchedListing>>)> =
            Vec::with_capacity(sites.len());
        for &site in sites {
            let connector = self.registry.connector(site)?;
            let query = query.to_string();
            let budget = self.site_budget;
            tasks.push((
                site,
                tokio::spawn(async move { search_site(connector, site, &query, budget).await }),
            ));
        }

        // Sites run concurrently, but results are collected in registry
        // order so the output never depends on completion order.
        let mut best_results = Vec::new();
        for (site, task) in tasks {
            match task.await {
                Ok(Some(best)) => best_results.push(best),
                Ok(None) => {}
                Err(e) => warn!(%site, error = %e, "site task failed to complete"),
            }
        }
        info!(sites = best_results.len(), %country, %query, "aggregation complete");
        Ok(best_results)
    }
}

/// Runs one site's search end to end: fetch, match, and pick the cheapest
/// listing. Every failure mode inside the site boundary collapses to "zero
/// results from this site" so one bad site never aborts the run.
async fn search_site(
    connector: Arc<dyn SiteConnector>,
    site: Site,
    query: &str,
    budget: Duration,
) -> Option<MatchedListing> {
    info!(%site, %query, "searching site");

    let raw = match tokio::time::timeout(budget, connector.search(query)).await {
        Ok(Ok(listings)) => listings,
        Ok(Err(e)) => {
            warn!(%site, error = %e, "connector failed, treating as zero results");
            return None;
        }
        Err(_) => {
            warn!(%site, budget_secs = budget.as_secs(), "site search exceeded its budget");
            return None;
        }
    };
    if raw.is_empty() {
        warn!(%site, "no results found");
        return None;
    }
    info!(%site, count = raw.len(), "raw listings found");

    let matched: Vec<Listing> = raw
        .into_iter()
        .filter(|listing| matcher::matches(query, &listing.title))
        .collect();
    if matched.is_empty() {
        warn!(%site, "no listings matched the query");
        return None;
    }
    info!(%site, count = matched.len(), "listings matched the query");

    // Stable minimum: strict less-than keeps the first-encountered listing
    // on rank ties, and unparseable prices rank as infinity.
    let mut best: Option<Listing> = None;
    let mut best_rank = f64::INFINITY;
    for listing in matched {
        let rank = price::rank_value(&listing.price);
        if best.is_none() || rank < best_rank {
            best_rank = rank;
            best = Some(listing);
        }
    }
    let listing = best?;
    info!(
        %site,
        title = %listing.title,
        price = %listing.price,
        currency = %listing.currency,
        "best listing for site"
    );
    Some(MatchedListing { listing, source: site })
}
