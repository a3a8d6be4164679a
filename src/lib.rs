pub mod aggregator;
pub mod config;
pub mod fetch;
pub mod matcher;
pub mod models;
pub mod presenter;
pub mod price;
pub mod sites;
pub mod utils;
pub mod web;

// Re-export commonly used types
pub use aggregator::Aggregator;
pub use config::AppConfig;
pub use fetch::FetchClient;
pub use models::{Currency, Listing, MatchedListing, Site};
pub use presenter::PriceQuote;
pub use sites::{SiteConnector, SiteRegistry};
pub use utils::error::AppError;

pub type Result<T> = std::result::Result<T, AppError>;
