use rand::seq::SliceRandom;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
    USER_AGENT,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::ExponentialBackoff;
use tracing::{error, info, warn};

use crate::config::FetcherConfig;
use crate::utils::error::{AppError, Result};

const FALLBACK_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Retrying, header-randomizing HTTP fetch abstraction shared by all live
/// site connectors.
#[derive(Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    config: FetcherConfig,
}

impl FetchClient {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetches a URL and returns its HTML body. Transport failures, non-2xx
    /// statuses, and 2xx responses that are not HTML are retried up to the
    /// configured bound with exponential backoff. Exhausted retries surface
    /// as an error the caller treats as "no results from this source".
    pub async fn fetch_html(&self, url: &str) -> Result<String> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(self.config.retry_base_secs * 500)
            .take(self.config.max_retries.saturating_sub(1) as usize);
        let attempt = AtomicU32::new(0);

        Retry::spawn(strategy, || {
            let n = attempt.fetch_add(1, Ordering::Relaxed) + 1;
            self.attempt(url, n)
        })
        .await
        .map_err(|e| {
            error!(%url, error = %e, "all retry attempts failed");
            e
        })
    }

    async fn attempt(&self, url: &str, attempt: u32) -> Result<String> {
        info!(%url, attempt, max_retries = self.config.max_retries, "making request");

        let response = self
            .client
            .get(url)
            .headers(self.default_headers())
            .send()
            .await
            .map_err(|e| {
                warn!(%url, attempt, error = %e, "request failed");
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, attempt, %status, "request returned error status");
            return Err(AppError::Fetch(format!("status {status} from {url}")));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            // A 200 that is not HTML is useless for extraction; retry it.
            warn!(%url, attempt, %content_type, "non-HTML response received");
            return Err(AppError::Fetch(format!("non-HTML response ({content_type})")));
        }

        Ok(response.text().await?)
    }

    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let user_agent = HeaderValue::from_str(self.random_user_agent())
            .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_USER_AGENT));
        headers.insert(USER_AGENT, user_agent);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );
        headers
    }

    fn random_user_agent(&self) -> &str {
        self.config
            .user_agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT)
    }
}
