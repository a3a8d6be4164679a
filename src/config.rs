use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Per-attempt timeout in seconds.
    pub request_timeout: u64,
    /// Total attempts per fetch, including the first one.
    pub max_retries: u32,
    /// Base backoff in seconds; attempt n waits base * 2^n.
    pub retry_base_secs: u64,
    /// Pool of user-agent strings, one chosen at random per request.
    pub user_agents: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            max_retries: 3,
            retry_base_secs: 2,
            user_agents: vec![
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15".to_string(),
            ],
        }
    }
}

impl FetcherConfig {
    /// Worst-case wall-clock budget for one site: every attempt hitting its
    /// timeout plus the cumulative backoff between attempts. Used as the
    /// per-site task timeout during aggregation.
    pub fn site_budget(&self) -> Duration {
        let attempts = u64::from(self.max_retries.max(1));
        let backoff: u64 = (0..attempts - 1).map(|n| self.retry_base_secs << n).sum();
        Duration::from_secs(attempts * self.request_timeout + backoff)
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start from compiled-in defaults so the binary runs without any file
            .add_source(Config::try_from(&AppConfig::default())?)
            // Default configuration file
            .add_source(File::with_name("config/default").required(false))
            // Environment-specific overrides
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            // Environment variables with prefix "DEALSCOUT_"
            .add_source(Environment::with_prefix("DEALSCOUT").separator("__"))
            .build()?;

        let config: AppConfig = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if self.fetcher.request_timeout == 0 {
            return Err(ConfigError::Message("Fetcher request_timeout must be greater than 0".into()));
        }

        if self.fetcher.max_retries == 0 {
            return Err(ConfigError::Message("Fetcher max_retries must be at least 1".into()));
        }

        if self.fetcher.user_agents.is_empty() {
            return Err(ConfigError::Message("Fetcher user_agents pool must not be empty".into()));
        }

        Ok(())
    }
}
