//! Server configuration from flags and environment.

use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;
use kaede_core::{CatalogConfig, DEFAULT_BASE_URL, FetchConfig, RetryPolicy};

/// JSON API over an anime catalog site
#[derive(Parser, Debug, Clone)]
#[command(name = "kaede-server")]
#[command(version)]
#[command(about = "Serve scraped anime catalog pages as JSON", long_about = None)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "KAEDE_BIND", default_value = "0.0.0.0:3000", value_name = "ADDR")]
    pub bind: SocketAddr,

    /// Root URL of the upstream catalog site
    #[arg(long, env = "KAEDE_BASE_URL", default_value = DEFAULT_BASE_URL, value_name = "URL")]
    pub base_url: String,

    /// Per-attempt HTTP timeout in seconds
    #[arg(long, env = "KAEDE_TIMEOUT", default_value = "30", value_name = "SECS")]
    pub timeout: u64,

    /// Attempts per upstream page, including the first
    #[arg(long, env = "KAEDE_MAX_ATTEMPTS", default_value = "3", value_name = "NUM",
          value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds; attempt n waits n times this
    #[arg(long, env = "KAEDE_BACKOFF_MS", default_value = "2000", value_name = "MS")]
    pub backoff_ms: u64,
}

impl ServerConfig {
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            fetch: FetchConfig {
                timeout: self.timeout,
                retry: RetryPolicy {
                    max_attempts: self.max_attempts,
                    base_delay: Duration::from_millis(self.backoff_ms),
                },
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::try_parse_from(["kaede-server"]).unwrap();
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let catalog = config.catalog_config();
        assert_eq!(catalog.fetch.retry, RetryPolicy::default());
        assert_eq!(catalog.fetch.timeout, 30);
    }

    #[test]
    fn test_flags_override() {
        let config = ServerConfig::try_parse_from([
            "kaede-server",
            "--base-url",
            "http://127.0.0.1:9000/",
            "--max-attempts",
            "5",
            "--backoff-ms",
            "10",
        ])
        .unwrap();

        let catalog = config.catalog_config();
        assert_eq!(catalog.base_url, "http://127.0.0.1:9000/");
        assert_eq!(catalog.fetch.retry.max_attempts, 5);
        assert_eq!(catalog.fetch.retry.backoff(2), Duration::from_millis(20));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(ServerConfig::try_parse_from(["kaede-server", "--max-attempts", "0"]).is_err());
    }
}
