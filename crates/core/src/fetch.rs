//! Page fetching with retry and linear backoff.
//!
//! The network and the clock are both injected: [`Transport`] performs one GET,
//! [`Sleeper`] waits between attempts. [`fetch_with_retry`] owns the retry loop
//! and turns an exhausted run of non-2xx responses into
//! [`KaedeError::RetriesExhausted`] instead of handing back nothing.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};
use url::Url;

use crate::{KaedeError, Result};

/// Browser User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7";

/// How many times to try a page and how long to wait in between.
///
/// The wait before attempt `n + 1` is `base_delay * n`, so the default policy
/// waits 2s after the first failure and 4s after the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Backoff unit, multiplied by the number of the attempt that just failed.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_millis(2000) }
    }
}

impl RetryPolicy {
    /// Delay to wait after `attempt` (1-based) failed.
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// HTTP client configuration for fetching catalog pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Per-attempt timeout in seconds.
    pub timeout: u64,
    /// User-Agent header value.
    pub user_agent: String,
    /// Retry and backoff policy.
    pub retry: RetryPolicy,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: DEFAULT_USER_AGENT.to_string(), retry: RetryPolicy::default() }
    }
}

/// A fetched page: final status and body text.
///
/// Bodies of non-2xx responses are not read and stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub url: String,
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs a single GET.
///
/// An `Err` means the request never produced a response (connection error,
/// timeout). A response with any status is an `Ok`.
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<Page>> + Send;
}

/// Waits between attempts.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Validates that `url` is an absolute http(s) URL.
pub fn parse_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| KaedeError::InvalidUrl(format!("{url}: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(KaedeError::InvalidUrl(format!("unsupported scheme {other:?} in {url}"))),
    }
}

/// Fetches `url`, retrying failed attempts according to `policy`.
///
/// - a 2xx response is returned immediately;
/// - a non-2xx response or a transient transport error waits
///   [`RetryPolicy::backoff`] and tries again, except after the final attempt;
/// - if the final attempt errored, that error is returned;
/// - if the final attempt got a non-2xx response, [`KaedeError::RetriesExhausted`]
///   is returned with its status.
///
/// Non-transient errors (see [`KaedeError::is_transient`]) are returned
/// without retrying.
pub async fn fetch_with_retry<T, S>(transport: &T, sleeper: &S, policy: &RetryPolicy, url: &str) -> Result<Page>
where
    T: Transport,
    S: Sleeper,
{
    let parsed = parse_url(url)?;
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        debug!("Attempt {}/{} for {}", attempt, attempts, url);

        match transport.get(&parsed).await {
            Ok(page) if page.is_success() => return Ok(page),
            Ok(page) => {
                warn!(status = page.status, attempt, "upstream answered {} with a non-success status", url);
                if attempt >= attempts {
                    return Err(KaedeError::RetriesExhausted { url: url.to_string(), attempts, status: page.status });
                }
            }
            Err(err) => {
                if attempt >= attempts || !err.is_transient() {
                    return Err(err);
                }
                warn!(attempt, "request to {} failed: {}", url, err);
            }
        }

        sleeper.sleep(policy.backoff(attempt)).await;
    }
}

/// [`Transport`] backed by a pooled reqwest client with browser-like headers.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: u64,
}

#[cfg(feature = "fetch")]
impl HttpTransport {
    /// Builds the client. `referer` is sent as the `Referer` header on every request.
    pub fn new(config: &FetchConfig, referer: &Url) -> Result<Self> {
        use reqwest::header::{self, HeaderMap, HeaderValue};

        let header_value = |value: &str| {
            HeaderValue::from_str(value).map_err(|e| KaedeError::ConfigError(format!("invalid header value: {e}")))
        };

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, header_value(&config.user_agent)?);
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::REFERER, header_value(referer.as_str())?);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .default_headers(headers)
            .build()
            .map_err(KaedeError::HttpError)?;

        Ok(Self { client, timeout: config.timeout })
    }
}

#[cfg(feature = "fetch")]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<Page> {
        let timeout = self.timeout;
        let map_err = |e: reqwest::Error| {
            if e.is_timeout() { KaedeError::Timeout { timeout } } else { KaedeError::HttpError(e) }
        };

        let response = self.client.get(url.clone()).send().await.map_err(map_err)?;
        let status = response.status();
        let body = if status.is_success() { response.text().await.map_err(map_err)? } else { String::new() };

        Ok(Page { url: url.to_string(), status: status.as_u16(), body })
    }
}

/// [`Sleeper`] using the tokio timer.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[cfg(feature = "fetch")]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
