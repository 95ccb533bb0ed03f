//! The scrape pipeline: fetch, parse, extract, normalize.
//!
//! A [`Catalog`] knows the upstream base URL and owns the [`Transport`] and
//! [`Sleeper`] used for fetching. Each method fetches one page and returns
//! freshly built records; nothing is cached between calls.
//!
//! # Example
//!
//! ```rust,no_run
//! use kaede_core::{CatalogConfig, HttpCatalog};
//!
//! # async fn example() -> kaede_core::Result<()> {
//! let catalog = HttpCatalog::new(CatalogConfig::default())?;
//! let lists = catalog.home().await?;
//! println!("{} ongoing, {} complete", lists.on_going.len(), lists.complete.len());
//! # Ok(())
//! # }
//! ```

use tracing::debug;

use crate::aggregate;
use crate::extract::{self, HomeLists};
use crate::fetch::{self, FetchConfig, Page, Sleeper, Transport};
use crate::models::{AnimeListEntry, AnimeSummary, CardKind};
use crate::parse::Document;
use crate::Result;

/// Upstream site used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://otakudesu.best/";

/// Where to scrape from and how to fetch.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Root of the upstream site. A trailing slash is added when missing.
    pub base_url: String,
    pub fetch: FetchConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_string(), fetch: FetchConfig::default() }
    }
}

/// Search hits plus the size of the list they were drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<AnimeListEntry>,
    pub total_checked: usize,
}

/// Scrape pipeline bound to one upstream site.
#[derive(Debug, Clone)]
pub struct Catalog<T, S> {
    base_url: String,
    fetch: FetchConfig,
    transport: T,
    sleeper: S,
}

/// Catalog over the real network and tokio timers.
#[cfg(feature = "fetch")]
pub type HttpCatalog = Catalog<fetch::HttpTransport, fetch::TokioSleeper>;

#[cfg(feature = "fetch")]
impl HttpCatalog {
    /// Builds a catalog with a reqwest transport that sends the base URL as `Referer`.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let base = fetch::parse_url(&normalize_base(&config.base_url))?;
        let transport = fetch::HttpTransport::new(&config.fetch, &base)?;
        Catalog::with_transport(config, transport, fetch::TokioSleeper)
    }
}

fn normalize_base(base_url: &str) -> String {
    if base_url.ends_with('/') { base_url.to_string() } else { format!("{base_url}/") }
}

impl<T: Transport, S: Sleeper> Catalog<T, S> {
    /// Builds a catalog over any transport and sleeper.
    ///
    /// # Errors
    ///
    /// [`crate::KaedeError::InvalidUrl`] if the base URL is not an absolute http(s) URL.
    pub fn with_transport(config: CatalogConfig, transport: T, sleeper: S) -> Result<Self> {
        let base_url = normalize_base(&config.base_url);
        fetch::parse_url(&base_url)?;
        Ok(Self { base_url, fetch: config.fetch, transport, sleeper })
    }

    /// Base URL, always ending in `/`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn home_url(&self) -> String {
        self.base_url.clone()
    }

    /// URL of one listing page: page 1 is the bare listing, later pages add `page/<n>`.
    pub fn listing_url(&self, kind: CardKind, page: u64) -> String {
        let section = match kind {
            CardKind::Ongoing => "ongoing-anime",
            CardKind::Complete => "complete-anime",
        };
        if page <= 1 {
            format!("{}{section}/", self.base_url)
        } else {
            format!("{}{section}/page/{page}", self.base_url)
        }
    }

    pub fn anime_list_url(&self) -> String {
        format!("{}anime-list/", self.base_url)
    }

    async fn fetch(&self, url: &str) -> Result<Page> {
        fetch::fetch_with_retry(&self.transport, &self.sleeper, &self.fetch.retry, url).await
    }

    /// Fetches the homepage and extracts both card lists.
    pub async fn home(&self) -> Result<HomeLists> {
        let page = self.fetch(&self.home_url()).await?;
        let lists = extract::extract_home(&Document::parse(&page.body), &self.base_url)?;
        debug!("homepage: {} ongoing, {} complete", lists.on_going.len(), lists.complete.len());
        Ok(lists)
    }

    /// Fetches one page of the ongoing or complete listing.
    pub async fn listing(&self, kind: CardKind, page: u64) -> Result<Vec<AnimeSummary>> {
        let url = self.listing_url(kind, page);
        let fetched = self.fetch(&url).await?;
        let cards = extract::extract_listing(&Document::parse(&fetched.body), kind, &self.base_url)?;
        debug!("{}: {} cards", url, cards.len());
        Ok(cards)
    }

    /// Fetches and extracts the full alphabetical catalog.
    pub async fn anime_list(&self) -> Result<Vec<AnimeListEntry>> {
        let page = self.fetch(&self.anime_list_url()).await?;
        let entries = extract::extract_anime_list(&Document::parse(&page.body), &self.base_url)?;
        debug!("anime list: {} entries", entries.len());
        Ok(entries)
    }

    /// Fetches the catalog and runs a ranked search over it.
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = aggregate::normalize_query(query);
        let entries = self.anime_list().await?;
        let results = aggregate::search(&entries, &query);
        Ok(SearchResults { query, results, total_checked: entries.len() })
    }
}
