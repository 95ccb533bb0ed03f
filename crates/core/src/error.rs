//! Error types for Kaede operations.
//!
//! This module defines the main error type [`KaedeError`] which represents
//! every way a scrape can fail: fetching the upstream page, building a URL,
//! or evaluating a selector.
//!
//! Score text that does not parse is *not* an error. It becomes `NaN` on the
//! record (see [`crate::normalize::parse_score`]).
//!
//! # Example
//!
//! ```rust
//! use kaede_core::{KaedeError, Result};
//!
//! fn require_page(page: u32) -> Result<u32> {
//!     if page == 0 {
//!         return Err(KaedeError::InvalidUrl("page must be positive".to_string()));
//!     }
//!     Ok(page)
//! }
//! ```

use thiserror::Error;

/// Main error type for scraping operations.
///
/// Every variant is caught at the HTTP handler boundary and turned into an
/// error envelope, so the `Display` text ends up verbatim in `meta.error`.
#[derive(Error, Debug)]
pub enum KaedeError {
    /// HTTP request errors from reqwest.
    ///
    /// Connection refused, DNS failures, TLS problems and body read errors.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    ///
    /// Returned when a single attempt exceeds the configured timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Every attempt reached the server but none returned a 2xx status.
    #[error("Upstream returned HTTP {status} for {url} after {attempts} attempts")]
    RetriesExhausted { url: String, attempts: u32, status: u16 },

    /// HTML parsing errors.
    ///
    /// The parser itself is lenient, so in practice this means a selector in
    /// a descriptor failed to compile.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// Configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A response could not be serialized.
    #[error("Failed to serialize response: {0}")]
    SerializeError(#[from] serde_json::Error),
}

impl KaedeError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            #[cfg(feature = "fetch")]
            KaedeError::HttpError(_) => true,
            KaedeError::Timeout { .. } | KaedeError::RetriesExhausted { .. } => true,
            KaedeError::InvalidUrl(_)
            | KaedeError::HtmlParseError(_)
            | KaedeError::ConfigError(_)
            | KaedeError::SerializeError(_) => false,
        }
    }
}

/// Result type alias for KaedeError.
pub type Result<T> = std::result::Result<T, KaedeError>;
