//! Readkit - read any web page as bounded plain text, without becoming an open proxy
//!
//! Part of the Everruns ecosystem.
//!
//! A raw user string goes through two stages:
//!
//! 1. [`policy::validate`] turns it into a [`CanonicalUrl`] or rejects it
//!    locally (bad input, non-HTTP scheme, credentials, internal host).
//! 2. [`Fetcher::fetch`] asks the extraction service for the page text,
//!    under a timeout and a size ceiling, and normalizes the result.
//!
//! # Example
//!
//! ```rust,no_run
//! use readkit::Reader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let reader = Reader::new()?;
//!     let page = reader.read_url_text("example.com").await?;
//!     assert_eq!(page.source_url, "https://example.com/");
//!     println!("{}", page.content);
//!     Ok(())
//! }
//! ```

mod config;
mod error;
pub mod fetch;
mod logging;
pub mod policy;

pub use config::{
    ACCEPT_HEADER, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_MAX_CONTENT_CHARS,
    DEFAULT_MAX_CONTENT_LENGTH, DEFAULT_TIMEOUT, FetchConfig, TRUNCATION_MARKER,
};
pub use error::{Error, ErrorKind, Result};
pub use fetch::{FetchResult, Fetcher};
pub use logging::{LogConfig, sanitize_for_log};
pub use policy::{BlockReason, CanonicalUrl, HostClassification};

/// Main entry point for Readkit.
///
/// Validates input and fetches it through the configured extraction service.
/// Holds only immutable configuration; clone it freely across tasks.
#[derive(Debug, Clone)]
pub struct Reader {
    fetcher: Fetcher,
}

impl Reader {
    /// Create a reader with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a new ReaderBuilder for customized configuration.
    pub fn builder() -> ReaderBuilder {
        ReaderBuilder::default()
    }

    /// Validate `raw` and read the page it names.
    ///
    /// Invalid or blocked input fails before any network I/O. Errors display
    /// as messages fit for end users.
    pub async fn read_url_text(&self, raw: &str) -> Result<FetchResult> {
        let url = policy::validate(raw)?;
        self.fetcher.fetch(&url).await
    }

    /// The underlying fetcher.
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }
}

/// Builder for customized Reader configuration.
#[derive(Debug, Default)]
pub struct ReaderBuilder {
    config: FetchConfig,
    log: LogConfig,
}

impl ReaderBuilder {
    /// Set fetch limits and the upstream endpoint.
    pub fn config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    /// Set log redaction behavior.
    pub fn log_config(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Build the Reader.
    pub fn build(self) -> Result<Reader> {
        let fetcher = Fetcher::with_log_config(self.config, self.log)?;
        Ok(Reader { fetcher })
    }
}

/// Read `raw` with a default [`Reader`].
pub async fn read_url_text(raw: &str) -> Result<FetchResult> {
    Reader::new()?.read_url_text(raw).await
}
