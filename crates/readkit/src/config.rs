//! Fetch configuration
//!
//! Process-wide, fixed at startup and read-only afterwards. Passed into
//! [`Fetcher`](crate::Fetcher) at construction so tests can inject small
//! limits and a local upstream.

use std::time::Duration;

/// Default extraction service base URL
pub const DEFAULT_ENDPOINT: &str = "https://r.jina.ai/";

/// Default request timeout (20 seconds), covering send and body read
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default connect timeout (10 seconds)
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default byte ceiling for the upstream body (5,000,000 bytes)
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 5_000_000;

/// Default character cap on returned text (1,000,000 characters)
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 1_000_000;

/// The only header sent upstream
pub const ACCEPT_HEADER: &str = "text/plain, text/markdown;q=0.9, */*;q=0.1";

/// Appended to text cut at the character cap
pub const TRUNCATION_MARKER: &str = "\n\n[content truncated]";

/// Limits and upstream location for the guarded fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Extraction service base; the target href is appended to it.
    /// A missing trailing `/` is added by the fetcher.
    /// Default: `https://r.jina.ai/`
    pub endpoint: String,

    /// Wall-clock bound for one read, send through last body byte
    /// Default: 20 seconds
    pub timeout: Duration,

    /// Bound on establishing the upstream connection
    /// Default: 10 seconds (never more than `timeout`)
    pub connect_timeout: Duration,

    /// Byte ceiling, checked against `Content-Length` and while reading
    /// Default: 5,000,000
    pub max_content_length: u64,

    /// Character cap applied after line-ending normalization
    /// Default: 1,000,000
    pub max_content_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl FetchConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the extraction service base URL
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the byte ceiling
    pub fn max_content_length(mut self, bytes: u64) -> Self {
        self.max_content_length = bytes;
        self
    }

    /// Set the character cap
    pub fn max_content_chars(mut self, chars: usize) -> Self {
        self.max_content_chars = chars;
        self
    }

    /// Endpoint with exactly one trailing `/`, ready for an href to be appended.
    pub(crate) fn endpoint_base(&self) -> String {
        let trimmed = self.endpoint.trim().trim_end_matches('/');
        format!("{trimmed}/")
    }

    /// Connect timeout clamped to the overall timeout.
    pub(crate) fn effective_connect_timeout(&self) -> Duration {
        self.connect_timeout.min(self.timeout)
    }
}
