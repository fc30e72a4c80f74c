//! Guarded HTTP client for the extraction service.
//!
//! # Security Mitigations
//!
//! - Large response DoS → `Content-Length` pre-check plus a byte ceiling while reading
//! - Connection hang / slowloris → one wall-clock timeout over send and body read
//! - Lingering transfers → the exchange future is dropped on timeout, which
//!   aborts the request; idle connections are never pooled
//! - Redirect bypass → `Policy::none()`, a 3xx is reported as an upstream error
//! - Compression bomb → auto-decompression disabled
//! - Header leakage → only `Accept` is sent; no cookies, credentials or user agent

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::error::Error as StdError;
use std::sync::Once;
use url::Url;

use super::FetchResult;
use super::text;
use crate::config::{ACCEPT_HEADER, FetchConfig};
use crate::error::{Error, Result};
use crate::logging::LogConfig;
use crate::policy::CanonicalUrl;

/// Fetches validated URLs through the configured extraction service.
///
/// Cheap to clone and safe to share across tasks; holds no per-request state.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    /// Endpoint with a single trailing `/`
    endpoint: String,
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    log: LogConfig,
}

impl Fetcher {
    /// Create a fetcher with default log settings.
    pub fn new(config: FetchConfig) -> Result<Self> {
        Self::with_log_config(config, LogConfig::default())
    }

    /// Create a fetcher with custom log settings.
    ///
    /// Fails with [`Error::Config`] when the endpoint is not an absolute
    /// `http`/`https` URL or the HTTP client cannot be built.
    pub fn with_log_config(config: FetchConfig, log: LogConfig) -> Result<Self> {
        let endpoint = config.endpoint_base();
        let parsed = Url::parse(&endpoint)
            .map_err(|e| Error::Config(format!("invalid endpoint: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "endpoint must be http or https, got {}",
                parsed.scheme()
            )));
        }

        install_crypto_provider();

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.effective_connect_timeout())
            // The extraction service is trusted; where it redirects to is not
            .redirect(reqwest::redirect::Policy::none())
            .no_gzip()
            .no_brotli()
            .no_deflate()
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|e| Error::Config(format!("failed to create client: {e}")))?;

        Ok(Self {
            client,
            config,
            endpoint,
            log,
        })
    }

    /// Configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Upstream URL for a target: endpoint base followed by the full href.
    pub fn upstream_url(&self, url: &CanonicalUrl) -> String {
        format!("{}{}", self.endpoint, url.as_str())
    }

    /// Fetch `url` through the extraction service and shape the text.
    ///
    /// Makes exactly one outbound request and never retries.
    pub async fn fetch(&self, url: &CanonicalUrl) -> Result<FetchResult> {
        let upstream_url = self.upstream_url(url);

        #[cfg(feature = "logging")]
        tracing::debug!(upstream = %self.log.redact_url(&upstream_url), "fetch started");

        // Dropping the exchange future on expiry cancels the request and
        // releases its connection.
        let body = match tokio::time::timeout(self.config.timeout, self.exchange(&upstream_url))
            .await
        {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => {
                #[cfg(feature = "logging")]
                tracing::warn!(
                    upstream = %self.log.redact_url(&upstream_url),
                    error = %err,
                    "fetch failed"
                );
                return Err(err);
            }
            Err(_) => {
                #[cfg(feature = "logging")]
                tracing::warn!(
                    upstream = %self.log.redact_url(&upstream_url),
                    timeout_ms = self.config.timeout.as_millis() as u64,
                    "fetch timed out, request aborted"
                );
                return Err(Error::Timeout(self.config.timeout));
            }
        };

        let cleaned = text::clean(&body);
        let (content, truncated) = text::truncate_chars(cleaned, self.config.max_content_chars);

        #[cfg(feature = "logging")]
        tracing::debug!(bytes = body.len(), truncated, "fetch completed");

        Ok(FetchResult {
            source_url: url.as_str().to_string(),
            upstream_url,
            content,
            truncated,
        })
    }

    /// Send the request and read the body under the byte ceiling.
    async fn exchange(&self, upstream_url: &str) -> Result<String> {
        let response = self
            .client
            .get(upstream_url)
            .header(ACCEPT, ACCEPT_HEADER)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
            });
        }

        // Advisory: a server can omit or lie about the header
        let limit = self.config.max_content_length;
        if let Some(declared) = response.content_length() {
            if declared > limit {
                return Err(Error::ResponseTooLarge {
                    size: declared,
                    limit,
                });
            }
        }

        let body = self.read_body_with_limit(response).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Read response body with size limit enforcement.
    ///
    /// Authoritative size check: stops as soon as the ceiling is crossed.
    async fn read_body_with_limit(&self, response: reqwest::Response) -> Result<Vec<u8>> {
        let limit = self.config.max_content_length;
        let mut body = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.classify(e))?;
            let size = (body.len() + chunk.len()) as u64;
            if size > limit {
                return Err(Error::ResponseTooLarge { size, limit });
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body)
    }

    /// Map a reqwest failure onto the error taxonomy.
    fn classify(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            return Error::Timeout(self.config.timeout);
        }
        Error::Transport(transport_message(err))
    }
}

/// Describe a transport failure without echoing the request URL.
fn transport_message(err: reqwest::Error) -> String {
    let what = if err.is_connect() {
        "connection failed"
    } else if err.is_body() || err.is_decode() {
        "failed to read response body"
    } else {
        "request failed"
    };

    let err = err.without_url();
    let mut message = what.to_string();
    let mut source = StdError::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = StdError::source(cause);
    }
    message
}

/// Install the ring rustls provider once per process.
///
/// reqwest is built with `rustls-no-provider`, so TLS needs a process-wide
/// default before the first HTTPS request.
fn install_crypto_provider() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        // Err means another provider is already installed, which is fine
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}
