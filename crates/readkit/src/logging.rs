//! Logging support for Readkit
//!
//! Structured logging goes through `tracing` when the `logging` feature is
//! enabled. Values that reach a log line pass through [`LogConfig`] first so
//! targets never leak credentials or query secrets.
//!
//! # Log Levels
//!
//! - **WARN**: policy rejections (reason only, never the host), fetch failures
//! - **DEBUG**: outbound request start and completion
//!
//! Blocked targets are never logged by host or URL.

use std::borrow::Cow;
use url::Url;

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether to redact URLs in logs (default: true)
    pub redact_sensitive: bool,

    /// Maximum length of logged values before truncation (default: 200)
    pub max_value_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            redact_sensitive: true,
            max_value_length: 200,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable URL redaction (UNSAFE - use only for debugging)
    ///
    /// # Warning
    ///
    /// Query strings may carry tokens or session ids.
    pub fn unsafe_disable_redaction(mut self) -> Self {
        self.redact_sensitive = false;
        self
    }

    /// Set maximum length for logged values
    pub fn max_value_length(mut self, len: usize) -> Self {
        self.max_value_length = len;
        self
    }

    /// Reduce a URL to `scheme://host[:port]/path` for logging.
    ///
    /// Userinfo, query and fragment are dropped. Unparsable input is
    /// sanitized and truncated instead.
    pub fn redact_url<'a>(&self, url: &'a str) -> Cow<'a, str> {
        if !self.redact_sensitive {
            return self.truncate(url);
        }

        match Url::parse(url) {
            Ok(mut parsed) => {
                let had_extras = !parsed.username().is_empty()
                    || parsed.password().is_some()
                    || parsed.query().is_some()
                    || parsed.fragment().is_some();
                if !had_extras {
                    return self.truncate(url);
                }
                // Can only fail for cannot-be-a-base URLs, which have no userinfo
                let _ = parsed.set_username("");
                let _ = parsed.set_password(None);
                parsed.set_query(None);
                parsed.set_fragment(None);
                Cow::Owned(self.truncate(parsed.as_str()).into_owned())
            }
            Err(_) => Cow::Owned(self.truncate(&sanitize_for_log(url)).into_owned()),
        }
    }

    /// Truncate value if it exceeds max length
    ///
    /// Handles UTF-8 char boundaries properly to avoid panics on multi-byte chars.
    fn truncate<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if value.len() <= self.max_value_length {
            Cow::Borrowed(value)
        } else {
            let mut end = self.max_value_length;
            while end > 0 && !value.is_char_boundary(end) {
                end -= 1;
            }
            Cow::Owned(format!(
                "{}...[truncated {} bytes]",
                &value[..end],
                value.len() - end
            ))
        }
    }
}

/// Escape control characters that could forge log lines.
pub fn sanitize_for_log(input: &str) -> String {
    input
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}
