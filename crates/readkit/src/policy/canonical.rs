//! Normalization of raw user input into a [`CanonicalUrl`]

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

use super::host::{self, HostClassification};
use crate::error::{Error, Result};

/// Leading `scheme://`, scheme per RFC 3986.
static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*://").unwrap());

/// Scheme assumed for bare input like `example.com/a`.
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// A validated, absolute `http`/`https` URL with no credentials and a host
/// the network policy allows.
///
/// Only [`validate`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    /// Full href.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Either `http` or `https`.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Host as serialized in the href (IPv6 in brackets).
    pub fn host_str(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Parsed host, as the network policy judged it.
    pub fn host(&self) -> Option<url::Host<&str>> {
        self.0.host()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl FromStr for CanonicalUrl {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        validate(raw)
    }
}

/// Validate raw user input against the network policy.
///
/// Fails with [`Error::InvalidInput`] or [`Error::BlockedTarget`]. Purely
/// local: nothing here touches the network.
pub fn validate(raw: &str) -> Result<CanonicalUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid("please enter a URL"));
    }

    let with_scheme = if SCHEME_PREFIX.is_match(raw) {
        raw.to_string()
    } else {
        format!("{DEFAULT_SCHEME_PREFIX}{raw}")
    };

    let url = Url::parse(&with_scheme).map_err(|_| Error::invalid("malformed URL"))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid("only http/https URLs are supported"));
    }

    // Rejected rather than stripped
    if !url.username().is_empty() || url.password().is_some() {
        return Err(Error::invalid(
            "URLs with a username or password are not supported",
        ));
    }

    let classification = url
        .host()
        .map_or_else(|| host::classify_host(""), |h| host::classify(&h));
    if let HostClassification::Blocked(reason) = classification {
        #[cfg(feature = "logging")]
        tracing::warn!(reason = %reason, "target rejected by network policy");
        return Err(Error::BlockedTarget(reason));
    }

    Ok(CanonicalUrl(url))
}
