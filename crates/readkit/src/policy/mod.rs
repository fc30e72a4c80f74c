//! URL policy for outbound reads
//!
//! Turns untrusted user input into a [`CanonicalUrl`] or rejects it.
//!
//! # Security Model
//!
//! - Only `http` and `https` are accepted; bare domains get `https://`
//! - URLs carrying a username or password are rejected, never stripped
//! - Hosts are judged by an ordered rule table over the literal host
//!   (loopback, private ranges, link-local, unique-local, `localhost`, `.local`)
//! - Every decision is local: no DNS lookup or connection happens here
//!
//! # Limitations
//!
//! A public name that resolves to a private address passes. The IPv4 table is
//! a baseline, not a full reserved-range list (CGNAT and multicast pass).

mod canonical;
mod host;

pub use canonical::{CanonicalUrl, DEFAULT_SCHEME_PREFIX, validate};
pub use host::{BlockReason, HostClassification, classify, classify_host};
