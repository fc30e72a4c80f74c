//! Guarded fetch through the extraction service
//!
//! One outbound GET per call, bounded in time and size, returning
//! normalized plain text.

mod client;
pub mod text;

pub use client::Fetcher;

use serde::{Deserialize, Serialize};

/// Text read from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// Canonical href of the requested page
    pub source_url: String,
    /// URL actually requested from the extraction service
    pub upstream_url: String,
    /// Normalized text, ending in the truncation marker when cut
    pub content: String,
    /// True if `content` was cut at the character cap
    pub truncated: bool,
}
