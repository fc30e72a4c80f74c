//! Host classification for the network policy
//!
//! Judges the literal host string of a URL, never its DNS resolution. The
//! policy is an ordered rule table: the first rule whose predicate matches
//! blocks the host and supplies the reason. Hosts no rule matches are allowed.

use serde::Serialize;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Why a host was blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockReason {
    /// 127.0.0.0/8 or `::1`
    Loopback,
    /// 10.0.0.0/8, 172.16.0.0/12, 192.168.0.0/16
    PrivateRange,
    /// 169.254.0.0/16 or `fe80:` prefixed IPv6
    LinkLocal,
    /// fc00::/7, or IPv6 text starting with `fc`/`fd`
    UniqueLocal,
    /// 0.0.0.0/8 or `::`
    ReservedZero,
    /// `localhost` and `*.localhost`
    LocalhostName,
    /// `*.local`
    InternalTld,
    /// Empty or otherwise unusable host
    UnparsableAddress,
}

impl BlockReason {
    /// Stable kebab-case name of the rule.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loopback => "loopback",
            Self::PrivateRange => "private-range",
            Self::LinkLocal => "link-local",
            Self::UniqueLocal => "unique-local",
            Self::ReservedZero => "reserved-zero",
            Self::LocalhostName => "localhost-name",
            Self::InternalTld => "internal-tld",
            Self::UnparsableAddress => "unparsable-address",
        }
    }
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostClassification {
    Allowed,
    Blocked(BlockReason),
}

impl HostClassification {
    pub fn is_blocked(self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    /// Reason for blocking, if blocked.
    pub fn reason(self) -> Option<BlockReason> {
        match self {
            Self::Allowed => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}

/// A host as seen by the rules: lowercased, trimmed, brackets stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Empty,
    Name(String),
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Target {
    fn parse(host: &str) -> Self {
        let normalized = host.trim().to_ascii_lowercase();
        let bare = normalized
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(&normalized);

        if bare.is_empty() {
            return Self::Empty;
        }
        if let Ok(ip) = bare.parse::<Ipv4Addr>() {
            return Self::V4(ip);
        }
        if let Ok(ip) = bare.parse::<Ipv6Addr>() {
            return Self::V6(ip);
        }
        // Decimal, hex, octal and short forms, read the way a URL parser does
        if let Ok(url::Host::Ipv4(ip)) = url::Host::parse(bare) {
            return Self::V4(ip);
        }
        Self::name(bare)
    }

    fn name(name: &str) -> Self {
        // `localhost.` is the same name as `localhost`
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.is_empty() {
            Self::Empty
        } else {
            Self::Name(name.to_string())
        }
    }

    fn from_url_host(host: &url::Host<&str>) -> Self {
        match host {
            url::Host::Domain(name) => Self::parse(name),
            url::Host::Ipv4(ip) => Self::V4(*ip),
            url::Host::Ipv6(ip) => Self::V6(*ip),
        }
    }
}

struct Rule {
    reason: BlockReason,
    matches: fn(&Target) -> bool,
}

/// Ordered policy table. Earlier rules win.
const RULES: &[Rule] = &[
    Rule {
        reason: BlockReason::UnparsableAddress,
        matches: is_empty,
    },
    Rule {
        reason: BlockReason::LocalhostName,
        matches: is_localhost_name,
    },
    Rule {
        reason: BlockReason::InternalTld,
        matches: is_local_tld,
    },
    Rule {
        reason: BlockReason::PrivateRange,
        matches: is_ten_slash_eight,
    },
    Rule {
        reason: BlockReason::Loopback,
        matches: is_loopback,
    },
    Rule {
        reason: BlockReason::ReservedZero,
        matches: is_reserved_zero,
    },
    Rule {
        reason: BlockReason::LinkLocal,
        matches: is_link_local,
    },
    Rule {
        reason: BlockReason::PrivateRange,
        matches: is_192_168,
    },
    Rule {
        reason: BlockReason::PrivateRange,
        matches: is_172_16_to_31,
    },
    Rule {
        reason: BlockReason::UniqueLocal,
        matches: is_unique_local,
    },
];

fn is_empty(t: &Target) -> bool {
    matches!(t, Target::Empty)
}

fn is_localhost_name(t: &Target) -> bool {
    matches!(t, Target::Name(n) if n == "localhost" || n.ends_with(".localhost"))
}

fn is_local_tld(t: &Target) -> bool {
    matches!(t, Target::Name(n) if n.ends_with(".local"))
}

fn is_ten_slash_eight(t: &Target) -> bool {
    matches!(t, Target::V4(ip) if ip.octets()[0] == 10)
}

fn is_loopback(t: &Target) -> bool {
    match t {
        Target::V4(ip) => ip.octets()[0] == 127,
        Target::V6(ip) => *ip == Ipv6Addr::LOCALHOST,
        _ => false,
    }
}

fn is_reserved_zero(t: &Target) -> bool {
    match t {
        Target::V4(ip) => ip.octets()[0] == 0,
        Target::V6(ip) => *ip == Ipv6Addr::UNSPECIFIED,
        _ => false,
    }
}

fn is_link_local(t: &Target) -> bool {
    match t {
        Target::V4(ip) => matches!(ip.octets(), [169, 254, _, _]),
        // Canonical text starts with `fe80:` exactly when the first group is fe80
        Target::V6(ip) => ip.segments()[0] == 0xfe80,
        _ => false,
    }
}

fn is_192_168(t: &Target) -> bool {
    matches!(t, Target::V4(ip) if matches!(ip.octets(), [192, 168, _, _]))
}

fn is_172_16_to_31(t: &Target) -> bool {
    matches!(t, Target::V4(ip) if ip.octets()[0] == 172 && (16..=31).contains(&ip.octets()[1]))
}

fn is_unique_local(t: &Target) -> bool {
    match t {
        // fc00::/7, plus any literal whose compressed text starts with
        // `fc`/`fd` (`fc::1` has first group 0x00fc)
        Target::V6(ip) => {
            let text = ip.to_string();
            (ip.segments()[0] & 0xfe00) == 0xfc00
                || text.starts_with("fc")
                || text.starts_with("fd")
        }
        _ => false,
    }
}

fn evaluate(target: &Target) -> HostClassification {
    RULES
        .iter()
        .find(|rule| (rule.matches)(target))
        .map_or(HostClassification::Allowed, |rule| {
            HostClassification::Blocked(rule.reason)
        })
}

/// Classify a hostname string.
///
/// Case-insensitive, trims whitespace, accepts bracketed IPv6 literals.
/// Numeric IPv4 forms such as `2130706433` or `0x7f.1` are read as the
/// address they denote, matching what [`classify`] sees after URL parsing.
/// No I/O: a name that resolves to a private address is still allowed.
pub fn classify_host(host: &str) -> HostClassification {
    evaluate(&Target::parse(host))
}

/// Classify an already-parsed URL host.
pub fn classify(host: &url::Host<&str>) -> HostClassification {
    evaluate(&Target::from_url_host(host))
}
