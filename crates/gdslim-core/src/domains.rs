//! Feature-Domain Classification
//!
//! Buckets every catalogue class into zero or more feature domains (2D, 3D,
//! XR, networking, ...) using a static rule table evaluated over class names
//! and ancestry. Rules overlap: a class may land in several buckets, and all
//! rules are checked for every class.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalogue::ClassCatalogue;

/// A feature domain used to decide default inclusion/exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[serde(rename = "2d")]
    TwoD,
    #[serde(rename = "3d")]
    ThreeD,
    Xr,
    Networking,
    Navigation,
    Editor,
    Animation,
    Ui,
}

impl Domain {
    /// All domains, in display order.
    pub const ALL: [Domain; 8] = [
        Domain::TwoD,
        Domain::ThreeD,
        Domain::Xr,
        Domain::Networking,
        Domain::Navigation,
        Domain::Editor,
        Domain::Animation,
        Domain::Ui,
    ];

    /// Domains a dimension preset lets the user additionally opt out of.
    pub const OPTIONAL: [Domain; 6] = [
        Domain::Xr,
        Domain::Networking,
        Domain::Navigation,
        Domain::Editor,
        Domain::Animation,
        Domain::Ui,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::TwoD => "2d",
            Domain::ThreeD => "3d",
            Domain::Xr => "xr",
            Domain::Networking => "networking",
            Domain::Navigation => "navigation",
            Domain::Editor => "editor",
            Domain::Animation => "animation",
            Domain::Ui => "ui",
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unrecognized domain names.
#[derive(Debug, Error)]
#[error("unknown domain '{0}' (expected one of: 2d, 3d, xr, networking, navigation, editor, animation, ui)")]
pub struct UnknownDomain(String);

impl std::str::FromStr for Domain {
    type Err = UnknownDomain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "2d" => Ok(Domain::TwoD),
            "3d" => Ok(Domain::ThreeD),
            "xr" => Ok(Domain::Xr),
            "networking" => Ok(Domain::Networking),
            "navigation" => Ok(Domain::Navigation),
            "editor" => Ok(Domain::Editor),
            "animation" => Ok(Domain::Animation),
            "ui" => Ok(Domain::Ui),
            _ => Err(UnknownDomain(s.to_string())),
        }
    }
}

/// Classified buckets: domain → member class names.
pub type DomainBuckets = BTreeMap<Domain, BTreeSet<String>>;

/// A predicate over a class name and its ancestry.
#[derive(Debug)]
enum NamePattern {
    /// Lowercased name ends with the suffix.
    SuffixCi(&'static str),
    /// Name starts with the prefix (case-sensitive).
    Prefix(&'static str),
    /// Name equals exactly.
    Exact(&'static str),
    /// Lowercased name contains any of the needles.
    ContainsAnyCi(&'static [&'static str]),
    /// Class transitively inherits from the named base.
    DescendantOf(&'static str),
}

impl NamePattern {
    fn matches(&self, name: &str, lower: &str, catalogue: &ClassCatalogue) -> bool {
        match self {
            NamePattern::SuffixCi(suffix) => lower.ends_with(suffix),
            NamePattern::Prefix(prefix) => name.starts_with(prefix),
            NamePattern::Exact(exact) => name == *exact,
            NamePattern::ContainsAnyCi(needles) => needles.iter().any(|n| lower.contains(n)),
            NamePattern::DescendantOf(base) => catalogue.is_descendant_of(name, base),
        }
    }
}

/// One classification rule: a class matching any pattern joins the domain.
#[derive(Debug)]
struct DomainRule {
    domain: Domain,
    any_of: &'static [NamePattern],
}

const NETWORK_KEYWORDS: &[&str] = &[
    "network",
    "http",
    "websocket",
    "multiplayer",
    "udp",
    "tcp",
    "packetpeer",
    "webrtc",
];

/// The classification table. Order only affects bucket fill order, never
/// membership - every rule is evaluated for every class.
const RULES: &[DomainRule] = &[
    DomainRule {
        domain: Domain::TwoD,
        any_of: &[
            NamePattern::SuffixCi("2d"),
            NamePattern::DescendantOf("Node2D"),
        ],
    },
    DomainRule {
        domain: Domain::ThreeD,
        any_of: &[
            NamePattern::SuffixCi("3d"),
            NamePattern::DescendantOf("Node3D"),
        ],
    },
    DomainRule {
        domain: Domain::Xr,
        any_of: &[
            NamePattern::Prefix("XR"),
            NamePattern::Exact("WebXRInterface"),
        ],
    },
    DomainRule {
        domain: Domain::Networking,
        any_of: &[NamePattern::ContainsAnyCi(NETWORK_KEYWORDS)],
    },
    DomainRule {
        domain: Domain::Navigation,
        any_of: &[NamePattern::ContainsAnyCi(&["navigation"])],
    },
    DomainRule {
        domain: Domain::Editor,
        any_of: &[
            NamePattern::DescendantOf("EditorPlugin"),
            NamePattern::ContainsAnyCi(&["editor"]),
        ],
    },
    DomainRule {
        domain: Domain::Animation,
        any_of: &[
            NamePattern::ContainsAnyCi(&["animation"]),
            NamePattern::DescendantOf("AnimationPlayer"),
            NamePattern::DescendantOf("AnimationMixer"),
            NamePattern::DescendantOf("AnimationTree"),
        ],
    },
    DomainRule {
        domain: Domain::Ui,
        any_of: &[NamePattern::DescendantOf("Control")],
    },
];

/// Classify every catalogue class into its feature-domain buckets.
///
/// Pure function of the catalogue: identical input yields identical buckets.
/// Every domain is present in the result, possibly with an empty bucket.
pub fn classify(catalogue: &ClassCatalogue) -> DomainBuckets {
    let mut buckets: DomainBuckets = Domain::ALL
        .iter()
        .map(|d| (*d, BTreeSet::new()))
        .collect();

    for name in catalogue.names() {
        let lower = name.to_lowercase();
        for rule in RULES {
            if rule
                .any_of
                .iter()
                .any(|pattern| pattern.matches(name, &lower, catalogue))
            {
                buckets
                    .entry(rule.domain)
                    .or_default()
                    .insert(name.to_string());
            }
        }
    }

    buckets
}
