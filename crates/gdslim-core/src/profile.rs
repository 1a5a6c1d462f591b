//! Feature-Profile Artifacts
//!
//! The `feature_profile` JSON document consumed by the godot-cpp build, and
//! the generators that produce one: dimension presets built from domain
//! buckets, and custom profiles built from the closed usage set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domains::{Domain, DomainBuckets};

/// Errors while reading or writing a profile file.
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("failed to read profile '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write profile '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("profile '{path}' is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize profile: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ProfileError>;

/// The `type` value every profile document carries.
pub const PROFILE_TYPE: &str = "feature_profile";

/// Fallback enabled set when usage detection finds nothing. Nothing can be
/// instantiated without these two.
pub const MINIMAL_ENABLED: [&str; 2] = ["Object", "RefCounted"];

/// A `feature_profile` document.
///
/// Exactly one of `enabled_classes` / `disabled_classes` is populated by the
/// constructors, and class lists are kept sorted and deduplicated, so
/// regenerating an identical profile produces byte-identical JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileArtifact {
    /// Free-text description, stored under the `_` key.
    #[serde(rename = "_", default)]
    pub description: String,

    #[serde(rename = "type")]
    pub profile_type: String,

    /// Only these classes (plus implicit bases) may be compiled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_classes: Option<Vec<String>>,

    /// All catalogue classes except these are compiled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_classes: Option<Vec<String>>,
}

impl ProfileArtifact {
    /// Build an enabled-list profile.
    pub fn enabled<I, S>(description: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            profile_type: PROFILE_TYPE.to_string(),
            enabled_classes: Some(sorted(classes)),
            disabled_classes: None,
        }
    }

    /// Build a disabled-list profile.
    pub fn disabled<I, S>(description: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            profile_type: PROFILE_TYPE.to_string(),
            enabled_classes: None,
            disabled_classes: Some(sorted(classes)),
        }
    }

    /// Whether this profile carries an enabled list (as opposed to a
    /// disabled list).
    pub fn is_enabled_list(&self) -> bool {
        self.enabled_classes.is_some()
    }

    /// The class list, whichever tag it carries.
    pub fn classes(&self) -> &[String] {
        self.enabled_classes
            .as_deref()
            .or(self.disabled_classes.as_deref())
            .unwrap_or(&[])
    }

    /// The class list as a set.
    pub fn class_set(&self) -> BTreeSet<String> {
        self.classes().iter().cloned().collect()
    }

    /// Read a profile document from disk.
    pub fn read_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ProfileError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ProfileError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the profile to disk, overwriting wholesale.
    ///
    /// The in-memory artifact is unaffected by a write failure and can be
    /// written again.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(ProfileError::Serialize)?;
        std::fs::write(path, content).map_err(|e| ProfileError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), classes = self.classes().len(), "wrote profile");
        Ok(())
    }
}

fn sorted<I, S>(classes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let set: BTreeSet<String> = classes.into_iter().map(Into::into).collect();
    set.into_iter().collect()
}

/// Dimension presets: each disables the opposite dimension wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    TwoD,
    ThreeD,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::TwoD => "2d",
            Preset::ThreeD => "3d",
        }
    }

    /// The bucket this preset disables.
    pub fn disabled_domain(&self) -> Domain {
        match self {
            Preset::TwoD => Domain::ThreeD,
            Preset::ThreeD => Domain::TwoD,
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Extra domains a preset profile can additionally disable, each toggled
/// independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraDomains {
    pub xr: bool,
    pub networking: bool,
    pub navigation: bool,
    pub editor: bool,
    pub animation: bool,
    pub ui: bool,
}

impl ExtraDomains {
    /// Every optional domain opted out.
    pub fn all() -> Self {
        Self {
            xr: true,
            networking: true,
            navigation: true,
            editor: true,
            animation: true,
            ui: true,
        }
    }

    /// The opted-out domains.
    pub fn selected(&self) -> Vec<Domain> {
        Domain::OPTIONAL
            .iter()
            .copied()
            .filter(|domain| match domain {
                Domain::Xr => self.xr,
                Domain::Networking => self.networking,
                Domain::Navigation => self.navigation,
                Domain::Editor => self.editor,
                Domain::Animation => self.animation,
                Domain::Ui => self.ui,
                Domain::TwoD | Domain::ThreeD => false,
            })
            .collect()
    }
}

/// Generate a preset profile: the opposite-dimension bucket plus every
/// opted-out domain bucket, as a disabled list.
pub fn preset_profile(
    preset: Preset,
    extras: ExtraDomains,
    buckets: &DomainBuckets,
) -> ProfileArtifact {
    let mut disabled: BTreeSet<String> = buckets
        .get(&preset.disabled_domain())
        .cloned()
        .unwrap_or_default();

    for domain in extras.selected() {
        if let Some(bucket) = buckets.get(&domain) {
            disabled.extend(bucket.iter().cloned());
        }
    }

    ProfileArtifact::disabled(
        format!(
            "Auto-generated {} build profile. Edit this file to modify 'disabled_classes'.",
            preset.as_str().to_uppercase()
        ),
        disabled,
    )
}

/// The minimal enabled profile: just the two foundational base classes.
pub fn minimal_profile() -> ProfileArtifact {
    ProfileArtifact::enabled(
        "Default build profile with minimal enabled classes. Edit this file to specify \
         additional 'enabled_classes' or use 'disabled_classes'.",
        MINIMAL_ENABLED.iter().copied(),
    )
}

/// Generate a custom profile from the closed usage set, as an enabled list.
///
/// An empty set means detection found nothing; the profile falls back to
/// the minimal pair so the build stays viable, and the caller is warned.
pub fn custom_profile(closed: &BTreeSet<String>) -> ProfileArtifact {
    if closed.is_empty() {
        warn!("no engine classes detected; writing minimal enabled set");
        return minimal_profile();
    }

    ProfileArtifact::enabled(
        "Auto-generated custom build profile based on detected classes from #include \
         directives and code usage (including inheritance dependencies).",
        closed.iter().cloned(),
    )
}
