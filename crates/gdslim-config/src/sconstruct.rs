//! SConstruct Interface
//!
//! The plugin's SConstruct carries three mutually-exclusive profile flags
//! and the source/include directory options. The SConstruct is externally
//! owned: these functions parse from and substitute into its text, and the
//! caller decides when to persist the result.

use regex::Regex;
use tracing::warn;

use crate::error::ConfigError;

/// Flag declaration names expected in the SConstruct.
pub const FLAG_2D: &str = "is_2d_profile_used";
pub const FLAG_3D: &str = "is_3d_profile_used";
pub const FLAG_CUSTOM: &str = "is_custom_profile_used";

/// Which build profile is active. At most one flag is true; none true
/// means every engine class is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileMode {
    #[default]
    None,
    TwoD,
    ThreeD,
    Custom,
}

impl ProfileMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileMode::None => "none",
            ProfileMode::TwoD => "2d",
            ProfileMode::ThreeD => "3d",
            ProfileMode::Custom => "custom",
        }
    }

    /// Profile file consumed by the build for this mode, relative to the
    /// plugin root. `None` mode has no profile file.
    pub fn profile_file_name(&self) -> Option<&'static str> {
        match self {
            ProfileMode::None => None,
            ProfileMode::TwoD => Some("2d_build_profile.json"),
            ProfileMode::ThreeD => Some("3d_build_profile.json"),
            ProfileMode::Custom => Some("build_profile.json"),
        }
    }
}

impl std::fmt::Display for ProfileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three profile flag declarations, as read from or destined for the
/// SConstruct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileModeFlags {
    pub use_2d: bool,
    pub use_3d: bool,
    pub use_custom: bool,
}

impl ProfileModeFlags {
    /// Flags for a given mode. The only constructor that sets a flag, so a
    /// record built here never has two set.
    pub fn from_mode(mode: ProfileMode) -> Self {
        match mode {
            ProfileMode::None => Self::default(),
            ProfileMode::TwoD => Self {
                use_2d: true,
                ..Self::default()
            },
            ProfileMode::ThreeD => Self {
                use_3d: true,
                ..Self::default()
            },
            ProfileMode::Custom => Self {
                use_custom: true,
                ..Self::default()
            },
        }
    }

    /// The active mode, resolved in declaration order.
    pub fn mode(&self) -> ProfileMode {
        if self.use_2d {
            ProfileMode::TwoD
        } else if self.use_3d {
            ProfileMode::ThreeD
        } else if self.use_custom {
            ProfileMode::Custom
        } else {
            ProfileMode::None
        }
    }

    /// Whether any profile is active.
    pub fn any(&self) -> bool {
        self.use_2d || self.use_3d || self.use_custom
    }

    /// Parse the three declarations out of SConstruct text.
    ///
    /// Every declaration must be present as `name = True` or
    /// `name = False` on its own line; a missing one is fatal.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            use_2d: parse_flag(content, FLAG_2D)?,
            use_3d: parse_flag(content, FLAG_3D)?,
            use_custom: parse_flag(content, FLAG_CUSTOM)?,
        })
    }

    /// Return the SConstruct text with all three declarations rewritten to
    /// this record's values. Exact textual substitution; everything else in
    /// the file is untouched.
    pub fn apply(&self, content: &str) -> Result<String, ConfigError> {
        let content = apply_flag(content, FLAG_2D, self.use_2d)?;
        let content = apply_flag(&content, FLAG_3D, self.use_3d)?;
        apply_flag(&content, FLAG_CUSTOM, self.use_custom)
    }
}

/// Line-anchored matcher for one flag declaration.
fn flag_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r"(?m)^{}\s*=\s*(True|False)\s*$",
        regex::escape(name)
    ))
    .expect("invalid flag pattern")
}

fn parse_flag(content: &str, name: &str) -> Result<bool, ConfigError> {
    let caps = flag_pattern(name)
        .captures(content)
        .ok_or_else(|| ConfigError::flag_not_found(name))?;
    Ok(&caps[1] == "True")
}

fn apply_flag(content: &str, name: &str, value: bool) -> Result<String, ConfigError> {
    let pattern = flag_pattern(name);
    if !pattern.is_match(content) {
        return Err(ConfigError::flag_not_found(name));
    }
    let replacement = format!("{} = {}", name, if value { "True" } else { "False" });
    Ok(pattern.replace_all(content, replacement.as_str()).into_owned())
}

/// Source and include directories declared through `opts.Add(...)` in the
/// SConstruct, comma-separated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDirs {
    pub source_dirs: Vec<String>,
    pub include_dirs: Vec<String>,
}

impl Default for BuildDirs {
    fn default() -> Self {
        Self {
            source_dirs: vec!["src".to_string()],
            include_dirs: vec!["src".to_string()],
        }
    }
}

impl BuildDirs {
    /// Extract the directory options from SConstruct text.
    ///
    /// A missing option falls back to `src` with a warning - unlike the
    /// profile flags this is not fatal, the conventional layout works.
    pub fn parse(content: &str) -> Self {
        let defaults = Self::default();
        Self {
            source_dirs: parse_dirs_option(content, "source_dirs")
                .unwrap_or(defaults.source_dirs),
            include_dirs: parse_dirs_option(content, "include_dirs")
                .unwrap_or(defaults.include_dirs),
        }
    }

    /// All declared directories, source first, deduplicated.
    pub fn all_dirs(&self) -> Vec<String> {
        let mut dirs = Vec::new();
        for dir in self.source_dirs.iter().chain(self.include_dirs.iter()) {
            if !dirs.contains(dir) {
                dirs.push(dir.clone());
            }
        }
        dirs
    }
}

fn parse_dirs_option(content: &str, option: &str) -> Option<Vec<String>> {
    let pattern = Regex::new(&format!(
        r"opts\.Add\('{}',\s*'[^']*',\s*'([^']+)'\)",
        regex::escape(option)
    ))
    .expect("invalid dirs pattern");

    match pattern.captures(content) {
        Some(caps) => Some(
            caps[1]
                .split(',')
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty())
                .collect(),
        ),
        None => {
            warn!(option, "option not found in SConstruct, using default 'src'");
            None
        }
    }
}
