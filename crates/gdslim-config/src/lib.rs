//! gdslim Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.gdslim/config.toml`
//! - Local config: `.gdslim/config.toml` (in the plugin root)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.
//!
//! The [`sconstruct`] module covers the other configuration surface this
//! tool touches: the profile flags and directory options inside the
//! plugin's SConstruct.

mod error;
mod loader;
pub mod sconstruct;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use sconstruct::{
    BuildDirs, ProfileMode, ProfileModeFlags, FLAG_2D, FLAG_3D, FLAG_CUSTOM,
};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration for gdslim.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GdslimConfig {
    /// Plugin project layout
    pub project: ProjectConfig,

    /// Usage-scan configuration
    pub scan: ScanSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Plugin project layout: where the build files live relative to the
/// plugin root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProjectConfig {
    /// SConstruct path
    pub sconstruct: PathBuf,

    /// Class catalogue (`extension_api.json`) path
    pub api_json: PathBuf,

    /// godot-cpp directories scanned in addition to the SConstruct's
    /// source/include dirs. The generated bindings directory is
    /// deliberately absent - generated code must not count as usage.
    pub extra_scan_dirs: Vec<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            sconstruct: PathBuf::from("SConstruct"),
            api_json: PathBuf::from("godot-cpp/gdextension/extension_api.json"),
            extra_scan_dirs: vec![
                PathBuf::from("godot-cpp/gdextension"),
                PathBuf::from("godot-cpp/include"),
                PathBuf::from("godot-cpp/src"),
            ],
        }
    }
}

/// Usage-scan settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ScanSettings {
    /// Directory names skipped during the scan (hidden directories always
    /// are).
    pub exclude_dirs: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override the SConstruct path
    pub sconstruct: Option<PathBuf>,

    /// Override the catalogue path
    pub api_json: Option<PathBuf>,

    /// Override the log level
    pub log_level: Option<String>,
}

impl GdslimConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref path) = overrides.sconstruct {
            self.project.sconstruct = path.clone();
        }

        if let Some(ref path) = overrides.api_json {
            self.project.api_json = path.clone();
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Resolve the SConstruct path against the plugin root.
    pub fn sconstruct_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.project.sconstruct)
    }

    /// Resolve the catalogue path against the plugin root.
    pub fn api_json_path(&self, root: &Path) -> PathBuf {
        resolve(root, &self.project.api_json)
    }

    /// Resolve the profile file for a mode against the plugin root.
    pub fn profile_path(&self, root: &Path, mode: ProfileMode) -> Option<PathBuf> {
        mode.profile_file_name().map(|name| root.join(name))
    }

    /// The full set of scan roots for a usage scan: the SConstruct's
    /// source and include dirs plus the configured godot-cpp dirs,
    /// deduplicated, resolved against the plugin root.
    pub fn scan_roots(&self, root: &Path, dirs: &BuildDirs) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::new();
        for dir in dirs.all_dirs() {
            push_unique(&mut roots, root.join(dir));
        }
        for dir in &self.project.extra_scan_dirs {
            push_unique(&mut roots, resolve(root, dir));
        }
        roots
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

fn push_unique(roots: &mut Vec<PathBuf>, path: PathBuf) {
    if !roots.contains(&path) {
        roots.push(path);
    }
}
