//! CLI command implementations
//!
//! This module contains all gdslim command implementations.

pub mod classify;
pub mod detect;
pub mod set;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gdslim_config::{ConfigLoader, GdslimConfig};
use gdslim_core::ClassCatalogue;

use crate::GlobalOptions;

/// Resolve the plugin root from options or the current directory.
pub fn resolve_root(global: &GlobalOptions) -> Result<PathBuf> {
    if let Some(ref root) = global.root {
        return root
            .canonicalize()
            .with_context(|| format!("failed to resolve plugin root '{}'", root.display()));
    }

    std::env::current_dir().context("failed to get current directory")
}

/// Load configuration with optional config file override.
pub fn load_config(global: &GlobalOptions, root: &Path) -> Result<GdslimConfig> {
    let loader = ConfigLoader::new();

    let mut config = if let Some(ref path) = global.config {
        loader
            .load_file(path)
            .with_context(|| format!("failed to load config file '{}'", path.display()))?
    } else {
        loader
            .load(root, None)
            .context("failed to load configuration")?
    };

    config.apply_overrides(&global.to_config_overrides());
    Ok(config)
}

/// Load the class catalogue configured for this plugin.
pub fn load_catalogue(config: &GdslimConfig, root: &Path) -> Result<ClassCatalogue> {
    let path = config.api_json_path(root);
    ClassCatalogue::from_path(&path)
        .with_context(|| format!("failed to load class catalogue from '{}'", path.display()))
}

/// Read the SConstruct into memory, returning its path and content.
pub fn read_sconstruct(config: &GdslimConfig, root: &Path) -> Result<(PathBuf, String)> {
    let path = config.sconstruct_path(root);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read SConstruct at '{}'", path.display()))?;
    Ok((path, content))
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}

/// Print a warning message to stderr.
pub fn print_warning(message: &str) {
    eprintln!("warning: {}", message);
}
