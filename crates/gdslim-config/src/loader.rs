//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.gdslim/config.toml`
//! 2. Local config: `.gdslim/config.toml` (in the plugin root)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{ConfigOverrides, GdslimConfig, LoggingConfig, ProjectConfig, ScanSettings};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Configuration directory name, global and local.
const CONFIG_DIR: &str = ".gdslim";

/// Configuration loader with global/local merge support.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.gdslim`)
    global_config_dir: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.gdslim`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(CONFIG_DIR));

        Self { global_config_dir }
    }

    /// Create a loader with a custom global config directory.
    ///
    /// Useful for testing.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a plugin root.
    pub fn local_config_path(&self, root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration for a plugin root with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides.
    pub fn load(
        &self,
        root: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<GdslimConfig, ConfigError> {
        let mut config = GdslimConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        if let Some(local_config) = self.load_local(root)? {
            config = merge_configs(config, local_config);
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&self) -> Result<Option<GdslimConfig>, ConfigError> {
        let Some(global_path) = self.global_config_path() else {
            debug!("no home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("loading global config from {:?}", global_path);
        load_config_file(&global_path).map(Some)
    }

    /// Load only the local configuration for a plugin root.
    pub fn load_local(&self, root: &Path) -> Result<Option<GdslimConfig>, ConfigError> {
        let local_path = self.local_config_path(root);

        if !local_path.exists() {
            trace!("local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Load a specific configuration file, bypassing the merge.
    pub fn load_file(&self, path: &Path) -> Result<GdslimConfig, ConfigError> {
        load_config_file(path)
    }

    /// Save configuration to the local config file for a plugin root.
    pub fn save_local(&self, root: &Path, config: &GdslimConfig) -> Result<(), ConfigError> {
        let local_path = self.local_config_path(root);
        save_config_file(&local_path, config)
    }

    /// Initialize local configuration for a plugin root.
    ///
    /// Creates `.gdslim/config.toml` with default configuration if absent.
    pub fn init_local(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        let local_dir = root.join(CONFIG_DIR);

        if !local_dir.exists() {
            std::fs::create_dir_all(&local_dir)
                .map_err(|e| ConfigError::create_dir(&local_dir, e))?;
        }

        let config_path = local_dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            save_config_file(&config_path, &GdslimConfig::default())?;
        }

        Ok(config_path)
    }
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<GdslimConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Save a configuration file to disk.
fn save_config_file(path: &Path, config: &GdslimConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// Field-by-field: an overlay value that differs from the default wins,
/// otherwise the base value is kept.
fn merge_configs(base: GdslimConfig, overlay: GdslimConfig) -> GdslimConfig {
    GdslimConfig {
        project: merge_project(base.project, overlay.project),
        scan: merge_scan(base.scan, overlay.scan),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

fn merge_project(base: ProjectConfig, overlay: ProjectConfig) -> ProjectConfig {
    let defaults = ProjectConfig::default();
    ProjectConfig {
        sconstruct: if overlay.sconstruct != defaults.sconstruct {
            overlay.sconstruct
        } else {
            base.sconstruct
        },
        api_json: if overlay.api_json != defaults.api_json {
            overlay.api_json
        } else {
            base.api_json
        },
        extra_scan_dirs: if overlay.extra_scan_dirs != defaults.extra_scan_dirs {
            overlay.extra_scan_dirs
        } else {
            base.extra_scan_dirs
        },
    }
}

fn merge_scan(base: ScanSettings, overlay: ScanSettings) -> ScanSettings {
    ScanSettings {
        // Overlay excludes extend base excludes.
        exclude_dirs: {
            let mut dirs = base.exclude_dirs;
            for dir in overlay.exclude_dirs {
                if !dirs.contains(&dir) {
                    dirs.push(dir);
                }
            }
            dirs
        },
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: if overlay.level != "info" {
            overlay.level
        } else {
            base.level
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_local_config(content: &str, root: &Path) -> PathBuf {
        let config_dir = root.join(CONFIG_DIR);
        std::fs::create_dir_all(&config_dir).unwrap();
        let path = config_dir.join(CONFIG_FILE_NAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_default_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let config = loader.load(temp.path(), None).unwrap();

        assert_eq!(config, GdslimConfig::default());
    }

    #[test]
    fn test_load_local_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        create_local_config(
            r#"
            [project]
            api_json = "api/extension_api.json"

            [logging]
            level = "debug"
            "#,
            temp.path(),
        );

        let config = loader.load(temp.path(), None).unwrap();

        assert_eq!(
            config.project.api_json,
            PathBuf::from("api/extension_api.json")
        );
        assert_eq!(config.logging.level, "debug");
        // Unspecified fields stay default.
        assert_eq!(config.project.sconstruct, PathBuf::from("SConstruct"));
    }

    #[test]
    fn test_local_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global_dir = temp.path().join("global");

        std::fs::create_dir_all(&global_dir).unwrap();
        std::fs::write(
            global_dir.join(CONFIG_FILE_NAME),
            r#"
            [logging]
            level = "warn"

            [scan]
            exclude_dirs = ["gen"]
            "#,
        )
        .unwrap();

        create_local_config(
            r#"
            [scan]
            exclude_dirs = ["third_party"]
            "#,
            temp.path(),
        );

        let loader = ConfigLoader::with_global_dir(&global_dir);
        let config = loader.load(temp.path(), None).unwrap();

        // Global level preserved, scan excludes merged.
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.scan.exclude_dirs, vec!["gen", "third_party"]);
    }

    #[test]
    fn test_cli_overrides_all() {
        let temp = TempDir::new().unwrap();

        create_local_config(
            r#"
            [logging]
            level = "debug"
            "#,
            temp.path(),
        );

        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let overrides = ConfigOverrides {
            log_level: Some("trace".to_string()),
            api_json: Some(PathBuf::from("/cli/extension_api.json")),
            ..Default::default()
        };

        let config = loader.load(temp.path(), Some(&overrides)).unwrap();

        assert_eq!(config.logging.level, "trace");
        assert_eq!(
            config.project.api_json,
            PathBuf::from("/cli/extension_api.json")
        );
    }

    #[test]
    fn test_malformed_local_config_fails() {
        let temp = TempDir::new().unwrap();
        create_local_config("[project\nbroken", temp.path());

        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let err = loader.load(temp.path(), None).unwrap_err();

        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let mut config = GdslimConfig::default();
        config.logging.level = "debug".to_string();
        config.scan.exclude_dirs = vec!["vendor".to_string()];

        loader.save_local(temp.path(), &config).unwrap();
        let loaded = loader.load(temp.path(), None).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_init_local_creates_config() {
        let temp = TempDir::new().unwrap();
        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));

        let config_path = loader.init_local(temp.path()).unwrap();

        assert!(config_path.exists());
        assert!(config_path.ends_with(".gdslim/config.toml"));

        // Should be valid TOML.
        let content = std::fs::read_to_string(&config_path).unwrap();
        let _: GdslimConfig = toml::from_str(&content).unwrap();
    }

    #[test]
    fn test_load_file_bypasses_merge() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            [logging]
            level = "error"
            "#,
        )
        .unwrap();

        let loader = ConfigLoader::with_global_dir(temp.path().join("global"));
        let config = loader.load_file(&path).unwrap();

        assert_eq!(config.logging.level, "error");
    }
}
