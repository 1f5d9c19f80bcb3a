//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/doclineage/doclineage.toml`
//! 3. Local config: an explicit file passed with `--config`
//! 4. Environment variables: `DOCLINEAGE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// Unified configuration for doclineage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Label of the synthetic top-level node of every tree
    pub root_label: String,
    /// Separator between labels in materialized paths
    pub path_separator: String,
    /// Issuing organisation abbreviation used in copy symbols
    pub org_abbreviation: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_label: "(root)".into(),
            path_separator: "/".into(),
            org_abbreviation: "UBND".into(),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_label: Option<String>,
    pub path_separator: Option<String>,
    pub org_abbreviation: Option<String>,
}

/// Get the XDG config directory for doclineage.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "doclineage").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("doclineage.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            path_separator: overlay
                .path_separator
                .clone()
                .unwrap_or_else(|| self.path_separator.clone()),
            org_abbreviation: overlay
                .org_abbreviation
                .clone()
                .unwrap_or_else(|| self.org_abbreviation.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file; unlike the global file it
    ///   must exist when given
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Local config
        if let Some(local_path) = local_config {
            debug!("loading local config {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply DOCLINEAGE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DOCLINEAGE").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("path_separator") {
            settings.path_separator = val;
        }
        if let Ok(val) = config.get_string("org_abbreviation") {
            settings.org_abbreviation = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# doclineage configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/doclineage/doclineage.toml
#   Local:  file passed with --config
#   Env:    DOCLINEAGE_* environment variables

# Label of the synthetic top-level tree node
# root_label = "(root)"

# Separator for materialized label paths
# path_separator = "/"

# Organisation abbreviation used in copy symbols (05/SY-UBND)
# org_abbreviation = "UBND"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
