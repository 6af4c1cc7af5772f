//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/assetree/assetree.toml`
//! 3. Local config: `<project_dir>/.assetree.toml`
//! 4. Environment variables: `ASSETREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{LifespanThresholds, Sector};

/// External root-cause analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Command receiving the prompt on stdin and answering JSON on stdout.
    /// Unset means the built-in sample report is used.
    pub command: Option<String>,
    /// Extra arguments for the command
    pub args: Vec<String>,
}

/// Codes used to build written standard references (`AREA-SERVICE-NNNN`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StandardsConfig {
    pub area_code: String,
    pub service_code: String,
}

impl Default for StandardsConfig {
    fn default() -> Self {
        Self {
            area_code: "GMAN".into(),
            service_code: "M".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawAnalyzerConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawStandardsConfig {
    pub area_code: Option<String>,
    pub service_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLifespanConfig {
    pub warning_percent: Option<f64>,
    pub critical_percent: Option<f64>,
}

/// Raw settings for intermediate parsing.
///
/// Every field is optional so a layer only overrides what it specifies.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub default_sector: Option<Sector>,
    pub confirm_delete: Option<bool>,
    pub analyzer: RawAnalyzerConfig,
    pub standards: RawStandardsConfig,
    pub lifespan: RawLifespanConfig,
}

/// Unified configuration for assetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Sector given to new roots when none is specified
    pub default_sector: Sector,
    /// Ask before deleting a node and its subtree
    pub confirm_delete: bool,
    pub analyzer: AnalyzerConfig,
    pub standards: StandardsConfig,
    pub lifespan: LifespanThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sector: Sector::Injection,
            confirm_delete: true,
            analyzer: AnalyzerConfig::default(),
            standards: StandardsConfig::default(),
            lifespan: LifespanThresholds::default(),
        }
    }
}

/// Get the XDG config directory for assetree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "assetree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("assetree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".assetree.toml")
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
    /// Expand `~` and `$VAR` in the analyzer command.
    fn expand_paths(&mut self) {
        if let Some(command) = &self.analyzer.command {
            let expanded = shellexpand::full(command)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| command.clone());
            self.analyzer.command = Some(expanded);
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            default_sector: overlay.default_sector.unwrap_or(self.default_sector),
            confirm_delete: overlay.confirm_delete.unwrap_or(self.confirm_delete),
            analyzer: AnalyzerConfig {
                command: overlay
                    .analyzer
                    .command
                    .clone()
                    .or_else(|| self.analyzer.command.clone()),
                args: overlay
                    .analyzer
                    .args
                    .clone()
                    .unwrap_or_else(|| self.analyzer.args.clone()),
            },
            standards: StandardsConfig {
                area_code: overlay
                    .standards
                    .area_code
                    .clone()
                    .unwrap_or_else(|| self.standards.area_code.clone()),
                service_code: overlay
                    .standards
                    .service_code
                    .clone()
                    .unwrap_or_else(|| self.standards.service_code.clone()),
            },
            lifespan: LifespanThresholds {
                warning_percent: overlay
                    .lifespan
                    .warning_percent
                    .unwrap_or(self.lifespan.warning_percent),
                critical_percent: overlay
                    .lifespan
                    .critical_percent
                    .unwrap_or(self.lifespan.critical_percent),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply ASSETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ASSETREE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("analyzer.args")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("default_sector") {
            settings.default_sector = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("ASSETREE_DEFAULT_SECTOR: {e}"),
            })?;
        }
        if let Ok(val) = config.get_bool("confirm_delete") {
            settings.confirm_delete = val;
        }
        if let Ok(val) = config.get_string("analyzer.command") {
            settings.analyzer.command = Some(val);
        }
        if let Ok(val) = config.get::<Vec<String>>("analyzer.args") {
            settings.analyzer.args = val;
        }
        if let Ok(val) = config.get_string("standards.area_code") {
            settings.standards.area_code = val;
        }
        if let Ok(val) = config.get_string("standards.service_code") {
            settings.standards.service_code = val;
        }
        if let Ok(val) = config.get_float("lifespan.warning_percent") {
            settings.lifespan.warning_percent = val;
        }
        if let Ok(val) = config.get_float("lifespan.critical_percent") {
            settings.lifespan.critical_percent = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        let lifespan = &self.lifespan;
        if !(0.0..=100.0).contains(&lifespan.warning_percent)
            || !(0.0..=100.0).contains(&lifespan.critical_percent)
            || lifespan.warning_percent > lifespan.critical_percent
        {
            return Err(ApplicationError::Config {
                message: format!(
                    "lifespan thresholds must satisfy 0 <= warning ({}) <= critical ({}) <= 100",
                    lifespan.warning_percent, lifespan.critical_percent
                ),
            });
        }
        if self.standards.area_code.trim().is_empty()
            || self.standards.service_code.trim().is_empty()
        {
            return Err(ApplicationError::Config {
                message: "standards.area_code and standards.service_code must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# assetree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/assetree/assetree.toml
#   Local:  <project_dir>/.assetree.toml
#   Env:    ASSETREE_* environment variables (e.g. ASSETREE_ANALYZER__COMMAND)

# Sector for new root machines when none is given
# default_sector = "injection"

# Ask for confirmation before deleting a node and all its descendants
# confirm_delete = true

[analyzer]
# Command that reads the analysis prompt on stdin and prints a JSON report.
# Without a command the built-in sample report is returned.
# command = "~/bin/rca-llm"
# args = ["--json"]

[standards]
# Written standard references are AREA-SERVICE-NNNN
# area_code = "GMAN"
# service_code = "M"

[lifespan]
# Usage percentages for the Warning and Critical states
# warning_percent = 70.0
# critical_percent = 85.0
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.default_sector, Sector::Injection);
        assert!(settings.confirm_delete);
        assert_eq!(settings.standards.area_code, "GMAN");
        assert_eq!(settings.lifespan.critical_percent, 85.0);
    }

    #[test]
    fn given_overlay_with_partial_values_when_merging_then_keeps_base_for_rest() {
        let base = Settings::default();
        let overlay: RawSettings = toml::from_str(
            r#"
confirm_delete = false

[standards]
area_code = "PCM"

[lifespan]
warning_percent = 60.0
"#,
        )
        .unwrap();

        let result = base.merge_with(&overlay);

        assert!(!result.confirm_delete);
        assert_eq!(result.standards.area_code, "PCM");
        assert_eq!(result.standards.service_code, "M");
        assert_eq!(result.lifespan.warning_percent, 60.0);
        assert_eq!(result.lifespan.critical_percent, 85.0);
        assert_eq!(result.default_sector, Sector::Injection);
    }

    #[test]
    fn given_analyzer_args_in_overlay_when_merging_then_replaces_base_args() {
        let mut base = Settings::default();
        base.analyzer.args = vec!["--old".into()];
        let overlay: RawSettings = toml::from_str(
            r#"
[analyzer]
command = "rca"
args = ["--json", "--model", "fast"]
"#,
        )
        .unwrap();

        let result = base.merge_with(&overlay);

        assert_eq!(result.analyzer.command.as_deref(), Some("rca"));
        assert_eq!(result.analyzer.args, vec!["--json", "--model", "fast"]);
    }

    #[test]
    fn given_tilde_in_analyzer_command_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings::default();
        settings.analyzer.command = Some("~/bin/rca".into());

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let command = settings.analyzer.command.unwrap();
        assert!(command.starts_with(&home), "command should start with home: {command}");
    }

    #[test]
    fn given_inverted_thresholds_when_validating_then_errors() {
        let mut settings = Settings::default();
        settings.lifespan.warning_percent = 90.0;
        settings.lifespan.critical_percent = 80.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_default_settings_when_serializing_then_roundtrips_through_raw() {
        let toml = Settings::default().to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&toml).unwrap();
        assert_eq!(raw.default_sector, Some(Sector::Injection));
        assert_eq!(raw.confirm_delete, Some(true));
    }
}
