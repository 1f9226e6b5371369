use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::{Catalog, PackageGroup};
use crate::supervisor::SupervisorConfig;

/// How the privileged installer command is assembled
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Privilege-escalation tool ("sudo")
    #[serde(default = "default_privilege_tool")]
    pub privilege_tool: String,
    /// Fixed arguments for the privilege tool; `-S` makes it read the
    /// credential from stdin, `-p ""` keeps its prompt off the transcript
    #[serde(default = "default_privilege_args")]
    pub privilege_args: Vec<String>,
    /// Package manager ("pacman")
    #[serde(default = "default_package_tool")]
    pub package_tool: String,
    /// Fixed arguments placed before the package tokens
    #[serde(default = "default_package_args")]
    pub package_args: Vec<String>,
}

fn default_privilege_tool() -> String {
    "sudo".to_string()
}

fn default_privilege_args() -> Vec<String> {
    ["-S", "-p", "", "--"].iter().map(|s| s.to_string()).collect()
}

fn default_package_tool() -> String {
    "pacman".to_string()
}

fn default_package_args() -> Vec<String> {
    ["-S", "--noconfirm", "--needed"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            privilege_tool: default_privilege_tool(),
            privilege_args: default_privilege_args(),
            package_tool: default_package_tool(),
            package_args: default_package_args(),
        }
    }
}

/// Supervisor tunables, as plain seconds in the config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupervisionConfig {
    /// How long to wait for the installer process to appear
    #[serde(default = "default_launch_timeout")]
    pub launch_timeout_secs: u64,
    /// Pause between graceful termination and force kill on cancel
    #[serde(default = "default_cancel_grace")]
    pub cancel_grace_secs: u64,
    /// Write a per-attempt log file under the data directory
    #[serde(default = "default_true")]
    pub keep_logs: bool,
}

fn default_launch_timeout() -> u64 {
    5
}

fn default_cancel_grace() -> u64 {
    3
}

fn default_true() -> bool {
    true
}

impl Default for SupervisionConfig {
    fn default() -> Self {
        Self {
            launch_timeout_secs: default_launch_timeout(),
            cancel_grace_secs: default_cancel_grace(),
            keep_logs: true,
        }
    }
}

impl SupervisionConfig {
    /// Build the in-memory supervisor configuration
    pub fn supervisor_config(&self) -> SupervisorConfig {
        SupervisorConfig {
            launch_timeout: Duration::from_secs(self.launch_timeout_secs),
            cancel_grace: Duration::from_secs(self.cancel_grace_secs),
            log_dir: if self.keep_logs { log_dir().ok() } else { None },
        }
    }
}

/// TUI theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TuiTheme {
    #[default]
    CatppuccinMocha,
    CatppuccinLatte,
    Nord,
}

impl std::fmt::Display for TuiTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CatppuccinMocha => write!(f, "Catppuccin Mocha"),
            Self::CatppuccinLatte => write!(f, "Catppuccin Latte"),
            Self::Nord => write!(f, "Nord"),
        }
    }
}

/// TUI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    #[serde(default)]
    pub theme: TuiTheme,
}

/// Sprout configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SproutConfig {
    #[serde(default)]
    pub installer: InstallerConfig,

    #[serde(default)]
    pub supervision: SupervisionConfig,

    #[serde(default)]
    pub tui: TuiConfig,

    /// Optional catalog override; the built-in groups apply when empty
    #[serde(default)]
    pub groups: Vec<PackageGroup>,
}

impl SproutConfig {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .context("Could not determine config directory")
            .map(|d| d.join("sprout"))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Check if config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Load config from file, or return default if not exists
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
        let config: SproutConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;

        Ok(())
    }

    /// The catalog this configuration selects
    pub fn catalog(&self) -> Catalog {
        Catalog::from_groups(self.groups.clone())
    }

    /// Set TUI theme
    pub fn set_theme(&mut self, theme: TuiTheme) {
        self.tui.theme = theme;
    }
}

/// Data directory for install logs
pub fn data_dir() -> Result<PathBuf> {
    directories::ProjectDirs::from("", "", "sprout")
        .context("Could not determine data directory")
        .map(|d| d.data_dir().to_path_buf())
}

/// Where per-attempt install logs are written
pub fn log_dir() -> Result<PathBuf> {
    data_dir().map(|d| d.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Config Tests ====================

    #[test]
    fn test_default_installer_shape() {
        let installer = InstallerConfig::default();
        assert_eq!(installer.privilege_tool, "sudo");
        assert_eq!(installer.privilege_args, vec!["-S", "-p", "", "--"]);
        assert_eq!(installer.package_tool, "pacman");
        assert_eq!(installer.package_args, vec!["-S", "--noconfirm", "--needed"]);
    }

    #[test]
    fn test_supervision_durations() {
        let supervision = SupervisionConfig {
            launch_timeout_secs: 7,
            cancel_grace_secs: 2,
            keep_logs: false,
        };
        let config = supervision.supervisor_config();
        assert_eq!(config.launch_timeout, Duration::from_secs(7));
        assert_eq!(config.cancel_grace, Duration::from_secs(2));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SproutConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed: SproutConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed.installer, config.installer);
        assert_eq!(parsed.supervision, config.supervision);
        assert!(parsed.groups.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let content = r#"
            [installer]
            package_tool = "apt-get"

            [tui]
            theme = "nord"
        "#;
        let config: SproutConfig = toml::from_str(content).unwrap();
        assert_eq!(config.installer.package_tool, "apt-get");
        assert_eq!(config.installer.privilege_tool, "sudo");
        assert_eq!(config.tui.theme, TuiTheme::Nord);
        assert_eq!(config.supervision.launch_timeout_secs, 5);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: SproutConfig = toml::from_str("").unwrap();
        assert_eq!(config.installer, InstallerConfig::default());
        assert!(config.supervision.keep_logs);
    }

    #[test]
    fn test_groups_override_catalog() {
        let content = r#"
            [[groups]]
            id = "minimal"
            label = "Minimal"
            packages = ["vim", "tmux"]
        "#;
        let config: SproutConfig = toml::from_str(content).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.groups().len(), 1);
        assert_eq!(catalog.resolve("minimal"), vec!["vim", "tmux"]);
    }
}
