//! Configuration settings for scalaris-svc.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::SvcError;

use super::node::NodeAttributes;
use super::platform::PlatformContext;

/// Main configuration structure.
///
/// Every table is optional; an empty file yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Node attributes and platform identification.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NodeConfig {
    /// Platform identifier (e.g., "ubuntu", "centos").
    pub platform: Option<String>,
    /// Terminate instead of gracefully stopping the scalaris node.
    /// Takes precedence over the attributes file.
    pub scalaris_start_first: Option<bool>,
    /// Optional Chef-style node attributes JSON document.
    pub attributes_file: Option<PathBuf>,
}

/// Paths configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    /// Directory containing the SysV init scripts.
    #[serde(default = "default_init_dir")]
    pub init_dir: PathBuf,
    /// Directory containing the `rcN.d` runlevel link directories.
    #[serde(default = "default_rc_root")]
    pub rc_root: PathBuf,
    /// os-release file consulted when no platform is configured.
    #[serde(default = "default_os_release")]
    pub os_release: PathBuf,
}

/// Limits configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Maximum run time of a single service-control command.
    #[serde(default = "default_action_timeout")]
    pub action_timeout_seconds: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Convergence report configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Whether a report line is written after each run.
    #[serde(default)]
    pub enabled: bool,
    /// Path to the JSON lines report file.
    #[serde(default = "default_report_path")]
    pub path: PathBuf,
}

// Default value functions
fn default_init_dir() -> PathBuf {
    PathBuf::from("/etc/init.d")
}

fn default_rc_root() -> PathBuf {
    PathBuf::from("/etc")
}

fn default_os_release() -> PathBuf {
    PathBuf::from("/etc/os-release")
}

fn default_action_timeout() -> u64 {
    120
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_report_path() -> PathBuf {
    PathBuf::from("/var/log/scalaris/svc-report.jsonl")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            init_dir: default_init_dir(),
            rc_root: default_rc_root(),
            os_release: default_os_release(),
        }
    }
}

impl PathsConfig {
    /// Path of a service's init script.
    pub fn init_script(&self, service: &str) -> PathBuf {
        self.init_dir.join(service)
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            action_timeout_seconds: default_action_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_report_path(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SvcError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SvcError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            SvcError::Config { message } => SvcError::Config {
                message: format!("{} ({})", message, path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, SvcError> {
        let settings: Settings = toml::from_str(content).map_err(|e| SvcError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    /// Resolve the node attributes.
    ///
    /// The attributes file is read first; an explicit `[node]` value wins.
    pub fn node_attributes(&self) -> Result<NodeAttributes, SvcError> {
        let mut attributes = match &self.node.attributes_file {
            Some(path) => NodeAttributes::load(path)?,
            None => NodeAttributes::default(),
        };

        if let Some(start_first) = self.node.scalaris_start_first {
            attributes.scalaris_start_first = start_first;
        }

        Ok(attributes)
    }

    /// Resolve the platform: command line, then config, then os-release.
    pub fn platform_context(&self, cli_override: Option<&str>) -> PlatformContext {
        if let Some(platform) = cli_override.or(self.node.platform.as_deref()) {
            return PlatformContext::new(platform);
        }
        PlatformContext::from_os_release(&self.paths.os_release)
    }

    /// Validate the settings.
    fn validate(&self) -> Result<(), SvcError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SvcError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(SvcError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.limits.action_timeout_seconds == 0 {
            return Err(SvcError::Config {
                message: "action_timeout_seconds must be greater than zero".to_string(),
            });
        }

        if !self.paths.init_dir.is_absolute() {
            return Err(SvcError::Config {
                message: format!(
                    "init_dir must be an absolute path, got '{}'",
                    self.paths.init_dir.display()
                ),
            });
        }

        Ok(())
    }
}
