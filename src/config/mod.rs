//! Tool configuration
//!
//! Defaults target a stock Intune Management Extension install. A YAML file
//! (`--config` / `IME_REPAIR_CONFIG`) can override any field, and
//! `--log-dir` / `IME_REPAIR_LOG_DIR` overrides the log directory last.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wax::Glob;

use crate::error::{RepairError, Result, config as config_error};

/// Service that hosts the management extension
pub const DEFAULT_SERVICE_NAME: &str = "IntuneManagementExtension";

/// Process name of the Company Portal client
pub const DEFAULT_CLIENT_PROCESS: &str = "CompanyPortal";

/// Shell target used to relaunch Company Portal
pub const DEFAULT_CLIENT_LAUNCH: &str = r"shell:AppsFolder\Microsoft.CompanyPortal_8wekyb3d8bbwe!App";

/// Glob for the agent's log files (non-recursive, case-insensitive)
pub const DEFAULT_LOG_GLOB: &str = "(?i)*.log";

/// Seconds to wait for each service state transition
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 15;

const LOG_DIR_SUFFIX: &str = r"Microsoft\IntuneManagementExtension\Logs";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RepairConfig {
    /// Directory holding the agent's `*.log` files
    pub log_dir: PathBuf,

    /// Glob that selects log files inside `log_dir`
    pub log_glob: String,

    /// Windows service to restart after cleanup
    pub service_name: String,

    /// Timeout for each service stop/start wait
    pub service_timeout_secs: u64,

    /// Client process to terminate before cleanup
    pub client_process: String,

    /// Target handed to the shell to relaunch the client
    pub client_launch: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            log_glob: DEFAULT_LOG_GLOB.to_string(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
            service_timeout_secs: DEFAULT_SERVICE_TIMEOUT_SECS,
            client_process: DEFAULT_CLIENT_PROCESS.to_string(),
            client_launch: DEFAULT_CLIENT_LAUNCH.to_string(),
        }
    }
}

impl RepairConfig {
    /// Load configuration, layering the optional file and log dir override
    /// over the defaults
    pub fn load(config_file: Option<&Path>, log_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(dir) = log_dir {
            config.log_dir = dir;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a YAML configuration file; the file must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(config_error::not_found(path.display().to_string()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| config_error::read_failed(path.display().to_string(), e.to_string()))?;

        Self::from_yaml(&content).map_err(|e| match e {
            RepairError::ConfigParseFailed { reason, .. } => {
                config_error::parse_failed(path.display().to_string(), reason)
            }
            other => other,
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Reject values the orchestrator cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(config_error::invalid("service_name must not be empty"));
        }
        if self.client_process.trim().is_empty() {
            return Err(config_error::invalid("client_process must not be empty"));
        }
        if self.service_timeout_secs == 0 {
            return Err(config_error::invalid(
                "service_timeout_secs must be greater than zero",
            ));
        }
        if let Err(e) = Glob::new(&self.log_glob) {
            return Err(config_error::invalid(format!(
                "log_glob '{}' is not a valid glob: {e}",
                self.log_glob
            )));
        }
        Ok(())
    }

    pub fn service_timeout(&self) -> Duration {
        Duration::from_secs(self.service_timeout_secs)
    }
}

/// `%ProgramData%\Microsoft\IntuneManagementExtension\Logs`
fn default_log_dir() -> PathBuf {
    let program_data = std::env::var_os("ProgramData")
        .map_or_else(|| PathBuf::from(r"C:\ProgramData"), PathBuf::from);
    program_data.join(LOG_DIR_SUFFIX)
}
